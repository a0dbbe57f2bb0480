use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::models::PetHistoryEntry;

/// Date format used when history is shown to a user.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Flat, display-ready form of a history entry.
#[derive(Debug, Serialize)]
pub struct HistoryRow<'a> {
    pub name: &'a str,
    pub species: &'static str,
    pub created_at: String,
    pub died_at: String,
    pub lifespan_seconds: f64,
    pub lifespan: String,
}

impl<'a> From<&'a PetHistoryEntry> for HistoryRow<'a> {
    fn from(entry: &'a PetHistoryEntry) -> Self {
        Self {
            name: &entry.name,
            species: entry.species.as_str(),
            created_at: entry.created_at.format(DISPLAY_DATE_FORMAT).to_string(),
            died_at: entry.died_at.format(DISPLAY_DATE_FORMAT).to_string(),
            lifespan_seconds: entry.lifespan_seconds,
            lifespan: entry.lifespan_display(),
        }
    }
}

/// Write history as CSV with a header row.
pub fn write_history_csv<W: Write>(entries: &[PetHistoryEntry], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(HistoryRow::from(entry))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render history as a pretty-printed JSON array.
pub fn history_to_json(entries: &[PetHistoryEntry]) -> Result<String> {
    let rows: Vec<HistoryRow<'_>> = entries.iter().map(HistoryRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;
    use chrono::NaiveDate;

    fn entry() -> PetHistoryEntry {
        let born = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(8, 30, 0).unwrap();
        let died = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 31, 1).unwrap();
        PetHistoryEntry::new(1, "Hoot".to_string(), Species::Owl, born, died)
    }

    #[test]
    fn test_csv_export() {
        let mut out = Vec::new();
        write_history_csv(&[entry()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,species,created_at,died_at,lifespan_seconds,lifespan")
        );
        assert_eq!(
            lines.next(),
            Some("Hoot,owl,2024-01-01 08:30,2024-01-02 09:31,90061.0,\"1 day, 1:01:01\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_export() {
        let json = history_to_json(&[entry()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "Hoot");
        assert_eq!(value[0]["species"], "owl");
        assert_eq!(value[0]["lifespan_seconds"], 90061.0);
    }

    #[test]
    fn test_empty_csv_has_no_rows() {
        let mut out = Vec::new();
        write_history_csv(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
