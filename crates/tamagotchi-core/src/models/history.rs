use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Species;

/// Archived record of a pet that died. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetHistoryEntry {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub species: Species,
    pub created_at: NaiveDateTime,
    pub died_at: NaiveDateTime,
    pub lifespan_seconds: f64,
}

impl PetHistoryEntry {
    pub fn new(
        user_id: i64,
        name: String,
        species: Species,
        created_at: NaiveDateTime,
        died_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            user_id,
            name,
            species,
            created_at,
            died_at,
            lifespan_seconds: seconds_between(created_at, died_at),
        }
    }

    pub fn lifespan_display(&self) -> String {
        format_lifespan(self.lifespan_seconds)
    }
}

/// Signed seconds from `from` to `to`, with microsecond precision.
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

/// Render a lifespan as `H:MM:SS`, with a `N day(s), ` prefix past one day.
/// Fractional seconds are dropped.
pub fn format_lifespan(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as i64
    } else {
        0
    };
    let days = total / 86_400;
    let rem = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_lifespan_from_timestamps() {
        let born = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let died = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap().and_hms_opt(2, 0, 0).unwrap();
        let entry = PetHistoryEntry::new(1, "Hoot".to_string(), Species::Owl, born, died);
        assert_eq!(entry.lifespan_seconds, 50.0 * 3600.0);
        assert_eq!(entry.lifespan_display(), "2 days, 2:00:00");
    }

    #[test]
    fn test_format_lifespan() {
        assert_eq!(format_lifespan(0.0), "0:00:00");
        assert_eq!(format_lifespan(59.9), "0:00:59");
        assert_eq!(format_lifespan(3725.0), "1:02:05");
        assert_eq!(format_lifespan(86_400.0 + 61.0), "1 day, 0:01:01");
        assert_eq!(format_lifespan(-3.0), "0:00:00");
    }
}
