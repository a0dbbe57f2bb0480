use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TamagotchiError};

/// Largest accepted magnitude for any rate or bonus. One step of this size
/// already spans the whole stat range.
pub const MAX_RATE: i64 = 100;

/// Per-hour decay rates and per-action bonuses.
///
/// Keys missing from a JSON file keep their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    /// Hunger gained per hour since the last feeding.
    pub hunger_per_hour: i64,
    /// Happiness change per hour since the last play (negative).
    pub happiness_per_hour: i64,
    /// Health change per combined idle hour (negative).
    pub health_per_hour: i64,
    pub feed_hunger_reduction: i64,
    pub play_happiness_increase: i64,
    pub health_feed_benefit: i64,
    pub health_play_benefit: i64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            hunger_per_hour: 10,
            happiness_per_hour: -5,
            health_per_hour: -2,
            feed_hunger_reduction: 30,
            play_happiness_increase: 20,
            health_feed_benefit: 5,
            health_play_benefit: 5,
        }
    }
}

impl Rates {
    /// Parse and validate a rate table from JSON bytes.
    pub fn from_json_bytes(data: &[u8]) -> Result<Self> {
        let rates: Rates = serde_json::from_slice(data)?;
        rates.validate()?;
        log::info!("Loaded rates: {:?}", rates);
        Ok(rates)
    }

    /// Load from the bundled rates.json (compiled into the binary).
    pub fn bundled() -> Result<Self> {
        Self::from_json_bytes(include_bytes!("../data/rates.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json_bytes(&data)
    }

    pub fn validate(&self) -> Result<()> {
        let growth = 0..=MAX_RATE;
        let loss = -MAX_RATE..=0;
        let checks = [
            ("hunger_per_hour", self.hunger_per_hour, &growth),
            ("happiness_per_hour", self.happiness_per_hour, &loss),
            ("health_per_hour", self.health_per_hour, &loss),
            ("feed_hunger_reduction", self.feed_hunger_reduction, &growth),
            ("play_happiness_increase", self.play_happiness_increase, &growth),
            ("health_feed_benefit", self.health_feed_benefit, &growth),
            ("health_play_benefit", self.health_play_benefit, &growth),
        ];
        for (key, value, range) in checks {
            if !range.contains(&value) {
                return Err(TamagotchiError::Config(format!(
                    "{} must be within {}..={}, got {}",
                    key,
                    range.start(),
                    range.end(),
                    value
                )));
            }
        }
        Ok(())
    }
}
