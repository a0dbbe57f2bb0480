use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TamagotchiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Rabbit,
    Owl,
    Hedgehog,
    Monkey,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Rabbit,
        Species::Owl,
        Species::Hedgehog,
        Species::Monkey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Rabbit => "rabbit",
            Species::Owl => "owl",
            Species::Hedgehog => "hedgehog",
            Species::Monkey => "monkey",
        }
    }

    /// Label used by the original Telegram keyboard.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Species::Rabbit => "кролик",
            Species::Owl => "сова",
            Species::Hedgehog => "ёж",
            Species::Monkey => "обезьянка",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Species {
    type Err = TamagotchiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Species::ALL
            .into_iter()
            .find(|sp| sp.as_str() == needle || sp.legacy_label() == needle)
            .ok_or_else(|| TamagotchiError::UnknownSpecies(s.trim().to_string()))
    }
}
