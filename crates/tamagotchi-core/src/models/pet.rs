use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Species;

pub const STAT_MIN: i64 = 0;
pub const STAT_MAX: i64 = 100;

pub const INITIAL_HUNGER: i64 = 50;
pub const INITIAL_HAPPINESS: i64 = 50;
pub const INITIAL_HEALTH: i64 = 100;

/// Clamp a stat into `[STAT_MIN, STAT_MAX]`.
pub fn clamp_stat(value: i64) -> i64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hunger: i64,
    pub happiness: i64,
    pub health: i64,
}

impl Stats {
    pub fn new(hunger: i64, happiness: i64, health: i64) -> Self {
        Self {
            hunger: clamp_stat(hunger),
            happiness: clamp_stat(happiness),
            health: clamp_stat(health),
        }
    }

    pub fn initial() -> Self {
        Self::new(INITIAL_HUNGER, INITIAL_HAPPINESS, INITIAL_HEALTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Critical,
    Bad,
    Good,
}

impl HealthStatus {
    pub fn from_health(health: i64) -> Self {
        match health {
            h if h < 30 => HealthStatus::Critical,
            h if h < 60 => HealthStatus::Bad,
            _ => HealthStatus::Good,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "Very poor condition 😱",
            HealthStatus::Bad => "Poor condition 😢",
            HealthStatus::Good => "Good condition 😊",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A live pet. One per user; dead pets live in `pets_history` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub user_id: i64,
    pub name: String,
    pub species: Species,
    pub hunger: i64,
    pub happiness: i64,
    pub health: i64,
    pub last_fed: Option<NaiveDateTime>,
    pub last_played: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Pet {
    /// A freshly hatched pet with default stats and both action clocks at `now`.
    pub fn new(user_id: i64, name: String, species: Species, now: NaiveDateTime) -> Self {
        let stats = Stats::initial();
        Self {
            user_id,
            name,
            species,
            hunger: stats.hunger,
            happiness: stats.happiness,
            health: stats.health,
            last_fed: Some(now),
            last_played: Some(now),
            created_at: now,
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            hunger: self.hunger,
            happiness: self.happiness,
            health: self.health,
        }
    }

    pub fn set_stats(&mut self, stats: Stats) {
        self.hunger = stats.hunger;
        self.happiness = stats.happiness;
        self.health = stats.health;
    }

    pub fn health_status(&self) -> HealthStatus {
        HealthStatus::from_health(self.health)
    }
}

/// Column values written back to a live pet.
/// `None` timestamps leave the stored value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetUpdate {
    pub hunger: i64,
    pub happiness: i64,
    pub health: i64,
    pub last_fed: Option<NaiveDateTime>,
    pub last_played: Option<NaiveDateTime>,
}

impl PetUpdate {
    pub fn stats(stats: Stats) -> Self {
        Self {
            hunger: clamp_stat(stats.hunger),
            happiness: clamp_stat(stats.happiness),
            health: clamp_stat(stats.health),
            last_fed: None,
            last_played: None,
        }
    }

    pub fn fed_at(mut self, at: NaiveDateTime) -> Self {
        self.last_fed = Some(at);
        self
    }

    pub fn played_at(mut self, at: NaiveDateTime) -> Self {
        self.last_played = Some(at);
        self
    }
}
