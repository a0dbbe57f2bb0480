use chrono::NaiveDateTime;

use crate::config::Rates;
use crate::models::history::seconds_between;
use crate::models::pet::clamp_stat;
use crate::models::Stats;

/// Result of one decay evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayOutcome {
    pub stats: Stats,
    pub is_dead: bool,
}

/// Fractional hours elapsed since `since`. An unset timestamp means no time has
/// passed, and so does one lying in the future.
pub fn hours_since(since: Option<NaiveDateTime>, now: NaiveDateTime) -> f64 {
    let Some(since) = since else {
        return 0.0;
    };
    let seconds = seconds_between(since, now);
    if seconds < 0.0 {
        log::warn!("Timestamp {} is after {}, treating as no elapsed time", since, now);
        return 0.0;
    }
    seconds / 3600.0
}

/// Rate times hours, truncated toward zero after multiplying. The float to
/// integer cast saturates at the `i64` bounds.
fn delta(rate_per_hour: i64, hours: f64) -> i64 {
    (rate_per_hour as f64 * hours).trunc() as i64
}

/// Apply time-proportional decay to `stats`.
///
/// Hunger grows with hours since feeding, happiness falls with hours since
/// playing, and health falls with the sum of both idle spans. Every stat is
/// clamped to `[0, 100]`. The pet is dead once health reaches zero.
pub fn decay(
    stats: Stats,
    last_fed: Option<NaiveDateTime>,
    last_played: Option<NaiveDateTime>,
    now: NaiveDateTime,
    rates: &Rates,
) -> DecayOutcome {
    let fed_hours = hours_since(last_fed, now);
    let played_hours = hours_since(last_played, now);

    let hunger_delta = delta(rates.hunger_per_hour, fed_hours);
    let happiness_delta = delta(rates.happiness_per_hour, played_hours);
    let health_delta = delta(rates.health_per_hour, fed_hours + played_hours);

    let hunger = clamp_stat(stats.hunger.saturating_add(hunger_delta));
    let happiness = clamp_stat(stats.happiness.saturating_add(happiness_delta));
    let health = clamp_stat(stats.health.saturating_add(health_delta));

    DecayOutcome {
        stats: Stats {
            hunger,
            happiness,
            health,
        },
        is_dead: health <= 0,
    }
}
