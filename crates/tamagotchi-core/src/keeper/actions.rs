use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TamagotchiError};
use crate::keeper::{now, Keeper};
use crate::models::pet::clamp_stat;
use crate::models::{Pet, PetUpdate, Stats};

/// Games the pet can be played with. Cosmetic only.
pub const ACTIVITIES: [&str; 5] = ["ball", "hide-and-seek", "tag", "jumping", "puzzles"];

#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome {
    pub pet: Pet,
    pub activity: &'static str,
}

impl Keeper {
    /// Feed the user's pet. Decay is applied first, then the bonus.
    pub fn feed(&self, user_id: i64) -> Result<Pet> {
        self.feed_at(user_id, now())
    }

    pub fn feed_at(&self, user_id: i64, now: NaiveDateTime) -> Result<Pet> {
        let fed = self.db.with_transaction(|db| {
            let Some(mut pet) = self.tick(db, user_id, now)? else {
                return Ok(None);
            };

            let stats = Stats {
                hunger: clamp_stat(pet.hunger.saturating_sub(self.rates.feed_hunger_reduction)),
                happiness: pet.happiness,
                health: clamp_stat(pet.health.saturating_add(self.rates.health_feed_benefit)),
            };
            db.update_pet(user_id, &PetUpdate::stats(stats).fed_at(now))?;

            pet.set_stats(stats);
            pet.last_fed = Some(now);
            Ok(Some(pet))
        })?;

        // A pet that died during the tick stays archived.
        let pet = fed.ok_or(TamagotchiError::NoLivePet(user_id))?;
        log::info!("User {} fed {}", user_id, pet.name);
        Ok(pet)
    }

    /// Play with the user's pet. Decay is applied first, then the bonus.
    pub fn play(&self, user_id: i64) -> Result<PlayOutcome> {
        self.play_at(user_id, now(), &mut rand::thread_rng())
    }

    pub fn play_at<R: Rng + ?Sized>(
        &self,
        user_id: i64,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<PlayOutcome> {
        let played = self.db.with_transaction(|db| {
            let Some(mut pet) = self.tick(db, user_id, now)? else {
                return Ok(None);
            };

            let stats = Stats {
                hunger: pet.hunger,
                happiness: clamp_stat(
                    pet.happiness.saturating_add(self.rates.play_happiness_increase),
                ),
                health: clamp_stat(pet.health.saturating_add(self.rates.health_play_benefit)),
            };
            db.update_pet(user_id, &PetUpdate::stats(stats).played_at(now))?;

            pet.set_stats(stats);
            pet.last_played = Some(now);
            Ok(Some(pet))
        })?;
        let pet = played.ok_or(TamagotchiError::NoLivePet(user_id))?;

        let activity = ACTIVITIES.choose(rng).copied().unwrap_or(ACTIVITIES[0]);
        log::info!("User {} played {} with {}", user_id, activity, pet.name);
        Ok(PlayOutcome { pet, activity })
    }
}
