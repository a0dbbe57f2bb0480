//! Pet lifecycle: creation, lazy decay ticks, death and history.
//!
//! There is no background timer. Every read of a live pet applies the decay
//! accumulated since its last feeding and play, persists the result, and
//! archives the pet if its health ran out.

pub mod actions;

use chrono::{Local, NaiveDateTime};

use crate::config::Rates;
use crate::db::Database;
use crate::decay::decay;
use crate::error::{Result, TamagotchiError};
use crate::models::{Pet, PetHistoryEntry, PetUpdate, Species};

pub use actions::{PlayOutcome, ACTIVITIES};

/// Current local wall-clock time, the clock pets are measured against.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Owns the store and rate table and runs every pet operation.
pub struct Keeper {
    db: Database,
    rates: Rates,
}

impl Keeper {
    pub fn new(db: Database, rates: Rates) -> Self {
        Self { db, rates }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    /// Consume the keeper and return the inner Database.
    pub fn into_db(self) -> Database {
        self.db
    }

    /// Hatch a new pet for `user_id`.
    pub fn create(&self, user_id: i64, name: &str, species: &str) -> Result<Pet> {
        self.create_at(user_id, name, species, now())
    }

    pub fn create_at(
        &self,
        user_id: i64,
        name: &str,
        species: &str,
        now: NaiveDateTime,
    ) -> Result<Pet> {
        let species: Species = species.parse()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(TamagotchiError::InvalidName);
        }

        let pet = Pet::new(user_id, name.to_string(), species, now);
        let existing = self.db.with_transaction(|db| {
            // A pet that starved since it was last looked at must not block a new one.
            if let Some(existing) = self.tick(db, user_id, now)? {
                return Ok(Some(existing));
            }
            db.insert_pet(&pet)?;
            Ok(None)
        })?;

        if let Some(existing) = existing {
            return Err(TamagotchiError::PetAlreadyExists {
                user_id,
                name: existing.name,
            });
        }
        log::info!("User {} hatched {} the {}", user_id, pet.name, pet.species);
        Ok(pet)
    }

    /// The stored pet without applying decay.
    pub fn get_pet(&self, user_id: i64) -> Result<Option<Pet>> {
        self.db.get_pet(user_id)
    }

    /// Apply decay and return the live pet, or `None` if there is none or it
    /// just died.
    pub fn get_live_status(&self, user_id: i64) -> Result<Option<Pet>> {
        self.get_live_status_at(user_id, now())
    }

    pub fn get_live_status_at(&self, user_id: i64, now: NaiveDateTime) -> Result<Option<Pet>> {
        self.db.with_transaction(|db| self.tick(db, user_id, now))
    }

    /// One decay tick. Runs inside the caller's transaction.
    ///
    /// Persists the decayed stats but leaves `last_fed` and `last_played`
    /// alone; only feeding and playing move those clocks.
    fn tick(&self, db: &Database, user_id: i64, now: NaiveDateTime) -> Result<Option<Pet>> {
        let Some(mut pet) = db.get_pet(user_id)? else {
            return Ok(None);
        };

        let outcome = decay(pet.stats(), pet.last_fed, pet.last_played, now, &self.rates);
        log::debug!(
            "Tick for user {}: {:?} -> {:?}",
            user_id,
            pet.stats(),
            outcome.stats
        );

        if outcome.is_dead {
            let entry = db.archive_pet(&pet, now)?;
            log::info!(
                "{} the {} (user {}) died after {}",
                entry.name,
                entry.species,
                user_id,
                entry.lifespan_display()
            );
            return Ok(None);
        }

        db.update_pet(user_id, &PetUpdate::stats(outcome.stats))?;
        pet.set_stats(outcome.stats);
        Ok(Some(pet))
    }

    /// Past pets for a user, most recent death first.
    pub fn get_history(&self, user_id: i64) -> Result<Vec<PetHistoryEntry>> {
        self.db.get_history(user_id)
    }

    /// The user's most recently deceased pet.
    pub fn last_death(&self, user_id: i64) -> Result<Option<PetHistoryEntry>> {
        self.db.get_last_death(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stats;
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn keeper() -> Keeper {
        Keeper::new(Database::open_in_memory().unwrap(), Rates::default())
    }

    #[test]
    fn test_create_defaults() {
        let k = keeper();
        let pet = k.create_at(1, "  Bun ", "rabbit", t0()).unwrap();
        assert_eq!(pet.name, "Bun");
        assert_eq!(pet.species, Species::Rabbit);
        assert_eq!(pet.stats(), Stats::new(50, 50, 100));
        assert_eq!(pet.last_fed, Some(t0()));
        assert_eq!(pet.last_played, Some(t0()));
        assert_eq!(k.get_pet(1).unwrap(), Some(pet));
    }

    #[test]
    fn test_create_unknown_species() {
        let k = keeper();
        let err = k.create_at(1, "Puff", "dragon", t0()).unwrap_err();
        assert!(matches!(err, TamagotchiError::UnknownSpecies(_)));
        assert!(err.is_user_error());
        assert!(k.get_pet(1).unwrap().is_none());
    }

    #[test]
    fn test_create_blank_name() {
        let k = keeper();
        let err = k.create_at(1, "   ", "owl", t0()).unwrap_err();
        assert!(matches!(err, TamagotchiError::InvalidName));
    }

    #[test]
    fn test_create_twice_rejected() {
        let k = keeper();
        k.create_at(1, "Hoot", "owl", t0()).unwrap();
        let err = k.create_at(1, "Hoot II", "owl", t0()).unwrap_err();
        assert!(matches!(
            err,
            TamagotchiError::PetAlreadyExists { user_id: 1, ref name } if name == "Hoot"
        ));
        // other users are unaffected
        k.create_at(2, "Hoot", "owl", t0()).unwrap();
    }

    #[test]
    fn test_create_replaces_pet_that_starved_unobserved() {
        let k = keeper();
        k.create_at(1, "Old", "monkey", t0()).unwrap();
        let later = t0() + Duration::hours(60);
        let pet = k.create_at(1, "New", "monkey", later).unwrap();
        assert_eq!(pet.name, "New");
        let history = k.get_history(1).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "Old");
        assert_eq!(history[0].died_at, later);
    }

    #[test]
    fn test_status_without_elapsed_time_is_unchanged() {
        let k = keeper();
        let created = k.create_at(1, "Spike", "hedgehog", t0()).unwrap();
        let status = k.get_live_status_at(1, t0()).unwrap().unwrap();
        assert_eq!(status, created);
    }

    #[test]
    fn test_status_without_pet() {
        let k = keeper();
        assert!(k.get_live_status_at(1, t0()).unwrap().is_none());
    }

    #[test]
    fn test_status_persists_decay_but_not_clocks() {
        let k = keeper();
        k.create_at(1, "Spike", "hedgehog", t0()).unwrap();
        let later = t0() + Duration::hours(3);
        let pet = k.get_live_status_at(1, later).unwrap().unwrap();
        assert_eq!(pet.stats(), Stats::new(80, 35, 88));

        let stored = k.get_pet(1).unwrap().unwrap();
        assert_eq!(stored.stats(), Stats::new(80, 35, 88));
        assert_eq!(stored.last_fed, Some(t0()));
        assert_eq!(stored.last_played, Some(t0()));
    }

    #[test]
    fn test_neglect_archives_pet() {
        let k = keeper();
        k.create_at(7, "Coco", "monkey", t0()).unwrap();
        let later = t0() + Duration::hours(50);
        assert!(k.get_live_status_at(7, later).unwrap().is_none());
        assert!(k.get_pet(7).unwrap().is_none());

        let history = k.get_history(7).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "Coco");
        assert_eq!(history[0].species, Species::Monkey);
        assert_eq!(history[0].created_at, t0());
        assert_eq!(history[0].died_at, later);
        assert_eq!(history[0].lifespan_seconds, 50.0 * 3600.0);

        // a second look does not archive twice
        assert!(k.get_live_status_at(7, later + Duration::hours(1)).unwrap().is_none());
        assert_eq!(k.get_history(7).unwrap().len(), 1);
    }

    #[test]
    fn test_history_orders_newest_death_first() {
        let k = keeper();
        k.create_at(1, "First", "owl", t0()).unwrap();
        let first_death = t0() + Duration::hours(30);
        assert!(k.get_live_status_at(1, first_death).unwrap().is_none());

        k.create_at(1, "Second", "rabbit", first_death).unwrap();
        let second_death = first_death + Duration::hours(26);
        assert!(k.get_live_status_at(1, second_death).unwrap().is_none());

        let names: Vec<String> = k.get_history(1).unwrap().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(k.last_death(1).unwrap().unwrap().name, "Second");
    }
}
