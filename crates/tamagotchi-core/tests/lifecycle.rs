//! End-to-end pet lifecycles against a file-backed database.
//!
//! Each step reopens the database, the way separate chat commands would.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tamagotchi_core::models::Species;
use tamagotchi_core::{Database, Keeper, Rates, TamagotchiError};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 1)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap()
}

fn open(tmp: &tempfile::NamedTempFile) -> Keeper {
    let path = tmp.path().to_str().unwrap();
    Keeper::new(Database::open(path).unwrap(), Rates::default())
}

#[test]
fn pet_survives_with_care_and_dies_of_neglect() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    open(&tmp).create_at(100, "Pip", "hedgehog", t0()).unwrap();

    // fresh pet, no time passed
    let pet = open(&tmp).get_live_status_at(100, t0()).unwrap().unwrap();
    assert_eq!((pet.hunger, pet.happiness, pet.health), (50, 50, 100));

    // 2h later: decay, then the meal
    let fed_at = t0() + Duration::hours(2);
    let pet = open(&tmp).feed_at(100, fed_at).unwrap();
    assert_eq!(pet.hunger, 40); // 50 + 20 - 30
    assert_eq!(pet.health, 97); // 100 - 8 + 5
    assert_eq!(pet.last_fed, Some(fed_at));

    let played_at = fed_at + Duration::hours(1);
    let outcome = open(&tmp).play_at(100, played_at, &mut rng).unwrap();
    assert_eq!(outcome.pet.last_played, Some(played_at));
    assert_eq!(outcome.pet.last_fed, Some(fed_at));

    let stored = open(&tmp).get_pet(100).unwrap().unwrap();
    assert_eq!(stored, outcome.pet);

    // left alone for a long time
    let death = played_at + Duration::hours(40);
    assert!(open(&tmp).get_live_status_at(100, death).unwrap().is_none());

    let keeper = open(&tmp);
    let err = keeper.feed_at(100, death).unwrap_err();
    assert!(matches!(err, TamagotchiError::NoLivePet(100)));

    let history = keeper.get_history(100).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "Pip");
    assert_eq!(history[0].species, Species::Hedgehog);
    assert_eq!(history[0].died_at, death);
    assert_eq!(
        history[0].lifespan_seconds,
        (death - t0()).num_seconds() as f64
    );
}

#[test]
fn users_are_independent() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let keeper = open(&tmp);

    keeper.create_at(1, "Hoot", "owl", t0()).unwrap();
    keeper.create_at(2, "Bun", "rabbit", t0() + Duration::hours(40)).unwrap();

    // user 1's owl starves, user 2's rabbit is barely a few hours old
    let now = t0() + Duration::hours(45);
    assert!(keeper.get_live_status_at(1, now).unwrap().is_none());
    let bun = keeper.get_live_status_at(2, now).unwrap().unwrap();
    assert_eq!(bun.health, 80);

    assert_eq!(keeper.get_history(1).unwrap().len(), 1);
    assert!(keeper.get_history(2).unwrap().is_empty());
    assert_eq!(keeper.db().live_pet_count().unwrap(), 1);
}

#[test]
fn new_pet_after_death_and_ordered_history() {
    let tmp = tempfile::NamedTempFile::new().unwrap();

    open(&tmp).create_at(5, "One", "monkey", t0()).unwrap();
    let first_death = t0() + Duration::hours(25);
    assert!(open(&tmp).get_live_status_at(5, first_death).unwrap().is_none());

    let err = open(&tmp)
        .create_at(5, "Two", "unicorn", first_death)
        .unwrap_err();
    assert!(matches!(err, TamagotchiError::UnknownSpecies(_)));

    open(&tmp).create_at(5, "Two", "Owl", first_death).unwrap();
    let second_death = first_death + Duration::hours(30);
    assert!(open(&tmp).get_live_status_at(5, second_death).unwrap().is_none());

    let history = open(&tmp).get_history(5).unwrap();
    let names: Vec<&str> = history.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Two", "One"]);
    assert!(history[0].died_at > history[1].died_at);
}
