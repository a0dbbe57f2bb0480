pub mod history;
pub mod pet;
pub mod species;

pub use history::{format_lifespan, PetHistoryEntry};
pub use pet::{HealthStatus, Pet, PetUpdate, Stats};
pub use species::Species;
