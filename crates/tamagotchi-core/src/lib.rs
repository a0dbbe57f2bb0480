pub mod config;
pub mod data;
pub mod db;
pub mod decay;
pub mod error;
pub mod export;
pub mod keeper;
pub mod models;

pub use config::Rates;
pub use data::PortraitTable;
pub use db::Database;
pub use decay::{decay, DecayOutcome};
pub use error::{Result, TamagotchiError};
pub use keeper::{Keeper, PlayOutcome};
