use thiserror::Error;

#[derive(Error, Debug)]
pub enum TamagotchiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("User {user_id} already has a pet named {name}")]
    PetAlreadyExists { user_id: i64, name: String },

    #[error("Pet name must not be empty")]
    InvalidName,

    #[error("User {0} has no live pet")]
    NoLivePet(i64),

    #[error("Config error: {0}")]
    Config(String),
}

impl TamagotchiError {
    /// Validation and not-found errors are answered with a message;
    /// everything else aborts the request.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TamagotchiError::UnknownSpecies(_)
                | TamagotchiError::PetAlreadyExists { .. }
                | TamagotchiError::InvalidName
                | TamagotchiError::NoLivePet(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TamagotchiError>;
