use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A session was requested for a country the catalog cannot resolve.
    #[error("no usable level configuration for {country}: {reason}")]
    ConfigurationMissing { country: String, reason: String },

    #[error("tuning rejected: {0}")]
    InvalidTuning(String),

    #[error("failed to parse level catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("profile persistence failed: {0}")]
    Persistence(String),

    #[error("local storage is not available")]
    StorageUnavailable,

    #[error("please enter a username")]
    EmptyUsername,

    #[error("username {0} already exists, please choose a different one")]
    DuplicateUsername(String),

    #[error("no profile stored for {0}")]
    UnknownUser(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
