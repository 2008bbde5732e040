use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the roster tool
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to write schedule to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RosterError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        RosterError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
