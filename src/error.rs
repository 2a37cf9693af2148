use thiserror::Error;

use crate::normalize::ValidationErrors;

#[derive(Error, Debug)]
pub enum FuelError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "rest")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("{0}")]
    EditRejected(String),

    #[error("Record {0} is read-only")]
    NotEditable(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FuelError>;
