use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog lookup '{operation}' failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid price range: min {min} is greater than max {max}")]
    InvalidFacetRange { min: f64, max: f64 },

    #[error("Invalid price input: '{0}'")]
    InvalidPriceInput(String),

    #[error("Price {value} is outside the allowed range 0..={max}")]
    PriceOutOfRange { value: f64, max: f64 },

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

impl QueryError {
    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        QueryError::Transport {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
