//! Error types for the detector

use crate::language::Language;
use crate::model::NgramOrder;
use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid ngram frequency: {0}")]
    InvalidFrequency(String),

    #[error("Model resource error for {language:?} {order:?}: {reason}")]
    ModelResource {
        language: Language,
        order: NgramOrder,
        reason: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
