//! Error types for the I/O edges of the crate.
//!
//! The scoring, validation and ranked reducers are total and never return these.

use thiserror::Error;

/// Errors loading or validating a content catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Errors reading or writing a persisted session record.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
