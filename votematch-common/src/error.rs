//! Common error types for VoteMatch

use thiserror::Error;

/// Common result type for VoteMatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the catalog, configuration, and request layers
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON data file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Static catalog data failed validation
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Malformed recommendation request (rejected before matching runs)
    #[error("Validation error: {0}")]
    Validation(String),
}
