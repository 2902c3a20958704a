//! Error types for Arrlink.

use thiserror::Error;

/// Library-level error type for Arrlink operations.
#[derive(Error, Debug)]
pub enum ArrlinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: missing or malformed '{0}'")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{backend} is not configured: {reason}")]
    Misconfigured { backend: String, reason: String },

    #[error("{backend} unreachable at '{endpoint}': {reason}")]
    Unavailable {
        backend: String,
        endpoint: String,
        reason: String,
    },

    #[error("{backend} request to '{endpoint}' failed with status {status}")]
    RequestFailed {
        backend: String,
        endpoint: String,
        status: u16,
    },

    #[error("Watch provider '{0}' failed: {1}")]
    Provider(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Arrlink operations.
pub type Result<T> = std::result::Result<T, ArrlinkError>;
