//! Common error types used across all Pulse Dash crates

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for all Pulse Dash operations
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DashError {
    #[error("Network request failed: {message}")]
    Network { message: String },

    #[error("API returned {status} for {url}")]
    Api { status: u16, url: String },

    #[error("Response decode failed: {message}")]
    Decode { message: String },

    #[error("Metadata item missing: {id}")]
    MissingMetadata { id: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for Pulse Dash operations
pub type Result<T> = std::result::Result<T, DashError>;

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        DashError::Decode {
            message: err.to_string(),
        }
    }
}
