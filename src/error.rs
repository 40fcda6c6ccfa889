//! Error types for rekono-tools
//!
//! Centralized error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

/// All error types that can occur while talking to the Rekono API
#[derive(Debug, Error)]
pub enum RekonoError {
    /// Transport failure (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or rejected credentials
    #[error("Unauthorized: server answered {status}")]
    Unauthorized { status: u16 },

    /// Server throttled the request
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Any other non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Page envelope came back without its data field
    #[error("Response from {path} has no data field")]
    MissingData { path: String },

    /// Base URL or endpoint path could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for rekono-tools operations
pub type Result<T> = std::result::Result<T, RekonoError>;
