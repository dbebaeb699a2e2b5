//! Error types for the podbrowse library.

use thiserror::Error;

/// Main error type for explorer operations.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// HTTP request failed with status code.
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Network request error.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The bearer token was rejected; the operator has to log in again.
    #[error("Authentication required")]
    AuthRequired,

    /// The dashboard reports the target cluster as not connected.
    #[error("Cluster not connected: {cluster}")]
    ClusterNotConnected { cluster: String },

    /// An action guard rejected the request before any network call.
    #[error("Action not permitted: {0}")]
    ActionNotPermitted(String),

    /// Container context missing or incomplete.
    #[error("Invalid container context: {0}")]
    InvalidContext(String),

    /// The explorer actor has shut down.
    #[error("Explorer actor stopped")]
    ActorStopped,

    /// Custom error message.
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;
