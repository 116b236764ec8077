//! MAAS client errors

use thiserror::Error;

/// Errors that can occur when interacting with the MAAS API
#[derive(Debug, Error)]
pub enum MaasError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// MAAS API returned an error
    #[error("MAAS API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (rejected OAuth credentials)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// API key is not in consumer_key:token_key:token_secret form
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
