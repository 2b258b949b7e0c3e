// Error handling module
// Defines the error taxonomy for config loading, authentication and listing queries

use thiserror::Error;

/// Errors that can occur while loading config, authenticating or querying listings
#[derive(Error, Debug)]
pub enum FeedError {
    /// Configuration or query list could not be loaded
    #[error("Configuration error: {0}")]
    ConfigLoad(String),

    /// Credential exchange failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Listing request could not be constructed
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// Transport failure or non-success status from the API
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl FeedError {
    /// Whether this error should abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, FeedError::ConfigLoad(_) | FeedError::Auth(_))
    }

    /// Short machine-friendly kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::ConfigLoad(_) => "config_load",
            FeedError::Auth(_) => "auth",
            FeedError::RequestBuild(_) => "request_build",
            FeedError::Network(_) => "network",
            FeedError::Parse(_) => "parse",
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Parse(e.to_string())
    }
}

/// Result type alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;
