use thiserror::Error;

/// Custom error type for provider operations
#[derive(Error, Debug)]
pub enum TfeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Remote entity not found (after exhausting pagination, or a required 404)
    #[error("{resource} '{key}' not found")]
    NotFound { resource: String, key: String },

    /// Token not found in any source
    #[error("{0}")]
    TokenNotFound(String),

    /// Failed to read or parse credentials / CLI config file
    #[error("{0}")]
    Credentials(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid attribute value in configuration or state
    #[error("Invalid value: {0}")]
    Validation(String),

    /// Identifier not in `organization/name` or `name|organization` form
    #[error("invalid ID format: {0:?} (expected <ORGANIZATION>/<NAME>)")]
    InvalidId(String),

    /// No handler registered for a resource type
    #[error("unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    /// No handler registered for a data source type
    #[error("unsupported data source type: {0}")]
    UnsupportedDataSourceType(String),

    /// Caller-supplied deadline expired
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Provider was configured twice
    #[error("provider is already configured")]
    AlreadyConfigured,
}

impl From<serde_json::Error> for TfeError {
    fn from(err: serde_json::Error) -> Self {
        TfeError::Json(err.to_string())
    }
}

impl TfeError {
    /// Shorthand for a not-found error
    pub fn not_found(resource: &str, key: &str) -> Self {
        TfeError::NotFound {
            resource: resource.to_string(),
            key: key.to_string(),
        }
    }

    /// True for `NotFound` and 404 API errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TfeError::NotFound { .. } | TfeError::Api { status: 404, .. }
        )
    }
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, TfeError>;
