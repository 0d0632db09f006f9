use thiserror::Error;

/// Unified error type for conventional-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Source control request failed: {0}")]
    Source(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid event payload: {0}")]
    Payload(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in conventional-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a source control error with context
    pub fn source(msg: impl Into<String>) -> Self {
        ReleaseError::Source(msg.into())
    }

    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        ReleaseError::NotFound(msg.into())
    }

    /// Create a publish error with context
    pub fn publish(msg: impl Into<String>) -> Self {
        ReleaseError::Publish(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a payload error with context
    pub fn payload(msg: impl Into<String>) -> Self {
        ReleaseError::Payload(msg.into())
    }

    /// Create a release note template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        ReleaseError::Template(msg.into())
    }

    /// Whether this error reports a missing resource rather than a failed call
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReleaseError::NotFound(_))
    }
}
