use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Manifest unreadable: {0}")]
    ManifestUnreadable(String),

    #[error("Tag already exists: {0}")]
    TagAlreadyExists(String),

    #[error("Failed to push tag '{tag}' to '{remote}': {cause}")]
    PushFailure {
        tag: String,
        remote: String,
        cause: String,
    },

    #[error("Version control unavailable: {0}")]
    AccessorUnavailable(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::ManifestUnreadable(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an accessor error with context
    pub fn accessor(msg: impl Into<String>) -> Self {
        ReleaseError::AccessorUnavailable(msg.into())
    }

    /// Create a push failure for a tag that already exists locally
    pub fn push(tag: impl Into<String>, remote: impl Into<String>, cause: impl ToString) -> Self {
        ReleaseError::PushFailure {
            tag: tag.into(),
            remote: remote.into(),
            cause: cause.to_string(),
        }
    }
}
