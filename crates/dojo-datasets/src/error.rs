use thiserror::Error;

pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unknown dataset: {name} (available: {})", available.join(", "))]
    NotFound { name: String, available: Vec<String> },

    #[error("checksum mismatch for {name}: expected {expected}, got {actual}")]
    Integrity {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("transfer of {name} failed: {reason}")]
    Transfer { name: String, reason: String },

    #[error("archive error: {0}")]
    Archive(String),

    #[error("invalid dataset: {0}")]
    Invalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DatasetError {
    /// True for the kinds a caller may retry after fixing the cause
    /// (the cache is left in its pre-attempt state for all three).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Integrity { .. } | Self::Transfer { .. })
    }
}
