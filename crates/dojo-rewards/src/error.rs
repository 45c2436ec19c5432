use thiserror::Error;

pub type RewardResult<T> = std::result::Result<T, RewardError>;

/// Errors at the configuration boundary. Scoring itself never fails.
#[derive(Debug, Error)]
pub enum RewardError {
    #[error("invalid delimiters: {0}")]
    InvalidDelimiters(String),

    #[error("penalty weight for {particle} must be in (0, 2), got {weight}")]
    InvalidPenalty { particle: String, weight: f64 },

    #[error("invalid reward batch: {0}")]
    Batch(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}
