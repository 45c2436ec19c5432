use crate::error::{RewardError, RewardResult};
use serde::{Deserialize, Serialize};

/// Structural markers around the reasoning and answer spans.
///
/// Markers are literal text; they are escaped before being embedded in any
/// pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    pub reasoning_start: String,
    pub reasoning_end: String,
    pub answer_start: String,
    pub answer_end: String,
    /// End-of-sequence marker tolerated after the answer span. Empty disables it.
    pub eos_token: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            reasoning_start: "<reasoning>".to_string(),
            reasoning_end: "</reasoning>".to_string(),
            answer_start: "<answer>".to_string(),
            answer_end: "</answer>".to_string(),
            eos_token: String::new(),
        }
    }
}

impl Delimiters {
    #[must_use]
    pub fn with_eos(mut self, eos_token: impl Into<String>) -> Self {
        self.eos_token = eos_token.into();
        self
    }

    pub fn validate(&self) -> RewardResult<()> {
        let markers = [
            ("reasoning_start", &self.reasoning_start),
            ("reasoning_end", &self.reasoning_end),
            ("answer_start", &self.answer_start),
            ("answer_end", &self.answer_end),
        ];
        for (field, value) in markers {
            if value.is_empty() {
                return Err(RewardError::InvalidDelimiters(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }

    /// `(?:<escaped eos>)?`, or nothing when no eos marker is configured.
    pub(crate) fn optional_eos_pattern(&self) -> String {
        if self.eos_token.is_empty() {
            String::new()
        } else {
            format!("(?:{})?", regex::escape(&self.eos_token))
        }
    }
}
