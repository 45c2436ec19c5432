//! The batched input handed to reward functions by the training loop.

use crate::error::RewardResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// A model completion as the trainer supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Completion {
    PlainText(String),
    StructuredTurn(Vec<Turn>),
    /// A list of bare strings; the first one is the text.
    TextList(Vec<String>),
    /// Anything else; normalizes to empty text.
    Unsupported(Value),
}

impl Completion {
    /// Canonical text: the string itself, the first turn's content, or the
    /// first bare string of a list.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText(text) => text,
            Self::StructuredTurn(turns) => turns.first().map_or("", |t| t.content.as_str()),
            Self::TextList(items) => items.first().map_or("", String::as_str),
            Self::Unsupported(_) => "",
        }
    }
}

impl From<&str> for Completion {
    fn from(text: &str) -> Self {
        Self::PlainText(text.to_string())
    }
}

impl From<String> for Completion {
    fn from(text: String) -> Self {
        Self::PlainText(text)
    }
}

/// Reference answers: a scalar applying to every completion, or one per
/// completion. `None` entries are nulls in the input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum References {
    Single(String),
    Batch(Vec<Option<String>>),
}

impl References {
    /// Exactly `n` references. Scalars and one-element batches are repeated;
    /// a short batch is padded with `None`.
    #[must_use]
    pub fn broadcast(&self, n: usize) -> Vec<Option<String>> {
        match self {
            Self::Single(answer) => vec![Some(answer.clone()); n],
            Self::Batch(answers) if answers.len() == 1 => vec![answers[0].clone(); n],
            Self::Batch(answers) => {
                let mut out: Vec<Option<String>> = answers.iter().take(n).cloned().collect();
                out.resize(n, None);
                out
            }
        }
    }
}

impl Default for References {
    fn default() -> Self {
        Self::Batch(Vec::new())
    }
}

impl From<Value> for References {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Batch(items.into_iter().map(scalar_text).collect()),
            Value::Null => Self::Batch(Vec::new()),
            Value::String(s) => Self::Single(s),
            other => Self::Single(other.to_string()),
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Keyword-style reward call: `prompts` and `completion_ids` are carried but
/// unused, unknown keys land in `extra` and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewardBatch {
    #[serde(default)]
    pub prompts: Option<Vec<Value>>,
    #[serde(default)]
    pub completions: Vec<Completion>,
    #[serde(default)]
    pub completion_ids: Option<Vec<Value>>,
    #[serde(default, alias = "answers")]
    pub answer: References,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl RewardBatch {
    #[must_use]
    pub fn new(completions: Vec<Completion>, answer: References) -> Self {
        Self { completions, answer, ..Self::default() }
    }

    pub fn from_json(json: &str) -> RewardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.completions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.completions.iter().map(Completion::text)
    }

    /// Raw references broadcast to the batch size (still possibly wrapped).
    #[must_use]
    pub fn raw_references(&self) -> Vec<Option<String>> {
        self.answer.broadcast(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_shapes_normalize() {
        let batch = RewardBatch::from_json(
            r#"{
                "completions": [
                    "plain",
                    [{"role": "assistant", "content": "turn"}],
                    [],
                    ["bare"],
                    42
                ],
                "answer": "を"
            }"#,
        )
        .unwrap();
        let texts: Vec<&str> = batch.texts().collect();
        assert_eq!(texts, vec!["plain", "turn", "", "bare", ""]);
    }

    #[test]
    fn test_scalar_reference_broadcasts() {
        let batch = RewardBatch::new(vec!["a".into(), "b".into(), "c".into()], References::Single("に".into()));
        assert_eq!(batch.raw_references(), vec![Some("に".to_string()); 3]);
    }

    fn refs(items: &[&str]) -> References {
        References::Batch(items.iter().map(|s| Some((*s).to_string())).collect())
    }

    #[test]
    fn test_single_element_batch_broadcasts_and_short_batch_pads() {
        let de = Some("で".to_string());
        assert_eq!(refs(&["で"]).broadcast(2), vec![de.clone(), de]);
        assert_eq!(
            refs(&["が", "を"]).broadcast(3),
            vec![Some("が".to_string()), Some("を".to_string()), None]
        );
        assert_eq!(refs(&["が", "を"]).broadcast(1), vec![Some("が".to_string())]);
    }

    #[test]
    fn test_extra_keys_and_non_string_answers() {
        let batch = RewardBatch::from_json(
            r#"{"prompts": null, "completions": [], "completion_ids": [1, 2], "answers": [3, null], "step": 7}"#,
        )
        .unwrap();
        assert_eq!(batch.answer, References::Batch(vec![Some("3".into()), None]));
        assert_eq!(batch.extra["step"], 7);
        assert!(batch.is_empty());
        assert!(batch.raw_references().is_empty());
    }
}
