use crate::error::{DatasetError, DatasetResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One task line of a dataset `.jsonl` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub instruction: String,
    pub input: String,
    /// Reference solution in the `<think>…</think><answer>…</answer>` layout.
    pub output: String,
    #[serde(default)]
    pub group_id: u64,
    #[serde(default)]
    pub task_idx: u64,
    pub task_type: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl TaskRecord {
    /// The bare answer, from `metadata.answer` when present.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.metadata.get("answer").and_then(serde_json::Value::as_str)
    }
}

/// Contents of the `metadata.json` sidecar shipped inside each archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    pub num_tasks: u64,
    #[serde(default)]
    pub num_groups: u64,
    #[serde(default)]
    pub task_types: Vec<String>,
    #[serde(default)]
    pub difficulty_distribution: BTreeMap<String, f64>,
    #[serde(default)]
    pub file_format: String,
    #[serde(default)]
    pub compression: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub description: String,
}

pub fn validate_records(records: &[TaskRecord]) -> DatasetResult<()> {
    if records.is_empty() {
        return Err(DatasetError::Invalid("dataset must not be empty".to_string()));
    }
    for (idx, rec) in records.iter().enumerate() {
        if rec.input.trim().is_empty() {
            return Err(DatasetError::Invalid(format!("record[{idx}] input is empty")));
        }
        if rec.output.trim().is_empty() {
            return Err(DatasetError::Invalid(format!("record[{idx}] output is empty")));
        }
    }
    Ok(())
}
