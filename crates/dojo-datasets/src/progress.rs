use serde::{Deserialize, Serialize};

/// Cache pipeline stage, reported as it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Downloading,
    Downloaded,
    Verifying,
    Verified,
    ChecksumFailed,
    Extracting,
    Ready,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Downloading => "downloading",
            Self::Downloaded => "downloaded",
            Self::Verifying => "verifying",
            Self::Verified => "verified",
            Self::ChecksumFailed => "checksum_failed",
            Self::Extracting => "extracting",
            Self::Ready => "ready",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started { name: String, total_bytes: Option<u64> },
    Transferred { name: String, bytes: u64, total_bytes: Option<u64> },
    Stage { name: String, stage: Stage },
    Finished { name: String },
}

pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

/// Reports stage changes through `tracing`; byte counts only at trace level.
#[derive(Debug, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { name, total_bytes } => {
                tracing::info!(dataset = %name, total_bytes, "download started");
            }
            ProgressEvent::Transferred { name, bytes, total_bytes } => {
                tracing::trace!(dataset = %name, bytes, total_bytes, "transferred");
            }
            ProgressEvent::Stage { name, stage } => tracing::debug!(dataset = %name, %stage, "stage"),
            ProgressEvent::Finished { name } => tracing::info!(dataset = %name, "dataset ready"),
        }
    }
}
