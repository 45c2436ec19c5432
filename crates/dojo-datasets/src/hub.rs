//! Download-verify-extract cache for catalog datasets.
//!
//! Pipeline per dataset:
//! `absent → downloading → downloaded → (verifying) → verified | checksum_failed
//! → extracting → ready`.
//!
//! Every failure path removes the transient archive before returning, and the
//! dataset directory only appears once extraction has fully succeeded, so a
//! retry after any error starts from a clean cache. The sequence is not atomic
//! across processes: callers must not resolve the same name concurrently.

use crate::archive::extract_archive;
use crate::catalog::{Catalog, DatasetDescriptor};
use crate::checksum::{checksum_matches, sha256_file};
use crate::error::{DatasetError, DatasetResult};
use crate::layout::CacheLayout;
use crate::loader::DatasetLoader;
use crate::progress::{LogProgressSink, ProgressEvent, ProgressSink, Stage};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REPO_URL: &str = "https://huggingface.co/datasets/nihongo-dojo/grpo-datasets/resolve/main/";

pub const CACHE_DIR_ENV: &str = "NIHONGO_DOJO_CACHE_DIR";
pub const REPO_URL_ENV: &str = "NIHONGO_DOJO_REPO_URL";

const DOWNLOAD_BUF_SIZE: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    pub cache_dir: PathBuf,
    pub repo_url: String,
}

impl HubConfig {
    /// Defaults, overridden by `NIHONGO_DOJO_CACHE_DIR` / `NIHONGO_DOJO_REPO_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Replace fields whose environment variable is set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var(REPO_URL_ENV) {
            self.repo_url = url;
        }
        self
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { cache_dir: CacheLayout::default_root(), repo_url: DEFAULT_REPO_URL.to_string() }
    }
}

/// Local state of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheState {
    Absent,
    /// Archive present but not extracted (an interrupted earlier attempt).
    Downloaded,
    Ready,
}

/// Catalog entry plus what is known about the local copy.
///
/// The `metadata.json` sidecar is kept whole under `metadata` rather than
/// flattened into the entry, so sidecar keys such as `name` or `checksum`
/// never shadow the catalog's own fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStatus {
    #[serde(flatten)]
    pub descriptor: DatasetDescriptor,
    pub is_downloaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

pub struct DatasetHub {
    layout: CacheLayout,
    repo_url: String,
    catalog: Catalog,
    client: reqwest::blocking::Client,
    progress: Arc<dyn ProgressSink>,
}

impl std::fmt::Debug for DatasetHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetHub")
            .field("cache_dir", &self.layout.root())
            .field("repo_url", &self.repo_url)
            .finish_non_exhaustive()
    }
}

impl DatasetHub {
    pub fn new(config: HubConfig) -> DatasetResult<Self> {
        Self::with_catalog(config, Catalog::builtin())
    }

    pub fn with_catalog(config: HubConfig, catalog: Catalog) -> DatasetResult<Self> {
        // No overall timeout: archives can be several hundred megabytes.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| DatasetError::Transfer { name: "<client>".to_string(), reason: e.to_string() })?;

        Ok(Self {
            layout: CacheLayout::new(config.cache_dir),
            repo_url: config.repo_url,
            catalog,
            client,
            progress: Arc::new(LogProgressSink),
        })
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        self.layout.root()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The static catalog. Returned descriptors are copies.
    #[must_use]
    pub fn list_available(&self) -> Vec<DatasetDescriptor> {
        self.catalog.list()
    }

    pub fn cache_state(&self, name: &str) -> DatasetResult<CacheState> {
        self.catalog.lookup(name)?;
        if self.layout.dataset_dir(name).is_dir() {
            Ok(CacheState::Ready)
        } else if self.layout.archive_path(name).is_file() {
            Ok(CacheState::Downloaded)
        } else {
            Ok(CacheState::Absent)
        }
    }

    /// Catalog entry for `name` with local status. A missing or unreadable
    /// `metadata.json` only drops the `metadata` field.
    pub fn describe(&self, name: &str) -> DatasetResult<DatasetStatus> {
        let descriptor = self.catalog.lookup(name)?;
        let dir = self.layout.dataset_dir(name);

        if !dir.is_dir() {
            return Ok(DatasetStatus { descriptor, is_downloaded: false, local_path: None, metadata: None });
        }

        let metadata = read_sidecar(&self.layout.metadata_path(name));
        Ok(DatasetStatus { descriptor, is_downloaded: true, local_path: Some(dir), metadata })
    }

    /// Local directory of `name`, downloading and extracting it first if needed.
    ///
    /// An existing directory is returned as-is unless `force_redownload` is set.
    /// With `verify`, the archive's sha256 must match the catalog before
    /// anything is extracted.
    pub fn resolve(&self, name: &str, force_redownload: bool, verify: bool) -> DatasetResult<PathBuf> {
        let descriptor = self.catalog.lookup(name)?;
        let dest = self.layout.dataset_dir(name);

        if dest.is_dir() && !force_redownload {
            tracing::debug!(dataset = name, path = %dest.display(), "cache hit");
            return Ok(dest);
        }

        self.layout.ensure_root()?;
        // Leftovers from an interrupted run are never trusted.
        self.layout.discard_archives(name)?;

        let archive = self.download(&descriptor)?;

        if verify {
            self.stage(name, Stage::Verifying);
            if let Err(e) = self.verify(&descriptor, &archive) {
                self.stage(name, Stage::ChecksumFailed);
                self.cleanup(name);
                return Err(e);
            }
            self.stage(name, Stage::Verified);
        } else {
            tracing::warn!(dataset = name, "checksum verification skipped");
        }

        self.stage(name, Stage::Extracting);
        let extracted = extract_archive(&archive, self.layout.root(), name);
        self.cleanup(name);
        let dir = extracted?;

        self.stage(name, Stage::Ready);
        self.progress.on_event(ProgressEvent::Finished { name: name.to_string() });
        tracing::info!(dataset = name, path = %dir.display(), "dataset ready");
        Ok(dir)
    }

    /// `resolve` with verification, then open the result.
    pub fn load(&self, name: &str) -> DatasetResult<DatasetLoader> {
        let dir = self.resolve(name, false, true)?;
        DatasetLoader::open(&dir)
    }

    #[must_use]
    pub fn archive_url(&self, descriptor: &DatasetDescriptor) -> String {
        join_url(&self.repo_url, &descriptor.url)
    }

    fn download(&self, descriptor: &DatasetDescriptor) -> DatasetResult<PathBuf> {
        let name = descriptor.name.as_str();
        let partial = self.layout.partial_archive_path(name);
        let url = self.archive_url(descriptor);

        self.stage(name, Stage::Downloading);
        tracing::info!(dataset = name, %url, size = %descriptor.compressed_size, "downloading dataset");

        let transfer = self
            .stream_to(&url, &partial, name)
            .and_then(|bytes| {
                std::fs::rename(&partial, self.layout.archive_path(name))
                    .map(|()| bytes)
                    .map_err(|e| transfer_error(name, e))
            });

        match transfer {
            Ok(bytes) => {
                self.stage(name, Stage::Downloaded);
                tracing::debug!(dataset = name, bytes, "archive downloaded");
                Ok(self.layout.archive_path(name))
            }
            Err(e) => {
                self.cleanup(name);
                Err(e)
            }
        }
    }

    fn stream_to(&self, url: &str, target: &Path, name: &str) -> DatasetResult<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| transfer_error(name, e))?;

        let total = response.content_length();
        self.progress.on_event(ProgressEvent::Started { name: name.to_string(), total_bytes: total });

        let mut file = std::fs::File::create(target).map_err(|e| transfer_error(name, e))?;
        let mut buf = vec![0u8; DOWNLOAD_BUF_SIZE];
        let mut written: u64 = 0;
        loop {
            let n = response.read(&mut buf).map_err(|e| transfer_error(name, e))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).map_err(|e| transfer_error(name, e))?;
            written += n as u64;
            self.progress.on_event(ProgressEvent::Transferred {
                name: name.to_string(),
                bytes: written,
                total_bytes: total,
            });
        }
        file.sync_all().map_err(|e| transfer_error(name, e))?;

        if let Some(expected) = total {
            if written != expected {
                return Err(DatasetError::Transfer {
                    name: name.to_string(),
                    reason: format!("stream ended after {written} of {expected} bytes"),
                });
            }
        }
        Ok(written)
    }

    fn verify(&self, descriptor: &DatasetDescriptor, archive: &Path) -> DatasetResult<()> {
        let actual = sha256_file(archive)?;
        if checksum_matches(&descriptor.checksum, &actual) {
            return Ok(());
        }
        tracing::warn!(dataset = %descriptor.name, expected = %descriptor.checksum, %actual, "checksum mismatch");
        Err(DatasetError::Integrity {
            name: descriptor.name.clone(),
            expected: descriptor.checksum.clone(),
            actual,
        })
    }

    fn cleanup(&self, name: &str) {
        if let Err(e) = self.layout.discard_archives(name) {
            tracing::warn!(dataset = name, error = %e, "failed to remove archive");
        }
    }

    fn stage(&self, name: &str, stage: Stage) {
        self.progress.on_event(ProgressEvent::Stage { name: name.to_string(), stage });
    }
}

fn transfer_error(name: &str, e: impl std::fmt::Display) -> DatasetError {
    DatasetError::Transfer { name: name.to_string(), reason: e.to_string() }
}

fn read_sidecar(path: &Path) -> Option<serde_json::Value> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no metadata sidecar");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable metadata sidecar");
            None
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
