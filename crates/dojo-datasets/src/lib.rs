//! Nihongo DoJo datasets
//!
//! Local cache of the published task datasets:
//! - A fixed catalog of six dataset archives (`Catalog`)
//! - Download, sha256 verification and extraction into a cache directory (`DatasetHub`)
//! - Reading task records back out of an extracted dataset (`DatasetLoader`)
//! - Packing a dataset directory into a publishable archive (`pack_dataset_dir`)

pub mod archive;
pub mod catalog;
pub mod checksum;
pub mod dataset;
pub mod error;
pub mod hub;
pub mod layout;
pub mod loader;
pub mod progress;

pub use archive::{extract_archive, pack_dataset_dir};
pub use catalog::{Catalog, DatasetDescriptor, SizeClass};
pub use checksum::{sha256_file, sha256_reader};
pub use dataset::{DatasetMetadata, TaskRecord, validate_records};
pub use error::{DatasetError, DatasetResult};
pub use hub::{CacheState, DatasetHub, DatasetStatus, HubConfig, DEFAULT_REPO_URL};
pub use layout::CacheLayout;
pub use loader::{DatasetLoader, RecordIter, write_jsonl};
pub use progress::{LogProgressSink, ProgressEvent, ProgressSink, Stage};
