//! gzip'd tar packing and staged extraction.

use crate::checksum::sha256_file;
use crate::dataset::validate_records;
use crate::error::{DatasetError, DatasetResult};
use crate::loader::DatasetLoader;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::{Archive, Builder};

/// Extract `archive` so that its dataset ends up at `dest_root/<name>`.
///
/// Entries are unpacked into a staging directory inside `dest_root` and moved
/// into place only after the whole archive has been read. Archives rooted at a
/// `<name>/` directory and archives with files at the top level are both
/// accepted. An existing `dest_root/<name>` is replaced.
pub fn extract_archive(archive: &Path, dest_root: &Path, name: &str) -> DatasetResult<PathBuf> {
    std::fs::create_dir_all(dest_root)?;
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{name}-extract-"))
        .tempdir_in(dest_root)?;

    let file = File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(file));
    tar.unpack(staging.path())
        .map_err(|e| DatasetError::Archive(format!("failed to unpack {}: {e}", archive.display())))?;

    let nested = staging.path().join(name);
    let source = if nested.is_dir() { nested } else { staging.path().to_path_buf() };

    let dest = dest_root.join(name);
    if dest.exists() {
        std::fs::remove_dir_all(&dest)?;
    }
    std::fs::rename(&source, &dest)?;
    tracing::debug!(dataset = name, dest = %dest.display(), "archive extracted");

    // Dropping `staging` removes whatever is left (nothing, if it was moved).
    drop(staging);
    Ok(dest)
}

/// Pack `dataset_dir` into `output` with the directory name as archive root.
/// Every record is parsed and checked first; nothing is written for an
/// invalid dataset.
///
/// Returns the archive's sha256, suitable for a catalog entry.
pub fn pack_dataset_dir(dataset_dir: &Path, output: &Path) -> DatasetResult<String> {
    if !dataset_dir.is_dir() {
        return Err(DatasetError::Invalid(format!(
            "not a dataset directory: {}",
            dataset_dir.display()
        )));
    }
    let root_name = dataset_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DatasetError::Invalid(format!("unnamed dataset directory: {}", dataset_dir.display())))?;

    let records = DatasetLoader::open(dataset_dir)?.read_all()?;
    validate_records(&records)?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output)?;
    let enc = GzEncoder::new(file, Compression::default());
    let mut tar = Builder::new(enc);
    tar.append_dir_all(root_name, dataset_dir)?;
    tar.into_inner()?.finish()?;

    let checksum = sha256_file(output)?;
    tracing::info!(archive = %output.display(), %checksum, "dataset packed");
    Ok(checksum)
}
