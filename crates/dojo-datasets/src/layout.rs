use crate::error::DatasetResult;
use std::path::{Path, PathBuf};

pub const METADATA_FILE: &str = "metadata.json";

/// Filesystem layout of the dataset cache.
///
/// Default layout is `~/.cache/nihongo_dojo/<name>/...`, with transient
/// `<name>.tar.gz.part` / `<name>.tar.gz` files next to the dataset directories.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Layout under the user's cache directory, falling back to `./.cache`.
    #[must_use]
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("nihongo_dojo")
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn dataset_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    #[must_use]
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.tar.gz"))
    }

    /// Download target; renamed to `archive_path` once the stream completes.
    #[must_use]
    pub fn partial_archive_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.tar.gz.part"))
    }

    #[must_use]
    pub fn metadata_path(&self, name: &str) -> PathBuf {
        self.dataset_dir(name).join(METADATA_FILE)
    }

    pub fn ensure_root(&self) -> DatasetResult<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Remove any transient archive files for `name`. Missing files are fine.
    pub fn discard_archives(&self, name: &str) -> DatasetResult<()> {
        for path in [self.partial_archive_path(name), self.archive_path(name)] {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed archive"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl Default for CacheLayout {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let temp = TempDir::new().unwrap();
        let layout = CacheLayout::new(temp.path().to_path_buf());

        assert_eq!(layout.dataset_dir("nihongo-dojo-10k"), temp.path().join("nihongo-dojo-10k"));
        assert!(layout.archive_path("x").to_string_lossy().ends_with("x.tar.gz"));
        assert!(layout.partial_archive_path("x").to_string_lossy().ends_with("x.tar.gz.part"));
        assert!(layout.metadata_path("x").ends_with("x/metadata.json"));
    }

    #[test]
    fn test_discard_archives_tolerates_missing() {
        let temp = TempDir::new().unwrap();
        let layout = CacheLayout::new(temp.path().to_path_buf());
        std::fs::write(layout.partial_archive_path("x"), b"half").unwrap();

        layout.discard_archives("x").unwrap();
        assert!(!layout.partial_archive_path("x").exists());
        assert!(!layout.archive_path("x").exists());
    }
}
