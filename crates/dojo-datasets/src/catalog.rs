//! Static registry of published dataset archives.

use crate::error::{DatasetError, DatasetResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra_large",
        };
        f.write_str(s)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    pub task_count: u64,
    pub size_class: SizeClass,
    pub description: String,
    /// Archive location, relative to the hub's repository URL unless absolute.
    pub url: String,
    /// Hex-encoded sha256 of the archive.
    pub checksum: String,
    pub compressed_size: String,
}

struct Entry {
    name: &'static str,
    task_count: u64,
    size_class: SizeClass,
    description: &'static str,
    url: &'static str,
    checksum: &'static str,
    compressed_size: &'static str,
}

// Checksums are filled in per deployment (see `Catalog::with_checksum`).
const BUILTIN: [Entry; 6] = [
    Entry {
        name: "nihongo-dojo-10k",
        task_count: 10_000,
        size_class: SizeClass::Small,
        description: "Basic 10,000-task dataset for testing and development",
        url: "nihongo-dojo-10k.tar.gz",
        checksum: "placeholder_checksum_10k",
        compressed_size: "~50MB",
    },
    Entry {
        name: "nihongo-dojo-50k",
        task_count: 50_000,
        size_class: SizeClass::Medium,
        description: "Medium 50,000-task dataset for small-model training",
        url: "nihongo-dojo-50k.tar.gz",
        checksum: "placeholder_checksum_50k",
        compressed_size: "~250MB",
    },
    Entry {
        name: "nihongo-dojo-100k",
        task_count: 100_000,
        size_class: SizeClass::Large,
        description: "Standard 100,000-task dataset (recommended)",
        url: "nihongo-dojo-100k.tar.gz",
        checksum: "placeholder_checksum_100k",
        compressed_size: "~500MB",
    },
    Entry {
        name: "nihongo-dojo-500k",
        task_count: 500_000,
        size_class: SizeClass::ExtraLarge,
        description: "Large 500,000-task dataset for high-capacity models",
        url: "nihongo-dojo-500k.tar.gz",
        checksum: "placeholder_checksum_500k",
        compressed_size: "~2.5GB",
    },
    Entry {
        name: "nihongo-dojo-beginner",
        task_count: 100_000,
        size_class: SizeClass::Large,
        description: "Beginner-level focused dataset",
        url: "nihongo-dojo-beginner-100k.tar.gz",
        checksum: "placeholder_checksum_beginner",
        compressed_size: "~400MB",
    },
    Entry {
        name: "nihongo-dojo-business",
        task_count: 50_000,
        size_class: SizeClass::Medium,
        description: "Business Japanese focused dataset",
        url: "nihongo-dojo-business-50k.tar.gz",
        checksum: "placeholder_checksum_business",
        compressed_size: "~300MB",
    },
];

impl Entry {
    fn to_descriptor(&self) -> DatasetDescriptor {
        DatasetDescriptor {
            name: self.name.to_string(),
            task_count: self.task_count,
            size_class: self.size_class,
            description: self.description.to_string(),
            url: self.url.to_string(),
            checksum: self.checksum.to_string(),
            compressed_size: self.compressed_size.to_string(),
        }
    }
}

/// Ordered, immutable set of dataset descriptors.
///
/// Reads hand out clones; nothing a caller does to a returned descriptor
/// reaches the catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<DatasetDescriptor>,
}

impl Catalog {
    #[must_use]
    pub fn builtin() -> Self {
        Self { entries: BUILTIN.iter().map(Entry::to_descriptor).collect() }
    }

    /// Replace the expected checksum of one entry. Unknown names are ignored.
    #[must_use]
    pub fn with_checksum(mut self, name: &str, checksum: &str) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.checksum = checksum.to_ascii_lowercase();
        }
        self
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    #[must_use]
    pub fn list(&self) -> Vec<DatasetDescriptor> {
        self.entries.clone()
    }

    pub fn lookup(&self, name: &str) -> DatasetResult<DatasetDescriptor> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .cloned()
            .ok_or_else(|| DatasetError::NotFound { name: name.to_string(), available: self.names() })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_six_presets() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.names(),
            vec![
                "nihongo-dojo-10k",
                "nihongo-dojo-50k",
                "nihongo-dojo-100k",
                "nihongo-dojo-500k",
                "nihongo-dojo-beginner",
                "nihongo-dojo-business",
            ]
        );
    }

    #[test]
    fn test_list_is_copy_on_read() {
        let catalog = Catalog::builtin();
        let mut listed = catalog.list();
        listed[0].task_count = 1;
        listed.clear();

        assert_eq!(catalog.list().len(), 6);
        assert_eq!(catalog.lookup("nihongo-dojo-10k").unwrap().task_count, 10_000);
    }

    #[test]
    fn test_lookup_unknown_lists_valid_names() {
        let err = Catalog::builtin().lookup("nihongo-dojo-1m").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nihongo-dojo-1m"));
        assert!(msg.contains("nihongo-dojo-business"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_with_checksum_overrides_single_entry() {
        let catalog = Catalog::builtin().with_checksum("nihongo-dojo-50k", "ABCDEF");
        assert_eq!(catalog.lookup("nihongo-dojo-50k").unwrap().checksum, "abcdef");
        assert_eq!(catalog.lookup("nihongo-dojo-10k").unwrap().checksum, "placeholder_checksum_10k");
    }
}
