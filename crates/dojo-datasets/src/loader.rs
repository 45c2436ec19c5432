//! Reading task records out of an extracted dataset directory.

use crate::dataset::{DatasetMetadata, TaskRecord};
use crate::error::{DatasetError, DatasetResult};
use crate::layout::METADATA_FILE;
use flate2::read::GzDecoder;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DatasetLoader {
    dir: PathBuf,
    metadata: Option<DatasetMetadata>,
    files: Vec<PathBuf>,
}

impl DatasetLoader {
    /// Open `dir`, parsing `metadata.json` when present and collecting the
    /// `*.jsonl` / `*.jsonl.gz` record files in name order.
    pub fn open(dir: &Path) -> DatasetResult<Self> {
        if !dir.is_dir() {
            return Err(DatasetError::Invalid(format!("dataset directory does not exist: {}", dir.display())));
        }

        let metadata_path = dir.join(METADATA_FILE);
        let metadata = if metadata_path.is_file() {
            let bytes = std::fs::read(&metadata_path)?;
            Some(serde_json::from_slice::<DatasetMetadata>(&bytes)?)
        } else {
            None
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_record_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(DatasetError::Invalid(format!("no .jsonl files in {}", dir.display())));
        }

        Ok(Self { dir: dir.to_path_buf(), metadata, files })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&DatasetMetadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Streams records across all files; blank lines are skipped.
    #[must_use]
    pub fn records(&self) -> RecordIter {
        RecordIter { files: self.files.clone().into_iter(), current: None, line_no: 0 }
    }

    pub fn read_all(&self) -> DatasetResult<Vec<TaskRecord>> {
        self.records().collect()
    }

    /// Consecutive batches of `batch_size` records; the last may be shorter.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = DatasetResult<Vec<TaskRecord>>> + '_ {
        let batch_size = batch_size.max(1);
        let mut records = self.records();
        std::iter::from_fn(move || {
            let mut batch = Vec::with_capacity(batch_size);
            for rec in records.by_ref() {
                match rec {
                    Ok(r) => batch.push(r),
                    Err(e) => return Some(Err(e)),
                }
                if batch.len() == batch_size {
                    break;
                }
            }
            if batch.is_empty() { None } else { Some(Ok(batch)) }
        })
    }

    /// Up to `n` distinct records chosen with a seeded RNG.
    pub fn sample(&self, n: usize, seed: u64) -> DatasetResult<Vec<TaskRecord>> {
        let all = self.read_all()?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(all.choose_multiple(&mut rng, n).cloned().collect())
    }

    /// Task count from the sidecar, or by counting records.
    pub fn len(&self) -> DatasetResult<u64> {
        if let Some(meta) = &self.metadata {
            return Ok(meta.num_tasks);
        }
        let mut n = 0;
        for rec in self.records() {
            rec?;
            n += 1;
        }
        Ok(n)
    }

    pub fn is_empty(&self) -> DatasetResult<bool> {
        Ok(self.len()? == 0)
    }
}

pub struct RecordIter {
    files: std::vec::IntoIter<PathBuf>,
    current: Option<(PathBuf, Box<dyn BufRead>)>,
    line_no: usize,
}

impl Iterator for RecordIter {
    type Item = DatasetResult<TaskRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let path = self.files.next()?;
                match open_reader(&path) {
                    Ok(reader) => {
                        self.current = Some((path, reader));
                        self.line_no = 0;
                    }
                    Err(e) => return Some(Err(e)),
                }
            }

            let (path, reader) = self.current.as_mut()?;
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    self.current = None;
                }
                Ok(_) => {
                    self.line_no += 1;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let parsed = serde_json::from_str::<TaskRecord>(line).map_err(|e| {
                        DatasetError::Invalid(format!(
                            "failed to parse {} line {}: {}",
                            path.display(),
                            self.line_no,
                            e
                        ))
                    });
                    return Some(parsed);
                }
                Err(e) => {
                    self.current = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

/// Write `records` as one JSON object per line.
pub fn write_jsonl(path: &Path, records: &[TaskRecord]) -> DatasetResult<()> {
    let mut out = String::new();
    for rec in records {
        out.push_str(&serde_json::to_string(rec)?);
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

fn is_record_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".jsonl") || name.ends_with(".jsonl.gz")
}

fn open_reader(path: &Path) -> DatasetResult<Box<dyn BufRead>> {
    let file = std::fs::File::open(path)?;
    let is_gz = path.extension().is_some_and(|e| e == "gz");
    if is_gz {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
