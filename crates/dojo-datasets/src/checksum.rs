use crate::error::DatasetResult;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Read size for streaming digests.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Hex sha256 of everything `reader` yields, read in `CHUNK_SIZE` pieces.
pub fn sha256_reader<R: Read>(mut reader: R) -> DatasetResult<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256_file(path: &Path) -> DatasetResult<String> {
    let file = std::fs::File::open(path)?;
    sha256_reader(std::io::BufReader::new(file))
}

/// Case-insensitive comparison of two hex digests.
#[must_use]
pub fn checksum_matches(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}
