//! SHA-256 file digests for change detection.
//!
//! Used by [`crate::stager::OverwritePolicy::SkipIdentical`] to leave a
//! destination untouched when it already holds the same bytes as its source.

use camino::Utf8Path;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// Reads the file in chunks so large static libraries are not loaded into
/// memory at once.
///
/// # Errors
///
/// Returns any I/O error raised while opening or reading the file.
pub fn sha256_file(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Whether two files have identical contents.
///
/// Sizes are compared first; digests are only computed when they agree.
///
/// # Errors
///
/// Returns any I/O error raised while reading either file.
pub fn same_contents(a: &Utf8Path, b: &Utf8Path) -> io::Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(sha256_file(a)? == sha256_file(b)?)
}
