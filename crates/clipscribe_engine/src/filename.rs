use std::path::Path;

use clipscribe_core::{suffixed_filename, ARTIFACT_EXTENSION};
use sha2::{Digest, Sha256};

/// Pick an artifact name in `dir` that does not clobber another input's file.
///
/// A free `filename` is used as is. Otherwise the stem gets `-{short_hash(url)}`,
/// which is stable for the same input across runs, and is shortened so the
/// result keeps the usual length bound.
pub fn available_filename(dir: &Path, filename: &str, url: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }
    let stem = filename
        .strip_suffix(ARTIFACT_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(filename);
    suffixed_filename(stem, &short_hash(url))
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
