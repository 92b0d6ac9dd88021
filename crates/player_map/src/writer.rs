//! JSON output
//!
//! The map is rendered with 4-space indentation, written to a uniquely
//! named temp file in the target directory, synced and persisted over the
//! target. A failed run never leaves a truncated map or a stray temp file
//! behind.

use crate::error::Result;
use crate::mapper::PlayerMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Render `map` as a 4-space indented JSON object.
pub fn to_json_bytes(map: &PlayerMap) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut bytes, formatter);
    map.serialize(&mut ser)?;
    Ok(bytes)
}

/// What was written.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub size: u64,
    /// SHA-256 of the file contents (hex)
    pub checksum: String,
}

/// Write `map` to `path`, replacing any existing file.
pub fn write_map(map: &PlayerMap, path: &Path) -> Result<WrittenFile> {
    let bytes = to_json_bytes(map)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    // removed on drop if any step before persist fails
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.flush()?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    let written = WrittenFile { size: bytes.len() as u64, checksum: checksum(&bytes) };
    info!(path = %path.display(), entries = map.len(), bytes = written.size, "map written");
    Ok(written)
}

pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Check that `path` still has the contents summarized by `checksum`
/// and parses back into a map.
pub fn verify_map(path: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(path)?;
    if checksum(&bytes) != expected_checksum {
        return Ok(false);
    }
    let _: PlayerMap = serde_json::from_slice(&bytes)?;
    Ok(true)
}
