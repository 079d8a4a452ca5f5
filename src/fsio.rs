//! JSON document IO with atomic replace semantics
//!
//! Every persisted document (manifests, metrics, output manifests) is written
//! to a temp file in the destination directory, synced, then renamed over the
//! target. A concurrent reader sees either the previous snapshot or the new
//! one, never a partial write.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

/// Read and deserialize a JSON document.
///
/// # Errors
/// Returns error if the file cannot be read or does not match `T`
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&text)?)
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
///
/// # Errors
/// Returns error if serialization or any filesystem step fails
pub fn dump_json<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    atomic_write(path.as_ref(), text.as_bytes())
}

/// Write bytes to `path` atomically (temp file + rename on the same filesystem).
///
/// # Errors
/// Returns error if the temp file cannot be written or renamed
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    replace_via_temp(path, |file| file.write_all(data))
}

/// Run `write` against a temp file beside `path`, sync it, and rename it
/// over `path`. The temp file is removed on every failure.
fn replace_via_temp(path: &Path, write: impl FnOnce(&mut File) -> io::Result<()>) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Other(format!("Path has no file name: {}", path.display())))?;

    let temp_path = parent.join(format!(
        ".tmp_{}_{}",
        std::process::id(),
        file_name.to_string_lossy()
    ));

    let staged = File::create(&temp_path).and_then(|mut file| {
        write(&mut file)?;
        file.sync_all()
    });

    // Rename temp to final (atomic on POSIX)
    if let Err(err) = staged.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}
