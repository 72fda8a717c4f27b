//! Atomic file replacement
//!
//! Content is written to a temporary file in the destination directory and
//! renamed over the target, so readers see either the old or the new file.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

pub fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
