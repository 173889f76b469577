//! Filesystem helpers shared by the file-backed version store, the config
//! loader and the scaffolder.

pub mod lock;
pub mod slug;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temp path used by [`atomic_write`]: `.<name>.tmp` next to the target.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("stepwise");
    let temp_name = format!(".{}.tmp", name);
    match path.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    }
}

/// Write `contents` to `path` via a temp file in the same directory and a rename.
///
/// The temp file is removed if the rename fails.
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, contents)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
