//! Script persistence: write to `<path>.part`, fsync, then rename into place,
//! so a failed conversion or write never leaves a truncated script behind.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `script.js` → `script.js.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `script` to `path` atomically.
pub fn write_script(path: &Path, script: &str) -> Result<()> {
    let tmp = temp_path(path);
    let result = write_and_rename(&tmp, path, script);
    if result.is_err() {
        // Best effort; report the write error, not the cleanup.
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_and_rename(tmp: &Path, path: &Path, script: &str) -> Result<()> {
    let mut file =
        File::create(tmp).with_context(|| format!("create {}", tmp.display()))?;
    file.write_all(script.as_bytes())
        .with_context(|| format!("write {}", tmp.display()))?;
    file.sync_all()
        .with_context(|| format!("sync {}", tmp.display()))?;
    drop(file);

    std::fs::rename(tmp, path)
        .with_context(|| format!("failed to rename {} to {}", tmp.display(), path.display()))?;
    tracing::debug!(path = %path.display(), bytes = script.len(), "wrote script");
    Ok(())
}
