//! Whole-file replacement through a sibling temp file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::StoreResult;

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("tally"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to `path` so that readers see either the old file or the
/// new one, never a partial write.
pub async fn write_atomic(path: &Path, contents: &str) -> StoreResult<()> {
    let tmp = temp_path(path);
    fs::write(&tmp, contents).await?;
    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    debug!(path = %path.display(), bytes = contents.len(), "File replaced");
    Ok(())
}

/// Reads `path`, treating a missing file as empty.
pub async fn read_or_empty(path: &Path) -> StoreResult<String> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}
