use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::error::Result;

/// Extensions treated as stitching artifacts.
const ARTIFACT_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

/// Delete image artifacts in `dir` whose modification time is older than
/// `max_age`. Subdirectories and other files are left alone. Files that
/// cannot be removed are logged and skipped.
///
/// Returns the removed paths, sorted.
pub fn cleanup_old_artifacts(dir: &Path, max_age: Duration) -> Result<Vec<PathBuf>> {
    let now = SystemTime::now();
    let mut removed = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let meta = entry.metadata()?;
        if !meta.is_file() || !is_artifact(&path) {
            continue;
        }
        let age = now
            .duration_since(meta.modified()?)
            .unwrap_or(Duration::ZERO);
        if age <= max_age {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), age_secs = age.as_secs(), "Removed old artifact");
                removed.push(path);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Could not remove artifact"),
        }
    }

    removed.sort();
    Ok(removed)
}

/// Prefix `name` with the current Unix time in seconds: `<secs>_<name>`.
pub fn timestamped_name(name: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{secs}_{name}")
}

fn is_artifact(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ARTIFACT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
