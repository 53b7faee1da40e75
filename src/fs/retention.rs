//! Log retention: prune files in the logs directory older than N days

use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};

/// Remove regular files in `log_dir` whose mtime is older than
/// `retention_days` before `now`. Returns the removed paths.
///
/// Per-file failures are logged and skipped; only an unreadable directory
/// is an error. A retention too large to subtract from `now` keeps every
/// file.
pub fn purge_old_logs(
    log_dir: &Path,
    retention_days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<PathBuf>> {
    let Some(cutoff) = Duration::try_days(i64::from(retention_days))
        .and_then(|retention| now.checked_sub_signed(retention))
    else {
        tracing::debug!(
            retention_days,
            "Retention window exceeds calendar range, nothing to purge"
        );
        return Ok(Vec::new());
    };
    let entries = fs::read_dir(log_dir).map_err(|e| {
        MonitorError::io(format!("Failed to read log directory {}", log_dir.display()), e)
    })?;

    let mut purged = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };

        if DateTime::<Utc>::from(modified) < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Purged old log file");
                    purged.push(path);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Error purging log file");
                }
            }
        }
    }

    Ok(purged)
}
