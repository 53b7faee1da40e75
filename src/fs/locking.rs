//! Per-job run guard
//!
//! Uses `fs2` advisory locks on `<locks>/<job>.lock` so two invocations of the
//! same job never overlap. Acquisition is non-blocking: a held lock fails
//! immediately with `AlreadyRunning`.
//!
//! The lock lives as long as the open file descriptor. Dropping the handle,
//! or the process dying, releases it; nothing has to be cleaned up.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};
use crate::validation::validate_job_name;

pub struct RunGuard;

impl RunGuard {
    /// Lock file path for a job name.
    pub fn lock_path(locks_dir: &Path, job_name: &str) -> PathBuf {
        locks_dir.join(format!("{job_name}.lock"))
    }

    /// Try to take the exclusive lock for `job_name` without waiting.
    pub fn acquire(locks_dir: &Path, job_name: &str) -> Result<LockHandle> {
        validate_job_name(job_name)?;

        let path = Self::lock_path(locks_dir, job_name);
        // Not truncated: the file only exists to carry the lock
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                MonitorError::io(format!("Failed to open lock file {}", path.display()), e)
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(LockHandle {
                job: job_name.to_string(),
                path,
                file,
            }),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(MonitorError::AlreadyRunning {
                    job: job_name.to_string(),
                    path,
                })
            }
            Err(e) => Err(MonitorError::io(
                format!("Failed to lock {}", path.display()),
                e,
            )),
        }
    }
}

/// An acquired run lock. Released on `release()` or drop.
#[derive(Debug)]
pub struct LockHandle {
    job: String,
    path: PathBuf,
    file: File,
}

impl LockHandle {
    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly for an orderly shutdown.
    pub fn release(self) -> Result<()> {
        match self.file.unlock() {
            Ok(()) => {
                tracing::debug!(job = %self.job, "Run lock released");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(job = %self.job, error = %e, "Run lock unlock failed");
                Err(MonitorError::io(
                    format!("Failed to unlock {}", self.path.display()),
                    e,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let temp = TempDir::new().unwrap();
        let handle = RunGuard::acquire(temp.path(), "app01").unwrap();

        assert_eq!(handle.job(), "app01");
        assert_eq!(handle.path(), temp.path().join("app01.lock"));
        assert!(handle.path().exists());
    }

    #[test]
    fn test_second_acquire_fails_immediately() {
        let temp = TempDir::new().unwrap();
        let _held = RunGuard::acquire(temp.path(), "app01").unwrap();

        let start = Instant::now();
        let result = RunGuard::acquire(temp.path(), "app01");

        assert!(matches!(
            result,
            Err(MonitorError::AlreadyRunning { ref job, .. }) if job == "app01"
        ));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_different_jobs_do_not_contend() {
        let temp = TempDir::new().unwrap();
        let _a = RunGuard::acquire(temp.path(), "app01").unwrap();
        let _b = RunGuard::acquire(temp.path(), "mq01").unwrap();
    }

    #[test]
    fn test_release_allows_reacquire() {
        let temp = TempDir::new().unwrap();
        let handle = RunGuard::acquire(temp.path(), "app01").unwrap();
        handle.release().unwrap();

        assert!(RunGuard::acquire(temp.path(), "app01").is_ok());
    }

    #[test]
    fn test_drop_without_release_allows_reacquire() {
        let temp = TempDir::new().unwrap();
        {
            let _handle = RunGuard::acquire(temp.path(), "app01").unwrap();
        }

        assert!(RunGuard::acquire(temp.path(), "app01").is_ok());
    }

    #[test]
    fn test_concurrent_acquire_has_single_winner() {
        let temp = TempDir::new().unwrap();
        let locks_dir = temp.path().to_path_buf();
        let _held = RunGuard::acquire(&locks_dir, "app01").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks_dir = locks_dir.clone();
                thread::spawn(move || RunGuard::acquire(&locks_dir, "app01").is_err())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_invalid_job_name_rejected_before_touching_disk() {
        let temp = TempDir::new().unwrap();
        let result = RunGuard::acquire(temp.path(), "../escape");

        assert!(matches!(result, Err(MonitorError::InvalidJobName { .. })));
        assert!(!temp.path().join("../escape.lock").exists());
    }
}
