use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};

const CONFIG_FILE: &str = "config.yaml";

/// Directory layout a monitoring run works in.
///
/// ```text
/// <root>/
///   config.yaml
///   logs/      hourly-rotated run logs
///   locks/     one <job>.lock per job name
///   outfile/   raw listing snapshots
/// ```
#[derive(Debug, Clone)]
pub struct HomeDir {
    root: PathBuf,
}

impl HomeDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory containing the running executable, the default home.
    pub fn from_current_exe() -> Result<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| MonitorError::io("Failed to locate current executable", e))?;
        let root = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    pub fn outfile_dir(&self) -> PathBuf {
        self.root.join("outfile")
    }

    pub fn default_config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Create the logs and locks directories if missing.
    pub fn ensure(&self) -> Result<()> {
        for dir in [self.logs_dir(), self.locks_dir()] {
            fs::create_dir_all(&dir).map_err(|e| {
                MonitorError::io(format!("Failed to create directory {}", dir.display()), e)
            })?;
        }
        Ok(())
    }

    /// Path of the process listing snapshot for a host.
    pub fn process_snapshot_path(&self, host: &str) -> PathBuf {
        self.outfile_dir()
            .join(format!("ps_{}", host.replace('.', "_")))
    }
}
