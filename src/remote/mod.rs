//! Remote data fetch
//!
//! The pipelines only consume text; how it is fetched sits behind
//! `RemoteFetcher`. `SshFetcher` is the production implementation.

mod exec;
mod ssh;
mod summary;

pub use exec::{run_with_timeout, CommandOutput};
pub use ssh::SshFetcher;
pub use summary::summarize_queue_listing;

use crate::config::JobConfig;
use crate::error::Result;

/// `user@host` of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub user: String,
    pub host: String,
}

impl SshTarget {
    pub fn from_job(job: &JobConfig) -> Self {
        Self {
            user: job.user.clone(),
            host: job.host.clone(),
        }
    }

    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

impl std::fmt::Display for SshTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

pub trait RemoteFetcher {
    /// Full process table (`ps -ef`) of the target
    fn process_listing(&self, target: &SshTarget) -> Result<String>;

    /// Contents of a file on the target
    fn read_file(&self, target: &SshTarget, path: &str) -> Result<String>;
}
