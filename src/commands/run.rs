//! Run command - one monitoring job from lock to delivery

use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::config::{JobConfig, JobKind, MonitorConfig, QueueFile};
use crate::encode::encode;
use crate::error::Result;
use crate::fs::{purge_old_logs, HomeDir, RunGuard};
use crate::remote::{summarize_queue_listing, RemoteFetcher, SshTarget};
use crate::sink::MetricSink;
use crate::status::{evaluate_services, parse_queue_listing, queue_records, Origin};

/// How a run ended when nothing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Payload delivered
    Sent { lines: usize },
    /// No records, the sink was not called
    NothingToSend,
}

/// Execute `job_name`: take the run lock, prune old logs, resolve the job,
/// fetch, evaluate, and deliver.
///
/// The lock is released before returning on every path that gets past
/// acquisition, including fetch and transport failures.
pub fn execute(
    home: &HomeDir,
    config: &MonitorConfig,
    job_name: &str,
    fetcher: &dyn RemoteFetcher,
    sink: &dyn MetricSink,
) -> Result<RunOutcome> {
    let lock = RunGuard::acquire(&home.locks_dir(), job_name)?;
    tracing::debug!(job = job_name, lock = %lock.path().display(), "Run lock acquired");

    match purge_old_logs(&home.logs_dir(), config.log_retention_days, Utc::now()) {
        Ok(purged) if !purged.is_empty() => {
            tracing::info!(count = purged.len(), "Purged old log files");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Log retention skipped"),
    }

    let result = config
        .resolve(job_name)
        .and_then(|job| run_job(home, &job, fetcher, sink));

    if let Err(e) = lock.release() {
        tracing::warn!(error = %e, "Failed to release run lock");
    }
    result
}

/// Run an already-resolved job with the given collaborators
pub fn run_job(
    home: &HomeDir,
    job: &JobConfig,
    fetcher: &dyn RemoteFetcher,
    sink: &dyn MetricSink,
) -> Result<RunOutcome> {
    tracing::info!(job = %job.name, kind = job.kind.tag(), host = %job.host, "Starting job");

    let target = SshTarget::from_job(job);
    let origin = Origin::from_job(job);

    let records = match &job.kind {
        JobKind::Services(checks) => {
            if checks.is_empty() {
                tracing::warn!(job = %job.name, "Service job has no service entries");
            }
            let listing = fetch_process_listing(home, fetcher, &target)?;
            evaluate_services(&listing, checks, &origin)
        }
        JobKind::Queue(queue_file) => {
            let summary = fetch_queue_summary(fetcher, &target, queue_file)?;
            let queues = parse_queue_listing(&summary);
            if queues.is_empty() {
                tracing::error!(job = %job.name, "No valid queue data found to send");
            }
            queue_records(&queues, &origin)
        }
    };

    let payload = encode(&records);
    if payload.is_empty() {
        tracing::info!(job = %job.name, "Empty payload, nothing to send");
        return Ok(RunOutcome::NothingToSend);
    }

    sink.send(&payload)?;
    let lines = payload.lines().count();
    tracing::info!(job = %job.name, lines, "Metrics delivered");
    Ok(RunOutcome::Sent { lines })
}

fn fetch_process_listing(
    home: &HomeDir,
    fetcher: &dyn RemoteFetcher,
    target: &SshTarget,
) -> Result<String> {
    tracing::info!(remote = %target, "Fetching process listing");
    let listing = fetcher.process_listing(target)?;

    let snapshot = home.process_snapshot_path(&target.host);
    match write_snapshot(&snapshot, &listing) {
        Ok(()) => tracing::info!(path = %snapshot.display(), "Process listing saved"),
        Err(e) => {
            tracing::warn!(path = %snapshot.display(), error = %e, "Could not save process listing")
        }
    }
    Ok(listing)
}

fn fetch_queue_summary(
    fetcher: &dyn RemoteFetcher,
    target: &SshTarget,
    queue_file: &QueueFile,
) -> Result<String> {
    tracing::info!(remote = %target, path = %queue_file.remote_path, "Fetching queue listing");
    let raw = fetcher.read_file(target, &queue_file.remote_path)?;
    let summary = summarize_queue_listing(&raw);

    let local = Path::new(&queue_file.local_path);
    match write_snapshot(local, &summary) {
        Ok(()) => tracing::info!(path = %local.display(), "Queue summary saved"),
        Err(e) => {
            tracing::warn!(path = %local.display(), error = %e, "Could not save queue summary")
        }
    }
    Ok(summary)
}

fn write_snapshot(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
