//! Error type shared by every stage of a monitoring run

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for structural failures (arguments, config, lock, fetch)
pub const EXIT_STRUCTURAL: u8 = 1;

/// Exit code when the payload could not be delivered to the metric endpoint
pub const EXIT_TRANSPORT: u8 = 2;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Another instance of job '{job}' is already running (lock: {})", path.display())]
    AlreadyRunning { job: String, path: PathBuf },

    #[error("Failed to load configuration from {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("Job '{0}' not found in configuration")]
    JobNotFound(String),

    #[error("Job '{job}' is missing required field '{field}'")]
    MissingField { job: String, field: String },

    #[error("Job '{job}' has invalid value for '{field}': {reason}")]
    InvalidField {
        job: String,
        field: String,
        reason: String,
    },

    #[error("Invalid job name '{name}': {reason}")]
    InvalidJobName { name: String, reason: String },

    #[error("Remote fetch from {target} failed: {reason}")]
    RemoteFetch { target: String, reason: String },

    #[error("Failed to set up metric sink: {0}")]
    SinkSetup(String),

    #[error("Metric transport failed: {0}")]
    Transport(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl MonitorError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        MonitorError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code this error maps to
    pub fn exit_code(&self) -> u8 {
        match self {
            MonitorError::Transport(_) => EXIT_TRANSPORT,
            _ => EXIT_STRUCTURAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_maps_to_distinct_exit_code() {
        let err = MonitorError::Transport("HTTP 500".to_string());
        assert_eq!(err.exit_code(), EXIT_TRANSPORT);
    }

    #[test]
    fn test_structural_errors_exit_one() {
        let errors = [
            MonitorError::JobNotFound("app01".to_string()),
            MonitorError::AlreadyRunning {
                job: "app01".to_string(),
                path: PathBuf::from("/tmp/app01.lock"),
            },
            MonitorError::RemoteFetch {
                target: "monitor@host".to_string(),
                reason: "exit status 255".to_string(),
            },
            MonitorError::SinkSetup("TLS backend unavailable".to_string()),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), EXIT_STRUCTURAL);
        }
    }

    #[test]
    fn test_missing_field_message_names_job_and_field() {
        let err = MonitorError::MissingField {
            job: "mq01".to_string(),
            field: "bankname".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Job 'mq01' is missing required field 'bankname'"
        );
    }
}
