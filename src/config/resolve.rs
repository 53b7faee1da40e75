//! Loading `config.yaml` and resolving a named job from the `functions` map

use serde_yaml::{Mapping, Value};
use std::path::Path;

use super::types::{
    JobConfig, JobKind, MonitorConfig, QueueFile, ServiceCheck, DEFAULT_QUEUE_NAMESPACE,
    DEFAULT_SERVICE_NAMESPACE, MAX_SERVICE_CHECKS,
};
use crate::error::{MonitorError, Result};
use crate::validation::validate_remote_identity;

impl MonitorConfig {
    /// Read and parse the configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MonitorError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            MonitorError::ConfigLoad { reason, .. } => MonitorError::ConfigLoad {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Parse configuration content (for testing without file system)
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| MonitorError::ConfigLoad {
            path: "<inline>".into(),
            reason: e.to_string(),
        })
    }

    /// Look up `job_name` under `functions` and build its typed config
    pub fn resolve(&self, job_name: &str) -> Result<JobConfig> {
        let entry = self
            .functions
            .get(job_name)
            .ok_or_else(|| MonitorError::JobNotFound(job_name.to_string()))?;

        let map = entry.as_mapping().ok_or_else(|| MonitorError::InvalidField {
            job: job_name.to_string(),
            field: "functions".to_string(),
            reason: "job entry must be a mapping".to_string(),
        })?;

        resolve_job(job_name, map)
    }
}

fn resolve_job(job: &str, map: &Mapping) -> Result<JobConfig> {
    let host = required(job, map, "server")?;
    let user = required(job, map, "username")?;
    let bank = required(job, map, "bankname")?;
    validate_remote_identity(job, "server", &host)?;
    validate_remote_identity(job, "username", &user)?;

    let kind = match required(job, map, "kind")?.as_str() {
        "service" => JobKind::Services(service_checks(job, map)?),
        "queue" => JobKind::Queue(QueueFile {
            remote_path: required(job, map, "remote_input_file")?,
            local_path: required(job, map, "local_file")?,
        }),
        other => {
            return Err(MonitorError::InvalidField {
                job: job.to_string(),
                field: "kind".to_string(),
                reason: format!("expected 'service' or 'queue', got '{other}'"),
            })
        }
    };

    let metric_namespace = match optional(job, map, "metric_namespace")? {
        Some(ns) if !ns.is_empty() => ns,
        _ => match kind {
            JobKind::Services(_) => DEFAULT_SERVICE_NAMESPACE.to_string(),
            JobKind::Queue(_) => DEFAULT_QUEUE_NAMESPACE.to_string(),
        },
    };

    Ok(JobConfig {
        name: job.to_string(),
        host,
        user,
        bank,
        metric_namespace,
        kind,
    })
}

/// Collect `serviceN` / `serviceN_pattern` / `serviceN_pattern2` triples in
/// index order. Missing patterns become empty strings; evaluation reports
/// those services as Down.
fn service_checks(job: &str, map: &Mapping) -> Result<Vec<ServiceCheck>> {
    warn_on_ignored_services(job, map);

    let mut checks = Vec::new();
    for i in 1..=MAX_SERVICE_CHECKS {
        let key = format!("service{i}");
        if !map.contains_key(key.as_str()) {
            continue;
        }
        let name = required(job, map, &key)?;
        let pattern1 = optional(job, map, &format!("{key}_pattern"))?.unwrap_or_default();
        let pattern2 = optional(job, map, &format!("{key}_pattern2"))?.unwrap_or_default();
        checks.push(ServiceCheck::new(name, pattern1, pattern2));
    }
    Ok(checks)
}

fn warn_on_ignored_services(job: &str, map: &Mapping) {
    for key in map.keys().filter_map(Value::as_str) {
        let index = key
            .strip_prefix("service")
            .and_then(|rest| rest.parse::<usize>().ok());
        if let Some(index) = index {
            if index > MAX_SERVICE_CHECKS {
                tracing::warn!(
                    job,
                    key,
                    "Service index above {MAX_SERVICE_CHECKS} is ignored"
                );
            }
        }
    }
}

/// A required, non-empty scalar field
fn required(job: &str, map: &Mapping, field: &str) -> Result<String> {
    match optional(job, map, field)? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(MonitorError::MissingField {
            job: job.to_string(),
            field: field.to_string(),
        }),
    }
}

/// An optional scalar field. Numbers and booleans are accepted as their
/// textual form since YAML parses `bankname: 042` or `username: 1001` that way.
fn optional(job: &str, map: &Mapping, field: &str) -> Result<Option<String>> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(MonitorError::InvalidField {
            job: job.to_string(),
            field: field.to_string(),
            reason: "expected a scalar value".to_string(),
        }),
    }
}
