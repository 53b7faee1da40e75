//! Configuration document and resolved job type definitions

use serde::Deserialize;
use std::time::Duration;

/// Highest service index read from a job entry (`service1`..`service14`)
pub const MAX_SERVICE_CHECKS: usize = 14;

pub const DEFAULT_SERVICE_NAMESPACE: &str = "XYZ.ABC";
pub const DEFAULT_QUEUE_NAMESPACE: &str = "Host.whatsup";

/// Root of `config.yaml`
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(rename = "ENV_URI")]
    pub env_uri: String,
    #[serde(rename = "Api_Token")]
    pub api_token: String,
    #[serde(default = "default_retention_days")]
    pub log_retention_days: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_http_connect_timeout_secs")]
    pub http_connect_timeout_secs: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Skip TLS certificate verification towards ENV_URI
    #[serde(default)]
    pub insecure_tls: bool,
    #[serde(default = "default_ssh_timeout_secs")]
    pub ssh_timeout_secs: u64,
    /// Job name -> flat job parameters. Kept untyped because service checks
    /// are numbered keys (`service1`, `service1_pattern`, ...).
    #[serde(default)]
    pub functions: serde_yaml::Mapping,
}

fn default_retention_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "info".into()
}

fn default_http_connect_timeout_secs() -> u64 {
    10
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_ssh_timeout_secs() -> u64 {
    60
}

/// Settings for delivering payloads to the ingestion endpoint
#[derive(Debug, Clone)]
pub struct SinkSettings {
    pub endpoint: String,
    pub api_token: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub insecure_tls: bool,
}

impl MonitorConfig {
    pub fn sink_settings(&self) -> SinkSettings {
        SinkSettings {
            endpoint: self.env_uri.clone(),
            api_token: self.api_token.clone(),
            connect_timeout: Duration::from_secs(self.http_connect_timeout_secs),
            timeout: Duration::from_secs(self.http_timeout_secs),
            insecure_tls: self.insecure_tls,
        }
    }

    pub fn ssh_timeout(&self) -> Duration {
        Duration::from_secs(self.ssh_timeout_secs)
    }

    /// Job names in configuration order
    pub fn job_names(&self) -> Vec<String> {
        self.functions
            .keys()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect()
    }
}

/// One monitored target, fully resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub name: String,
    pub host: String,
    pub user: String,
    pub bank: String,
    pub metric_namespace: String,
    pub kind: JobKind,
}

/// What a job checks. Selected by the explicit `kind` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Services(Vec<ServiceCheck>),
    Queue(QueueFile),
}

impl JobKind {
    pub fn tag(&self) -> &'static str {
        match self {
            JobKind::Services(_) => "service",
            JobKind::Queue(_) => "queue",
        }
    }
}

/// A pair of substrings whose joint presence on one process line means the
/// service is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCheck {
    pub name: String,
    pub pattern1: String,
    pub pattern2: String,
}

impl ServiceCheck {
    pub fn new(
        name: impl Into<String>,
        pattern1: impl Into<String>,
        pattern2: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern1: pattern1.into(),
            pattern2: pattern2.into(),
        }
    }

    /// Both patterns present
    pub fn is_evaluable(&self) -> bool {
        !self.pattern1.is_empty() && !self.pattern2.is_empty()
    }
}

/// Remote queue listing file and where its summary is kept locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFile {
    pub remote_path: String,
    pub local_path: String,
}
