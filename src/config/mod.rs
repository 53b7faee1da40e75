//! Configuration loading and job resolution
//!
//! This module handles:
//! - Parsing `config.yaml` (shared settings plus the `functions` map)
//! - Resolving one named job into a typed `JobConfig`
//! - Whole-document validation for preflight checks

mod resolve;
mod types;
mod validation;

pub use types::{
    JobConfig, JobKind, MonitorConfig, QueueFile, ServiceCheck, SinkSettings,
    DEFAULT_QUEUE_NAMESPACE, DEFAULT_SERVICE_NAMESPACE, MAX_SERVICE_CHECKS,
};
pub use validation::{validate, ValidationError};
