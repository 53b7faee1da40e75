//! Status records produced by a run
//!
//! A record is one metric observation: a service Up/Down state or a queue
//! replica count. Records are built once and never mutated.

mod queue;
mod services;

pub use queue::{parse_queue_listing, queue_records, QueueEntry};
pub use services::{check_service, evaluate_services};

use crate::config::JobConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Up => 1,
            Status::Down => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Up => "Up",
            Status::Down => "Down",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was observed for a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Service(Status),
    Queue { replica: u32 },
}

/// Where records come from: shared tags for every line of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub namespace: String,
    pub host: String,
    pub bank: String,
}

impl Origin {
    pub fn from_job(job: &JobConfig) -> Self {
        Self {
            namespace: job.metric_namespace.clone(),
            host: job.host.clone(),
            bank: job.bank.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    namespace: String,
    host: String,
    label: String,
    bank: String,
    reading: Reading,
}

impl StatusRecord {
    pub fn service(origin: &Origin, service: impl Into<String>, status: Status) -> Self {
        Self {
            namespace: origin.namespace.clone(),
            host: origin.host.clone(),
            label: service.into(),
            bank: origin.bank.clone(),
            reading: Reading::Service(status),
        }
    }

    pub fn queue(origin: &Origin, queue: impl Into<String>, replica: u32) -> Self {
        Self {
            namespace: origin.namespace.clone(),
            host: origin.host.clone(),
            label: queue.into(),
            bank: origin.bank.clone(),
            reading: Reading::Queue { replica },
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Service name or queue name
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bank(&self) -> &str {
        &self.bank
    }

    pub fn reading(&self) -> Reading {
        self.reading
    }

    /// Service status; queue records have none
    pub fn status(&self) -> Option<Status> {
        match self.reading {
            Reading::Service(status) => Some(status),
            Reading::Queue { .. } => None,
        }
    }

    pub fn replica(&self) -> Option<u32> {
        match self.reading {
            Reading::Queue { replica } => Some(replica),
            Reading::Service(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Origin {
            namespace: "XYZ.ABC".to_string(),
            host: "10.0.0.1".to_string(),
            bank: "ACME".to_string(),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Up.code(), 1);
        assert_eq!(Status::Down.code(), 0);
        assert_eq!(Status::Up.to_string(), "Up");
        assert_eq!(Status::Down.to_string(), "Down");
    }

    #[test]
    fn test_service_record_accessors() {
        let record = StatusRecord::service(&origin(), "svcA", Status::Up);
        assert_eq!(record.namespace(), "XYZ.ABC");
        assert_eq!(record.host(), "10.0.0.1");
        assert_eq!(record.label(), "svcA");
        assert_eq!(record.bank(), "ACME");
        assert_eq!(record.status(), Some(Status::Up));
        assert_eq!(record.replica(), None);
    }

    #[test]
    fn test_queue_record_accessors() {
        let record = StatusRecord::queue(&origin(), "orders", 7);
        assert_eq!(record.label(), "orders");
        assert_eq!(record.status(), None);
        assert_eq!(record.replica(), Some(7));
    }
}
