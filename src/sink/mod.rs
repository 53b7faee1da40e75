//! Metric delivery
//!
//! Pipelines hand a non-empty encoded payload to a `MetricSink`.
//! `HttpMetricSink` posts it to the ingestion endpoint.

mod http;

pub use http::{HttpMetricSink, API_TOKEN_SCHEME};

use crate::error::Result;

pub trait MetricSink {
    fn send(&self, payload: &str) -> Result<()>;
}
