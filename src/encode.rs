//! Payload encoding: one metric line per status record
//!
//! Service line: `<ns>,host=<h>,service=<s>,bankname=<b>,status=<Up|Down> <code>`
//! Queue line:   `<ns>,host=<h>,bankname=<b>,replica=<r>,queuename=<q> <r>`

use crate::status::{Reading, StatusRecord};

/// Encode a single record as a metric line
pub fn encode_line(record: &StatusRecord) -> String {
    match record.reading() {
        Reading::Service(status) => format!(
            "{},host={},service={},bankname={},status={} {}",
            record.namespace(),
            record.host(),
            record.label(),
            record.bank(),
            status.as_str(),
            status.code()
        ),
        Reading::Queue { replica } => format!(
            "{},host={},bankname={},replica={},queuename={} {}",
            record.namespace(),
            record.host(),
            record.bank(),
            replica,
            record.label(),
            replica
        ),
    }
}

/// Encode records in order, newline-joined and trimmed.
///
/// An empty slice yields an empty payload, which callers treat as nothing
/// to send.
pub fn encode(records: &[StatusRecord]) -> String {
    records
        .iter()
        .map(encode_line)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
