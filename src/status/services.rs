//! Service-pattern evaluation against a raw `ps -ef` listing

use super::{Origin, Status, StatusRecord};
use crate::config::ServiceCheck;

/// Up when some single line of `listing` contains both patterns.
///
/// Position and order of the patterns within the line do not matter; the
/// scan stops at the first matching line. A check with an empty pattern is
/// never evaluable and is always Down.
pub fn check_service(listing: &str, check: &ServiceCheck) -> Status {
    if !check.is_evaluable() {
        return Status::Down;
    }

    match listing
        .lines()
        .find(|line| line.contains(&check.pattern1) && line.contains(&check.pattern2))
    {
        Some(line) => {
            tracing::info!(
                service = %check.name,
                line,
                "Service is running, found both patterns"
            );
            Status::Up
        }
        None => {
            tracing::info!(
                service = %check.name,
                "Service is not running, patterns not found together"
            );
            Status::Down
        }
    }
}

/// Evaluate every check independently, one record per check in check order
pub fn evaluate_services(
    listing: &str,
    checks: &[ServiceCheck],
    origin: &Origin,
) -> Vec<StatusRecord> {
    checks
        .iter()
        .map(|check| {
            if !check.is_evaluable() {
                tracing::warn!(
                    service = %check.name,
                    "Missing pattern(s), reporting service as Down"
                );
            }
            StatusRecord::service(origin, &check.name, check_service(listing, check))
        })
        .collect()
}
