//! Queue listing parsing
//!
//! Input rows look like `uniq -c` output: `<count> <queue> [...]`.

use indexmap::IndexMap;

use super::{Origin, StatusRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub replica: u32,
}

/// Parse rows into a queue-name keyed map.
///
/// Rows with fewer than two columns or a non-numeric count are skipped. A
/// queue name seen twice keeps the later count but the position of its
/// first occurrence.
pub fn parse_queue_listing(listing: &str) -> IndexMap<String, QueueEntry> {
    let mut queues = IndexMap::new();

    for (line_no, line) in listing.lines().enumerate() {
        let mut columns = line.split_whitespace();
        let (Some(count), Some(name)) = (columns.next(), columns.next()) else {
            if !line.trim().is_empty() {
                tracing::debug!(
                    line_no = line_no + 1,
                    line,
                    "Skipping queue row with fewer than 2 columns"
                );
            }
            continue;
        };

        let Ok(replica) = count.parse::<u32>() else {
            tracing::warn!(
                line_no = line_no + 1,
                line,
                "Skipping queue row with non-numeric count"
            );
            continue;
        };

        if let Some(previous) = queues.insert(name.to_string(), QueueEntry { replica }) {
            tracing::debug!(
                queue = name,
                previous = previous.replica,
                replica,
                "Duplicate queue row, later row wins"
            );
        }
    }

    queues
}

/// One record per queue, in map order
pub fn queue_records(
    queues: &IndexMap<String, QueueEntry>,
    origin: &Origin,
) -> Vec<StatusRecord> {
    queues
        .iter()
        .map(|(name, entry)| StatusRecord::queue(origin, name, entry.replica))
        .collect()
}
