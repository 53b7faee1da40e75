//! Turn a raw queue listing into `<count> <queue>` rows.
//!
//! The listing is a terminal capture: lines carry ANSI colour sequences and
//! look like `ORDERS.1.01 ...`. Rows are reduced to the part before the
//! first `.`, consecutive repeats are counted, and the first counted row
//! (the capture's header) is dropped.

use regex::Regex;

/// Colour sequence emitted between the name and the rest of a row
const ANSI_COLOUR: &str = r"\x1b\[[0-9][a-zA-Z]\x1b\[[0-9];[0-9][0-9]m";

/// Rows of interest contain `<name>.<digit>.<digit><digit>`
const QUEUE_ROW: &str = r"[A-Z]*.[0-9].[0-9][0-9]";

pub fn summarize_queue_listing(raw: &str) -> String {
    let colour = Regex::new(ANSI_COLOUR).expect("Invalid regex pattern");
    let queue_row = Regex::new(QUEUE_ROW).expect("Invalid regex pattern");

    let names = raw
        .lines()
        .map(|line| colour.replace_all(line, " "))
        .filter(|line| queue_row.is_match(line))
        .map(|line| line.split('.').next().unwrap_or_default().to_string());

    let mut counted: Vec<(usize, String)> = Vec::new();
    for name in names {
        match counted.last_mut() {
            Some((count, last)) if *last == name => *count += 1,
            _ => counted.push((1, name)),
        }
    }

    counted
        .into_iter()
        .skip(1)
        .map(|(count, name)| format!("{count:>7} {name}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::parse_queue_listing;

    #[test]
    fn test_counts_consecutive_rows_and_drops_first() {
        let raw = "HEADER.0.00 title\n\
                   ORDERS.1.01 up\n\
                   ORDERS.2.01 up\n\
                   PAYMENTS.1.02 up\n\
                   some noise without pattern\n\
                   ORDERS.3.01 up\n";

        let summary = summarize_queue_listing(raw);

        assert_eq!(
            summary,
            "      2 ORDERS\n      1 PAYMENTS\n      1 ORDERS\n"
        );
    }

    #[test]
    fn test_strips_colour_sequences() {
        let raw = "TITLE.0.00\n\
                   CLEARING\x1b[0K\x1b[1;32m.1.05 running\n";

        let summary = summarize_queue_listing(raw);

        assert_eq!(summary, "      1 CLEARING \n");
    }

    #[test]
    fn test_summary_feeds_queue_parser() {
        let raw = "HEAD.0.00\nORDERS.1.01\nORDERS.2.01\nBILLING.1.03\n";

        let queues = parse_queue_listing(&summarize_queue_listing(raw));

        assert_eq!(queues["ORDERS"].replica, 2);
        assert_eq!(queues["BILLING"].replica, 1);
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(summarize_queue_listing(""), "");
    }
}
