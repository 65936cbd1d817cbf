// SPDX-License-Identifier: Apache-2.0 OR MIT
// Report rendering: fixed field order, one block per trigger

use super::stats::Aggregator;
use std::fmt::Write;
use std::time::Instant;

/// Render an aggregator snapshot as the periodic report block.
///
/// Field order is fixed: total, per-level counts, rolling-hour count, then
/// min/max/average line length. Min and average are 0 when nothing was
/// received.
pub fn render(stats: &Aggregator, now: Instant) -> String {
    let counts = stats.counts();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "===== Stat =====");
    let _ = writeln!(out, "All messages: {}", stats.total());
    let _ = writeln!(out, "Messages by level:");
    let _ = writeln!(out, "  Low: {}", counts.low);
    let _ = writeln!(out, "  Mid: {}", counts.mid);
    let _ = writeln!(out, "  High: {}", counts.high);
    let _ = writeln!(out, "  Level: {}", counts.control);
    let _ = writeln!(out, "  Unknown: {}", counts.unknown);
    let _ = writeln!(
        out,
        "Messages in the last hour: {}",
        stats.rolling_window_count(now)
    );
    let _ = writeln!(out, "Message lengths:");
    let _ = writeln!(out, "  Min: {}", stats.min_len());
    let _ = writeln!(out, "  Max: {}", stats.max_len());
    let _ = writeln!(out, "  Avg: {}", stats.avg_len());
    let _ = writeln!(out, "================");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let stats = Aggregator::new();
        let report = render(&stats, Instant::now());
        assert_eq!(
            report,
            "===== Stat =====\n\
             All messages: 0\n\
             Messages by level:\n\
             \x20 Low: 0\n\
             \x20 Mid: 0\n\
             \x20 High: 0\n\
             \x20 Level: 0\n\
             \x20 Unknown: 0\n\
             Messages in the last hour: 0\n\
             Message lengths:\n\
             \x20 Min: 0\n\
             \x20 Max: 0\n\
             \x20 Avg: 0\n\
             ================\n"
        );
    }

    #[test]
    fn test_populated_report_field_order() {
        let mut stats = Aggregator::new();
        stats.observe("Time: t, Level: Low, Message: 'xx'.");
        stats.observe("Time: t, Level: High, Message: 'yyyy'.");
        let report = render(&stats, Instant::now());

        let low_pos = report.find("  Low: 1").unwrap();
        let high_pos = report.find("  High: 1").unwrap();
        let hour_pos = report.find("Messages in the last hour: 2").unwrap();
        let min_pos = report.find("  Min: ").unwrap();
        assert!(report.starts_with("===== Stat =====\nAll messages: 2\n"));
        assert!(low_pos < high_pos);
        assert!(high_pos < hour_pos);
        assert!(hour_pos < min_pos);
        assert!(report.ends_with("================\n"));
    }
}
