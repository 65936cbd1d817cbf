// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Streaming statistics over received records.
//!
//! Single-threaded by design: exactly one task mutates the aggregator, so no
//! internal locking is needed. State lives for one accepted connection.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default rolling window (one hour)
pub const ROLLING_WINDOW: Duration = Duration::from_secs(3600);

/// Cumulative counts per classification bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub low: u64,
    pub mid: u64,
    pub high: u64,
    /// Lines carrying the literal "Level: Level" (control echoes)
    pub control: u64,
    /// Lines matching no level marker
    pub unknown: u64,
}

/// Cumulative and windowed statistics for one connection.
///
/// Lengths are measured on the raw received line, not a re-parsed inner
/// message: classification is substring-based, mirroring what the wire
/// actually carries.
pub struct Aggregator {
    total: u64,
    counts: LevelCounts,
    min_len: Option<usize>,
    max_len: usize,
    sum_len: u64,
    /// Receive timestamps (collector wall clock), append-only per arrival
    /// and therefore monotonically non-decreasing front to back. Entries
    /// older than the window are evicted from the front on every insert.
    arrivals: VecDeque<Instant>,
    window: Duration,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::with_window(ROLLING_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            total: 0,
            counts: LevelCounts::default(),
            min_len: None,
            max_len: 0,
            sum_len: 0,
            arrivals: VecDeque::new(),
            window,
        }
    }

    /// Record one received line, stamped with the current instant
    pub fn observe(&mut self, line: &str) {
        self.observe_at(line, Instant::now());
    }

    /// Record one received line with an explicit receive time (test seam)
    pub fn observe_at(&mut self, line: &str, now: Instant) {
        self.total += 1;

        let len = line.len();
        self.min_len = Some(self.min_len.map_or(len, |m| m.min(len)));
        self.max_len = self.max_len.max(len);
        self.sum_len += len as u64;

        // First matching marker wins; the order is fixed
        if line.contains("Level: Low") {
            self.counts.low += 1;
        } else if line.contains("Level: Mid") {
            self.counts.mid += 1;
        } else if line.contains("Level: High") {
            self.counts.high += 1;
        } else if line.contains("Level: Level") {
            self.counts.control += 1;
        } else {
            self.counts.unknown += 1;
        }

        // Evict everything that has fallen out of the window, then append.
        // Amortized O(1): each arrival is pushed and popped at most once.
        while let Some(&front) = self.arrivals.front() {
            if now.duration_since(front) >= self.window {
                self.arrivals.pop_front();
            } else {
                break;
            }
        }
        self.arrivals.push_back(now);
    }

    /// Number of records received within the rolling window of `now`.
    ///
    /// Backward scan from the newest arrival with an early exit at the first
    /// entry outside the window; correct because the sequence is ordered.
    pub fn rolling_window_count(&self, now: Instant) -> u64 {
        let mut count = 0;
        for ts in self.arrivals.iter().rev() {
            if now.duration_since(*ts) < self.window {
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn counts(&self) -> LevelCounts {
        self.counts
    }

    /// Minimum observed line length (0 when no messages were received)
    pub fn min_len(&self) -> usize {
        self.min_len.unwrap_or(0)
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Average line length over all messages (0 when none received)
    pub fn avg_len(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sum_len as f64 / self.total as f64
        }
    }

    /// Arrivals currently retained in the window buffer (for tests)
    pub fn retained_arrivals(&self) -> usize {
        self.arrivals.len()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN10: Duration = Duration::from_secs(600);

    #[test]
    fn test_classification_buckets() {
        let mut stats = Aggregator::new();
        stats.observe("Time: t, Level: Low, Message: 'a'.");
        stats.observe("Time: t, Level: Mid, Message: 'b'.");
        stats.observe("Time: t, Level: High, Message: 'c'.");
        stats.observe("Time: t, Level: High, Message: 'd'.");
        stats.observe("Time: t, Level: Level, Message: 'e'.");
        stats.observe("garbage line");

        assert_eq!(stats.total(), 6);
        let counts = stats.counts();
        assert_eq!(counts.low, 1);
        assert_eq!(counts.mid, 1);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.control, 1);
        assert_eq!(counts.unknown, 1);
    }

    #[test]
    fn test_length_stats_use_raw_line() {
        let mut stats = Aggregator::new();
        stats.observe("abcd");
        stats.observe("ab");
        stats.observe("abcdef");

        assert_eq!(stats.min_len(), 2);
        assert_eq!(stats.max_len(), 6);
        assert_eq!(stats.avg_len(), 4.0);
    }

    #[test]
    fn test_empty_stats_report_zeroes() {
        let stats = Aggregator::new();
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.min_len(), 0);
        assert_eq!(stats.max_len(), 0);
        assert_eq!(stats.avg_len(), 0.0);
        assert_eq!(stats.rolling_window_count(Instant::now()), 0);
    }

    #[test]
    fn test_rolling_window_excludes_old_entries() {
        // One line every 10 minutes for 70 minutes: 8 lines, the two oldest
        // fall outside the hour.
        let mut stats = Aggregator::new();
        let start = Instant::now();
        let now = start + 7 * MIN10;

        for i in 0..8 {
            stats.observe_at("line", start + i * MIN10);
        }

        assert_eq!(stats.total(), 8);
        assert_eq!(stats.rolling_window_count(now), 6);
    }

    #[test]
    fn test_window_eviction_bounds_memory() {
        let mut stats = Aggregator::with_window(Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..1000 {
            stats.observe_at("line", start + Duration::from_secs(i));
        }

        // Only the last minute of arrivals is retained
        assert!(stats.retained_arrivals() <= 60);
        // Cumulative counters are unaffected by eviction
        assert_eq!(stats.total(), 1000);
    }

    #[test]
    fn test_eviction_matches_backward_scan() {
        let mut stats = Aggregator::with_window(Duration::from_secs(100));
        let start = Instant::now();
        for i in [0u64, 10, 50, 90, 120, 150] {
            stats.observe_at("line", start + Duration::from_secs(i));
        }
        let now = start + Duration::from_secs(150);
        // Within (strictly) 100s of now: 90, 120, 150
        assert_eq!(stats.rolling_window_count(now), 3);
        assert_eq!(stats.retained_arrivals() as u64, 3);
    }
}
