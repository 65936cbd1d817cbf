// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Dual-condition report trigger.
//!
//! A report is fired either when the cumulative message total reaches a
//! nonzero multiple of the batch size, or when the report interval has
//! elapsed AND at least one message arrived since the last report. The idle
//! rule means an idle collector stays silent no matter how much time passes.
//! Firing resets only the idle state; cumulative counters are never reset.

use std::time::{Duration, Instant};

pub struct ReportTrigger {
    batch_size: u64,
    interval: Duration,
    last_report: Instant,
    /// True iff at least one message arrived since the last report
    pending: bool,
}

impl ReportTrigger {
    pub fn new(batch_size: u64, interval: Duration) -> Self {
        Self::starting_at(batch_size, interval, Instant::now())
    }

    pub fn starting_at(batch_size: u64, interval: Duration, now: Instant) -> Self {
        Self {
            batch_size,
            interval,
            last_report: now,
            pending: false,
        }
    }

    /// Note a newly aggregated message; returns true when the batch
    /// condition fires a report.
    pub fn on_message(&mut self, total: u64, now: Instant) -> bool {
        self.pending = true;
        if self.batch_size > 0 && total > 0 && total % self.batch_size == 0 {
            self.fired(now);
            return true;
        }
        false
    }

    /// Evaluate the time condition; called every loop wakeup, including the
    /// idle ones. Returns true when a report should be printed now.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.pending && now.duration_since(self.last_report) >= self.interval {
            self.fired(now);
            return true;
        }
        false
    }

    fn fired(&mut self, now: Instant) {
        self.last_report = now;
        self.pending = false;
    }
}
