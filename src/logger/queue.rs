// SPDX-License-Identifier: Apache-2.0 OR MIT
// Ingest queue connecting the submission side to the consumer thread

use crate::Level;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// One queued unit of work.
///
/// A control command is a distinct variant rather than a message tagged with
/// a sentinel severity, so the filter never has to compare against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A message to filter and emit. `level` is fixed at submit time: bare
    /// messages capture the default level in effect when they were submitted.
    Message { text: String, level: Level },
    /// Adopt a new default level word (applied on the consumer thread)
    SetLevel(String),
}

struct QueueState {
    entries: VecDeque<Entry>,
    done: bool,
}

/// Thread-safe FIFO between one producer and one dedicated consumer thread,
/// with a cooperative shutdown signal.
///
/// The lock is held only for the push/pop critical sections; the consumer
/// performs its (possibly blocking) sink write outside of it, so a slow sink
/// never stalls the producer.
pub struct IngestQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl IngestQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                entries: VecDeque::new(),
                done: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Enqueue an entry and wake the consumer.
    ///
    /// Returns `false` if the queue has already been shut down; the entry is
    /// dropped in that case (entries racing with shutdown have no delivery
    /// guarantee).
    pub fn push(&self, entry: Entry) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.done {
            return false;
        }
        state.entries.push_back(entry);
        drop(state);
        self.available.notify_one();
        true
    }

    /// Signal shutdown and wake the consumer unconditionally.
    ///
    /// Everything enqueued before this call is still delivered: the consumer
    /// keeps draining until the queue is empty and only then observes `done`.
    pub fn shutdown(&self) {
        self.state.lock().unwrap().done = true;
        self.available.notify_all();
    }

    /// Block until an entry is available or shutdown has been signalled.
    ///
    /// Returns entries in FIFO order; returns `None` only once the queue is
    /// both shut down and fully drained.
    pub fn pop_wait(&self) -> Option<Entry> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(entry) = state.entries.pop_front() {
                return Some(entry);
            }
            if state.done {
                return None;
            }
            state = self.available.wait(state).unwrap();
        }
    }

    /// Number of entries currently queued (for tests and monitoring)
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IngestQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn msg(text: &str) -> Entry {
        Entry::Message {
            text: text.to_string(),
            level: Level::Low,
        }
    }

    #[test]
    fn test_fifo_order() {
        let queue = IngestQueue::new();
        assert!(queue.push(msg("a")));
        assert!(queue.push(msg("b")));
        assert!(queue.push(msg("c")));
        queue.shutdown();

        assert_eq!(queue.pop_wait(), Some(msg("a")));
        assert_eq!(queue.pop_wait(), Some(msg("b")));
        assert_eq!(queue.pop_wait(), Some(msg("c")));
        assert_eq!(queue.pop_wait(), None);
    }

    #[test]
    fn test_push_after_shutdown_is_dropped() {
        let queue = IngestQueue::new();
        queue.shutdown();
        assert!(!queue.push(msg("late")));
        assert_eq!(queue.pop_wait(), None);
    }

    #[test]
    fn test_shutdown_drains_pending_entries() {
        let queue = Arc::new(IngestQueue::new());
        let consumer_queue = Arc::clone(&queue);

        let handle = std::thread::spawn(move || {
            let mut seen = Vec::new();
            while let Some(entry) = consumer_queue.pop_wait() {
                if let Entry::Message { text, .. } = entry {
                    seen.push(text);
                }
            }
            seen
        });

        for i in 0..100 {
            assert!(queue.push(msg(&format!("m{}", i))));
        }
        queue.shutdown();

        let seen = handle.join().unwrap();
        // Everything enqueued before shutdown is dispatched exactly once, in order
        assert_eq!(seen.len(), 100);
        for (i, text) in seen.iter().enumerate() {
            assert_eq!(text, &format!("m{}", i));
        }
    }

    #[test]
    fn test_pop_wait_blocks_until_push() {
        let queue = Arc::new(IngestQueue::new());
        let consumer_queue = Arc::clone(&queue);

        let handle = std::thread::spawn(move || consumer_queue.pop_wait());

        // Give the consumer time to park on the condvar
        std::thread::sleep(Duration::from_millis(20));
        assert!(queue.push(Entry::SetLevel("High".to_string())));

        assert_eq!(
            handle.join().unwrap(),
            Some(Entry::SetLevel("High".to_string()))
        );
    }
}
