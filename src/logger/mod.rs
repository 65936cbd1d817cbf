//! Logger half of the pipeline.
//!
//! The facade composes three parts: the [`LevelController`] holding the
//! runtime-mutable minimum severity, the [`IngestQueue`] connecting the
//! submission side to a dedicated consumer thread, and exactly one
//! [`RecordSink`] bound at construction.
//!
//! Two threads of execution: the caller submitting lines, and the consumer
//! draining the queue and dispatching to the sink. The queue lock and the
//! level lock are independent and neither is ever held across sink I/O.

mod level;
mod queue;
mod sink;

pub use level::LevelController;
pub use queue::{Entry, IngestQueue};
pub use sink::{open_sink, ConsoleSink, RecordSink, SinkError, SinkTarget};

use crate::config::LoggerConfig;
use crate::{render_record, trim_spaces, Level, ParseError, CONTROL_WORD};
use anyhow::Result;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Outcome of a parsed submission line
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParsedLine {
    /// Message with an explicit level, or at the default level when `None`
    Message { level: Option<Level>, text: String },
    /// `"Level: <word>"` control line
    Control { word: String },
}

/// Split a submitted line into a message or a control command.
///
/// Leading/trailing ASCII spaces are trimmed from the line and from both
/// sides of the first `:`; all other whitespace is preserved. A line whose
/// first word is not a known level word is a bare message in its entirety.
fn parse_line(line: &str) -> ParsedLine {
    let line = trim_spaces(line);
    if let Some((word, body)) = line.split_once(':') {
        let word = trim_spaces(word);
        let body = trim_spaces(body);
        if word == CONTROL_WORD {
            return ParsedLine::Control {
                word: body.to_string(),
            };
        }
        if let Some(level) = Level::parse(word) {
            return ParsedLine::Message {
                level: Some(level),
                text: body.to_string(),
            };
        }
    }
    ParsedLine::Message {
        level: None,
        text: line.to_string(),
    }
}

/// Asynchronous line logger.
///
/// `submit` never blocks beyond the queue's critical section; filtering,
/// formatting and sink dispatch all happen on the consumer thread.
pub struct Logger {
    controller: Arc<LevelController>,
    queue: Arc<IngestQueue>,
    consumer: Option<JoinHandle<()>>,
}

impl Logger {
    /// Create a logger bound to a sink target string.
    ///
    /// `target` is a file path or `"socket:<host>:<port>"`; on open/connect
    /// failure the logger falls back to console output for its lifetime. An
    /// invalid `level_word` yields `Level::Unknown`, which filters out all
    /// non-control records until a valid level is set.
    pub fn new(target: &str, level_word: &str) -> Self {
        Self::with_sink(sink::open_sink(target), level_word)
    }

    /// Create a logger over an already-opened sink (test seam)
    pub fn with_sink(sink: Box<dyn RecordSink>, level_word: &str) -> Self {
        let controller = Arc::new(LevelController::new(level_word));
        let queue = Arc::new(IngestQueue::new());

        let consumer_controller = Arc::clone(&controller);
        let consumer_queue = Arc::clone(&queue);
        let consumer =
            std::thread::spawn(move || consumer_loop(consumer_queue, consumer_controller, sink));

        Self {
            controller,
            queue,
            consumer: Some(consumer),
        }
    }

    /// Submit one free-text line.
    ///
    /// Level words are validated here, synchronously, so the caller gets
    /// immediate feedback; the level mutation itself is applied on the
    /// consumer thread when the control entry is dequeued. A bare message
    /// captures the default level in effect now.
    pub fn submit(&self, line: &str) -> Result<(), ParseError> {
        let entry = match parse_line(line) {
            ParsedLine::Control { word } => {
                if Level::parse(trim_spaces(&word)).is_none() {
                    return Err(ParseError::UnknownLevelWord(word));
                }
                Entry::SetLevel(word)
            }
            ParsedLine::Message { level, text } => Entry::Message {
                text,
                level: level.unwrap_or_else(|| self.controller.level()),
            },
        };
        self.queue.push(entry);
        Ok(())
    }

    /// Change the default level directly, bypassing the queue
    pub fn set_level(&self, word: &str) -> Result<(), ParseError> {
        self.controller.set(word)
    }

    /// Current minimum severity
    pub fn level(&self) -> Level {
        self.controller.level()
    }

    /// Label of the current minimum severity
    pub fn level_label(&self) -> String {
        self.controller.label()
    }

    /// Shut down and join the consumer thread.
    ///
    /// Every entry submitted before this call is dispatched before the
    /// consumer exits.
    pub fn shutdown(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.queue.shutdown();
        if let Some(handle) = self.consumer.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Consumer thread: drain the queue, filter at dequeue time, dispatch.
///
/// Sink write failures are reported and the record is lost for that call;
/// nothing is retried or requeued, and no error crosses the thread boundary.
fn consumer_loop(
    queue: Arc<IngestQueue>,
    controller: Arc<LevelController>,
    mut sink: Box<dyn RecordSink>,
) {
    while let Some(entry) = queue.pop_wait() {
        match entry {
            Entry::SetLevel(word) => {
                if let Err(e) = controller.set(&word) {
                    eprintln!("{}", e);
                }
            }
            Entry::Message { text, level } => {
                // Emission decision uses the threshold in effect now, at
                // dequeue time, never the one from enqueue time.
                let current = controller.level();
                if current == Level::Unknown || level < current {
                    continue;
                }
                let record = render_record(level, &text);
                if let Err(e) = sink.write_record(&record) {
                    eprintln!("Failed to write record: {}", e);
                }
                sink.flush();
            }
        }
    }
    sink.flush();
}

/// Logger host loop: read stdin line by line and submit each one.
///
/// EOF triggers shutdown; the queue is drained before the process exits.
pub async fn run(cfg: LoggerConfig) -> Result<()> {
    println!(
        "Starting logger with target: {} and level: {}",
        cfg.target, cfg.level
    );
    println!("Usage: <LogLevel>: <message>");
    println!("To change default level: Level: <new level>");

    let logger = Logger::new(&cfg.target, &cfg.level);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Err(e) = logger.submit(&line) {
            eprintln!("{}", e);
        }
    }

    logger.shutdown();
    Ok(())
}
