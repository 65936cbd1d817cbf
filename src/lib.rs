//! Minimal telemetry pipeline: an in-process asynchronous line logger and an
//! independent streaming stats collector.
//!
//! The logger half accepts free-text lines, filters them by a runtime-mutable
//! severity threshold and dispatches them to exactly one sink (file, socket or
//! console fallback). The collector half ingests the logger's canonical output
//! over a TCP socket and maintains rolling statistics, printing periodic
//! reports.
//!
//! The types in this file are the wire contract shared by both halves: the
//! severity enumeration, the level-word syntax and the canonical record
//! format. The collector classifies records by literal substring search, so
//! the field ordering and punctuation produced by [`render_record`] are
//! frozen.

use thiserror::Error;

pub mod collector;
pub mod config;
pub mod logger;

/// The level word that carries a control command instead of a severity.
///
/// `"Level: <word>"` on the logger's input asks the logger to adopt `<word>`
/// as its new default level. It is not a severity and never appears as one in
/// emitted output.
pub const CONTROL_WORD: &str = "Level";

/// Ordered severity levels.
///
/// `Unknown` results from constructing a logger with an invalid level word;
/// while it is the current level, every non-control record is filtered out.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Unknown = -1,
    Low = 0,
    Mid = 1,
    High = 2,
}

impl Level {
    /// Get the level label as a static string
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Unknown => "Unknown",
            Level::Low => "Low",
            Level::Mid => "Mid",
            Level::High => "High",
        }
    }

    /// Parse a severity word (returns `None` for anything else, including
    /// the control word `"Level"`)
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "Low" => Some(Level::Low),
            "Mid" => Some(Level::Mid),
            "High" => Some(Level::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while interpreting submitted lines and level words
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown level word '{0}'; no changes made")]
    UnknownLevelWord(String),
}

/// Trim leading and trailing ASCII space (0x20) only.
///
/// Tabs and all other whitespace are preserved verbatim.
pub fn trim_spaces(s: &str) -> &str {
    s.trim_matches(' ')
}

/// Render one canonical record line, timestamped with the current local time.
///
/// The result is terminated by a literal period and newline.
pub fn render_record(level: Level, message: &str) -> String {
    let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    render_record_at(&time, level, message)
}

/// Render one canonical record line with an explicit timestamp string
pub fn render_record_at(time: &str, level: Level, message: &str) -> String {
    format!(
        "Time: {}, Level: {}, Message: '{}'.\n",
        time,
        level.as_str(),
        message
    )
}
