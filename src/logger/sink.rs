// SPDX-License-Identifier: Apache-2.0 OR MIT
// Record sinks: exactly one destination is bound at logger construction

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use thiserror::Error;

/// Output sink for canonical record lines
pub trait RecordSink: Send {
    /// Write one already-rendered record line to the sink
    fn write_record(&mut self, record: &str) -> io::Result<()>;

    /// Flush any buffered output
    fn flush(&mut self);
}

/// Destination resolved once from the target string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    /// File path, opened in append mode
    File(PathBuf),
    /// TCP endpoint from a `"socket:<host>:<port>"` target
    Socket { host: String, port: u16 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("invalid socket target '{0}': expected socket:<host>:<port>")]
    InvalidSocketTarget(String),
}

impl SinkTarget {
    /// Resolve a target string.
    ///
    /// A `socket:` prefix selects a TCP endpoint; any other string is a file
    /// path. A malformed socket target is an error (treated by [`open_sink`]
    /// like a failed connection, not like a file path).
    pub fn parse(target: &str) -> Result<Self, SinkError> {
        match target.strip_prefix("socket:") {
            None => Ok(SinkTarget::File(PathBuf::from(target))),
            Some(rest) => {
                let (host, port) = rest
                    .split_once(':')
                    .ok_or_else(|| SinkError::InvalidSocketTarget(target.to_string()))?;
                let port: u16 = port
                    .parse()
                    .map_err(|_| SinkError::InvalidSocketTarget(target.to_string()))?;
                if host.is_empty() {
                    return Err(SinkError::InvalidSocketTarget(target.to_string()));
                }
                Ok(SinkTarget::Socket {
                    host: host.to_string(),
                    port,
                })
            }
        }
    }
}

/// File sink (append mode, flushed per record)
pub struct FileSink {
    file: File,
}

impl RecordSink for FileSink {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        self.file.write_all(record.as_bytes())
    }

    fn flush(&mut self) {
        let _ = self.file.flush();
    }
}

/// Connected TCP sink
pub struct SocketSink {
    stream: TcpStream,
}

impl RecordSink for SocketSink {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        self.stream.write_all(record.as_bytes())
    }

    fn flush(&mut self) {
        let _ = self.stream.flush();
    }
}

/// Console fallback sink (stdout)
pub struct ConsoleSink {
    stdout: std::io::Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for ConsoleSink {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        self.stdout.write_all(record.as_bytes())
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

/// Open the sink for a target string.
///
/// If the socket connection or file open fails, a single warning is printed
/// and the logger permanently falls back to console output for its whole
/// lifetime. No retry, no reconnection.
pub fn open_sink(target: &str) -> Box<dyn RecordSink> {
    match SinkTarget::parse(target) {
        Ok(SinkTarget::Socket { host, port }) => {
            match TcpStream::connect((host.as_str(), port)) {
                Ok(stream) => Box::new(SocketSink { stream }),
                Err(e) => {
                    eprintln!(
                        "Failed to connect to {}:{}: {}. Falling back to console output.",
                        host, port, e
                    );
                    Box::new(ConsoleSink::new())
                }
            }
        }
        Ok(SinkTarget::File(path)) => {
            match OpenOptions::new().append(true).create(true).open(&path) {
                Ok(file) => Box::new(FileSink { file }),
                Err(e) => {
                    eprintln!(
                        "Failed to open log file {}: {}. Falling back to console output.",
                        path.display(),
                        e
                    );
                    Box::new(ConsoleSink::new())
                }
            }
        }
        Err(e) => {
            eprintln!("{}. Falling back to console output.", e);
            Box::new(ConsoleSink::new())
        }
    }
}
