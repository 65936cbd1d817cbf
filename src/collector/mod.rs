//! Collector half of the pipeline.
//!
//! A single-task, readiness-driven loop: accept exactly one client, read
//! with a wait bound equal to the report interval so idle periods are still
//! observed for trigger evaluation, reassemble newline-delimited records,
//! aggregate, and print reports when either trigger condition fires.

mod report;
mod stats;
mod stream;
mod trigger;

pub use report::render as render_report;
pub use stats::{Aggregator, LevelCounts, ROLLING_WINDOW};
pub use stream::LineReader;
pub use trigger::ReportTrigger;

use crate::config::CollectorConfig;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// Run the collector: bind, accept one client, ingest until it disconnects.
///
/// Bind/listen/accept failures are fatal; everything after that degrades per
/// record. There is no reconnection and no second client.
pub async fn run(cfg: CollectorConfig) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .with_context(|| format!("failed to bind port {}", cfg.port))?;
    println!("Waiting for client... {}", cfg.port);

    let (stream, _peer) = listener
        .accept()
        .await
        .context("failed to accept client connection")?;
    println!("Client connected.");

    ingest_connection(stream, &cfg).await
}

/// Ingestion loop for one accepted connection.
///
/// Every read is bounded by the report interval; a timeout wakes the loop so
/// the idle-aware time trigger is evaluated even with no traffic.
async fn ingest_connection(mut stream: TcpStream, cfg: &CollectorConfig) -> Result<()> {
    let interval = Duration::from_secs(cfg.report_interval);
    let mut reader = LineReader::new();
    let mut stats = Aggregator::new();
    let mut trigger = ReportTrigger::new(cfg.batch_size, interval);
    let mut buf = [0u8; 1024];

    loop {
        match timeout(interval, stream.read(&mut buf)).await {
            Ok(Ok(0)) => {
                // Orderly peer close. A buffered unterminated fragment is
                // discarded, not flushed as a final record.
                println!("Client disconnected.");
                break;
            }
            Ok(Ok(n)) => {
                for line in reader.push_bytes(&buf[..n]) {
                    println!("Received: {}", line);
                    stats.observe(&line);
                    let now = Instant::now();
                    if trigger.on_message(stats.total(), now) {
                        print!("{}", report::render(&stats, now));
                    }
                }
            }
            Ok(Err(e)) => return Err(e).context("error reading from client"),
            Err(_elapsed) => {} // idle wakeup
        }

        let now = Instant::now();
        if trigger.on_tick(now) {
            print!("{}", report::render(&stats, now));
        }
    }

    Ok(())
}
