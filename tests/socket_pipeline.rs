// Full pipeline over a real TCP socket: logger with a socket sink on one
// side, line reassembly and aggregation on the other.

use log_relay::collector::{Aggregator, LineReader};
use log_relay::logger::Logger;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

#[tokio::test(flavor = "multi_thread")]
async fn test_logger_records_reach_collector_side() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // The kernel completes the connect against the listen backlog, so the
    // blocking connect inside Logger::new does not need accept() to run first.
    let logger = Logger::new(&format!("socket:127.0.0.1:{}", port), "Low");
    let (mut stream, _) = listener.accept().await.unwrap();

    logger.submit("Low: alpha").unwrap();
    logger.submit("Mid: beta").unwrap();
    logger.submit("Level: High").unwrap();
    logger.submit("Low: filtered out").unwrap();
    logger.submit("High: gamma").unwrap();
    // Closes the socket after the queue is drained
    logger.shutdown();

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).await.unwrap();

    let mut reader = LineReader::new();
    let mut stats = Aggregator::new();
    let lines = reader.push_bytes(&bytes);
    for line in &lines {
        stats.observe(line);
    }

    // Control and filtered entries never hit the wire
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Level: Low") && lines[0].contains("'alpha'"));
    assert!(lines[1].contains("Level: Mid") && lines[1].contains("'beta'"));
    assert!(lines[2].contains("Level: High") && lines[2].contains("'gamma'"));

    let counts = stats.counts();
    assert_eq!(stats.total(), 3);
    assert_eq!(counts.low, 1);
    assert_eq!(counts.mid, 1);
    assert_eq!(counts.high, 1);
    assert_eq!(counts.control, 0);
    assert_eq!(counts.unknown, 0);

    // No partial fragment: every record was newline-terminated
    assert_eq!(reader.buffered_len(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_canonical_record_shape_on_the_wire() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let logger = Logger::new(&format!("socket:127.0.0.1:{}", port), "Low");
    let (mut stream, _) = listener.accept().await.unwrap();

    logger.submit("Mid: payload").unwrap();
    logger.shutdown();

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).await.unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.starts_with("Time: "));
    assert!(text.contains(", Level: Mid, Message: 'payload'."));
    assert!(text.ends_with(".\n"));
}
