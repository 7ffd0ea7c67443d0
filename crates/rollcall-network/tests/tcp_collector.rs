//! Integration tests for TcpCollector
//!
//! These tests run the client against loopback collectors to verify the
//! wire format, lazy connection, and reconnect behavior.

use chrono::{TimeZone, Utc};
use futures::StreamExt;
use rollcall_core::{AttendeeData, CardId};
use rollcall_network::{AnyCollector, Collector, CollectorError, TcpCollector, TcpCollectorConfig};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};

fn event(id: u64) -> AttendeeData {
    AttendeeData::with_timestamp(
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap(),
        CardId::new(id),
    )
}

/// Start a collector that forwards every received line, accepting
/// connections until the test ends.
async fn spawn_collector() -> (std::net::SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut framed = Framed::new(stream, LinesCodec::new());
                while let Some(Ok(line)) = framed.next().await {
                    let _ = tx.send(line);
                }
            });
        }
    });

    (addr, rx)
}

fn config(addr: std::net::SocketAddr) -> TcpCollectorConfig {
    TcpCollectorConfig {
        server_addr: addr,
        timeout: Duration::from_millis(1000),
    }
}

#[tokio::test]
async fn test_submit_connects_lazily_and_sends_json_line() {
    let (addr, mut lines) = spawn_collector().await;

    let mut client = TcpCollector::new(config(addr));
    assert!(!client.is_connected());

    client.submit(&event(6656)).await.unwrap();
    assert!(client.is_connected());

    let line = lines.recv().await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(json["attendee_id"], 6656);
    assert_eq!(json["timestamp"], "2025-01-15T12:30:00Z");

    client.close().await.unwrap();
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_events_arrive_in_order_on_one_connection() {
    let (addr, mut lines) = spawn_collector().await;
    let mut client = AnyCollector::from(TcpCollector::new(config(addr)));

    for id in [5, 9, 5] {
        client.submit(&event(id)).await.unwrap();
    }

    let mut ids = Vec::new();
    for _ in 0..3 {
        let line = lines.recv().await.unwrap();
        let parsed: AttendeeData = serde_json::from_str(&line).unwrap();
        ids.push(parsed.attendee_id().as_u64());
    }
    assert_eq!(ids, vec![5, 9, 5]);
}

#[tokio::test]
async fn test_submit_fails_when_collector_is_down() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = TcpCollector::new(config(addr));
    let err = client.submit(&event(1)).await.unwrap_err();

    assert!(matches!(
        err,
        CollectorError::Io(_) | CollectorError::ConnectionTimeout(_)
    ));
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_reconnects_after_collector_restart() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // First collector accepts one connection, reads one line, then hangs up
    let first = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut framed = Framed::new(stream, LinesCodec::new());
        let line = framed.next().await.unwrap().unwrap();
        (line, listener)
    });

    let mut client = TcpCollector::new(config(addr));
    client.submit(&event(1)).await.unwrap();
    let (line, listener) = first.await.unwrap();
    assert!(line.contains("\"attendee_id\":1"));

    // The peer is gone: writes eventually fail and drop the connection
    let mut failed = false;
    for _ in 0..50 {
        if client.send(&event(2)).await.is_err() {
            failed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(failed, "writes to a closed peer should fail");
    assert!(!client.is_connected());

    // A fresh collector on the same port receives the next event
    let second = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut framed = Framed::new(stream, LinesCodec::new());
        framed.next().await.unwrap().unwrap()
    });

    client.submit(&event(3)).await.unwrap();
    let line = second.await.unwrap();
    assert!(line.contains("\"attendee_id\":3"));
}
