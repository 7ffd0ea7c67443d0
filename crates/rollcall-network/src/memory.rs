//! In-process collector.
//!
//! Accepted events are handed to a [`MemoryCollectorHandle`]. Latency and
//! rejections can be injected to exercise the processing worker.

use crate::collector::Collector;
use crate::error::CollectorError;
use rollcall_core::{AttendeeData, CardId};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Collector that keeps events in memory.
///
/// # Examples
///
/// ```
/// use rollcall_core::{AttendeeData, CardId};
/// use rollcall_network::{Collector, MemoryCollector};
///
/// #[tokio::main]
/// async fn main() {
///     let (mut collector, mut handle) = MemoryCollector::new();
///     collector.submit(&AttendeeData::new(CardId::new(5))).await.unwrap();
///
///     let event = handle.recv().await.unwrap();
///     assert_eq!(event.attendee_id(), CardId::new(5));
/// }
/// ```
#[derive(Debug)]
pub struct MemoryCollector {
    accepted_tx: mpsc::UnboundedSender<AttendeeData>,
    latency: Option<Duration>,
    rejected: HashSet<CardId>,
    reject_all: bool,
    attempts: Arc<AtomicU64>,
}

impl MemoryCollector {
    /// Create a collector and the handle receiving its accepted events.
    pub fn new() -> (Self, MemoryCollectorHandle) {
        let (accepted_tx, accepted_rx) = mpsc::unbounded_channel();
        let attempts = Arc::new(AtomicU64::new(0));

        let collector = Self {
            accepted_tx,
            latency: None,
            rejected: HashSet::new(),
            reject_all: false,
            attempts: Arc::clone(&attempts),
        };
        let handle = MemoryCollectorHandle {
            accepted_rx,
            attempts,
        };
        (collector, handle)
    }

    /// Delay every submission by `latency` before accepting or rejecting it.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reject events carrying any of `ids`.
    pub fn rejecting(mut self, ids: impl IntoIterator<Item = CardId>) -> Self {
        self.rejected.extend(ids);
        self
    }

    /// Reject every event.
    pub fn rejecting_all(mut self) -> Self {
        self.reject_all = true;
        self
    }
}

impl Collector for MemoryCollector {
    async fn submit(&mut self, event: &AttendeeData) -> Result<(), CollectorError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.reject_all || self.rejected.contains(&event.attendee_id()) {
            return Err(CollectorError::Rejected(format!(
                "attendee {} refused",
                event.attendee_id()
            )));
        }

        self.accepted_tx
            .send(event.clone())
            .map_err(|_| CollectorError::ConnectionLost("memory collector handle dropped".into()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Receiving side of a [`MemoryCollector`].
#[derive(Debug)]
pub struct MemoryCollectorHandle {
    accepted_rx: mpsc::UnboundedReceiver<AttendeeData>,
    attempts: Arc<AtomicU64>,
}

impl MemoryCollectorHandle {
    /// Wait for the next accepted event.
    ///
    /// Returns `None` once the collector is dropped and every accepted event
    /// has been received.
    pub async fn recv(&mut self) -> Option<AttendeeData> {
        self.accepted_rx.recv().await
    }

    /// Take every accepted event received so far.
    pub fn drain(&mut self) -> Vec<AttendeeData> {
        let mut events = Vec::new();
        while let Ok(event) = self.accepted_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Submissions started so far, accepted or not.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepts_in_order() {
        let (mut collector, mut handle) = MemoryCollector::new();

        for id in 1..=3 {
            collector
                .submit(&AttendeeData::new(CardId::new(id)))
                .await
                .unwrap();
        }

        let ids: Vec<u64> = handle
            .drain()
            .iter()
            .map(|e| e.attendee_id().as_u64())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(handle.attempts(), 3);
    }

    #[tokio::test]
    async fn test_rejects_selected_ids() {
        let (collector, mut handle) = MemoryCollector::new();
        let mut collector = collector.rejecting([CardId::new(2)]);

        collector.submit(&AttendeeData::new(CardId::new(1))).await.unwrap();
        let err = collector
            .submit(&AttendeeData::new(CardId::new(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, CollectorError::Rejected(_)));

        assert_eq!(handle.drain().len(), 1);
        assert_eq!(handle.attempts(), 2);
    }

    #[tokio::test]
    async fn test_rejecting_all() {
        let (collector, mut handle) = MemoryCollector::new();
        let mut collector = collector.rejecting_all();

        assert!(collector.submit(&AttendeeData::new(CardId::new(1))).await.is_err());
        assert!(handle.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_delays_acceptance() {
        let (collector, mut handle) = MemoryCollector::new();
        let mut collector = collector.with_latency(Duration::from_millis(500));

        let start = tokio::time::Instant::now();
        collector.submit(&AttendeeData::new(CardId::new(1))).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(handle.recv().await.unwrap().attendee_id(), CardId::new(1));
    }

    #[tokio::test]
    async fn test_dropped_handle_fails_submission() {
        let (mut collector, handle) = MemoryCollector::new();
        drop(handle);

        let err = collector
            .submit(&AttendeeData::new(CardId::new(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, CollectorError::ConnectionLost(_)));
    }
}
