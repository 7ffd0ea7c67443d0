//! Bounded hand-off between the poll loop and the processing worker.
//!
//! There is exactly one producer and one consumer. Enqueueing never blocks:
//! a full queue hands the event back so the poll loop keeps its cadence.

use crate::error::{QueueError, Result, TrackerError};
use rollcall_core::AttendeeData;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// Create a queue holding at most `capacity` pending events.
///
/// # Errors
/// Returns `TrackerError::Config` if `capacity` is zero.
pub fn event_queue(capacity: usize) -> Result<(EventSender, EventReceiver)> {
    if capacity == 0 {
        return Err(TrackerError::Config(
            "queue capacity must be at least 1".to_string(),
        ));
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((EventSender { tx }, EventReceiver { rx }))
}

/// Producing side, owned by the poll loop.
#[derive(Debug)]
pub struct EventSender {
    tx: mpsc::Sender<AttendeeData>,
}

impl EventSender {
    /// Append `event` without waiting.
    ///
    /// # Errors
    /// `QueueError::Full` if the queue is at capacity, `QueueError::Closed`
    /// if the receiver is gone. Both carry the event back.
    pub fn enqueue(&self, event: AttendeeData) -> std::result::Result<(), QueueError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(event) => QueueError::Full(event),
            TrySendError::Closed(event) => QueueError::Closed(event),
        })
    }

    /// Maximum number of pending events.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consuming side, owned by the processing worker.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<AttendeeData>,
}

impl EventReceiver {
    /// Wait for the oldest pending event.
    ///
    /// Returns `None` as soon as `cancel` fires, even with events pending,
    /// or once the sender is dropped and the queue is drained.
    pub async fn dequeue(&mut self, cancel: &CancellationToken) -> Option<AttendeeData> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            event = self.rx.recv() => event,
        }
    }

    /// Take the oldest pending event without waiting.
    pub fn try_dequeue(&mut self) -> Option<AttendeeData> {
        self.rx.try_recv().ok()
    }

    /// Maximum number of pending events.
    pub fn capacity(&self) -> usize {
        self.rx.max_capacity()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::CardId;

    fn event(id: u64) -> AttendeeData {
        AttendeeData::new(CardId::new(id))
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(event_queue(0), Err(TrackerError::Config(_))));
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let (tx, mut rx) = event_queue(10).unwrap();
        let never = CancellationToken::new();

        for id in 1..=5 {
            tx.enqueue(event(id)).unwrap();
        }
        assert_eq!(tx.len(), 5);
        assert_eq!(rx.len(), 5);

        for id in 1..=5 {
            let got = rx.dequeue(&never).await.unwrap();
            assert_eq!(got.attendee_id(), CardId::new(id));
        }
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn test_full_queue_returns_event() {
        let (tx, mut rx) = event_queue(2).unwrap();
        tx.enqueue(event(1)).unwrap();
        tx.enqueue(event(2)).unwrap();

        match tx.enqueue(event(3)) {
            Err(QueueError::Full(rejected)) => assert_eq!(rejected.attendee_id(), CardId::new(3)),
            other => panic!("expected Full, got {other:?}"),
        }

        // The queued events are untouched
        let never = CancellationToken::new();
        assert_eq!(rx.dequeue(&never).await.unwrap().attendee_id(), CardId::new(1));
        assert_eq!(rx.dequeue(&never).await.unwrap().attendee_id(), CardId::new(2));
        assert_eq!(tx.capacity(), 2);
    }

    #[test]
    fn test_closed_queue_returns_event() {
        let (tx, rx) = event_queue(2).unwrap();
        drop(rx);
        assert!(tx.is_closed());
        assert!(matches!(tx.enqueue(event(1)), Err(QueueError::Closed(_))));
    }

    #[tokio::test]
    async fn test_cancel_wins_over_pending_events() {
        let (tx, mut rx) = event_queue(4).unwrap();
        tx.enqueue(event(1)).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(rx.dequeue(&cancel).await, None);
        assert_eq!(rx.len(), 1);
    }

    #[tokio::test]
    async fn test_drains_after_sender_dropped() {
        let (tx, mut rx) = event_queue(4).unwrap();
        tx.enqueue(event(1)).unwrap();
        drop(tx);

        let never = CancellationToken::new();
        assert!(rx.dequeue(&never).await.is_some());
        assert_eq!(rx.dequeue(&never).await, None);
    }

    #[tokio::test]
    async fn test_dequeue_wakes_on_enqueue() {
        let (tx, mut rx) = event_queue(4).unwrap();
        let never = CancellationToken::new();

        let consumer = tokio::spawn(async move { rx.dequeue(&never).await });
        tokio::task::yield_now().await;
        tx.enqueue(event(9)).unwrap();

        let got = consumer.await.unwrap().unwrap();
        assert_eq!(got.attendee_id(), CardId::new(9));
    }
}
