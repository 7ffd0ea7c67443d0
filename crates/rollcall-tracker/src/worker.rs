//! Processing worker: the single consumer of the event queue.
//!
//! Each event is appended to the journal (if configured) and forwarded to the
//! collector (if configured). Failures are logged and counted; the worker
//! always moves on to the next event.

use crate::error::{Result, TrackerError};
use crate::queue::EventReceiver;
use rollcall_core::AttendeeData;
use rollcall_network::{AnyCollector, Collector};
use rollcall_storage::AttendanceLog;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Counters reported when the worker exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Events taken off the queue and handled
    pub processed: u64,

    /// Journal appends that failed
    pub persist_failures: u64,

    /// Collector submissions that failed
    pub forward_failures: u64,
}

#[derive(Debug)]
pub struct ProcessingWorker {
    queue: EventReceiver,
    journal: Option<AttendanceLog>,
    collector: Option<AnyCollector>,
    soft_terminate: CancellationToken,
    stats: WorkerStats,
}

impl ProcessingWorker {
    /// Create a worker consuming `queue` until the queue closes or
    /// `soft_terminate` fires.
    pub fn new(queue: EventReceiver, soft_terminate: CancellationToken) -> Self {
        Self {
            queue,
            journal: None,
            collector: None,
            soft_terminate,
            stats: WorkerStats::default(),
        }
    }

    pub fn with_journal(mut self, journal: AttendanceLog) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn with_collector(mut self, collector: impl Into<AnyCollector>) -> Self {
        self.collector = Some(collector.into());
        self
    }

    /// Process events until the queue is closed and drained, or until soft
    /// terminate is requested.
    ///
    /// A soft terminate never interrupts the event being processed; events
    /// still queued at that point are left unprocessed.
    pub async fn run(mut self) -> WorkerStats {
        let collector = self
            .collector
            .as_ref()
            .map_or_else(|| "none".to_string(), |c| c.describe());
        info!(
            journal = self.journal.is_some(),
            collector = %collector,
            "Processing worker started"
        );

        while let Some(event) = self.queue.dequeue(&self.soft_terminate).await {
            self.process(&event).await;
        }

        let pending = self.queue.len();
        if self.soft_terminate.is_cancelled() && pending > 0 {
            warn!(pending, "Soft terminate requested, leaving queued events unprocessed");
        }
        info!(
            processed = self.stats.processed,
            persist_failures = self.stats.persist_failures,
            forward_failures = self.stats.forward_failures,
            "Processing worker stopped"
        );
        self.stats
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self) -> WorkerHandle {
        let soft_terminate = self.soft_terminate.clone();
        let join = tokio::spawn(self.run());
        WorkerHandle {
            soft_terminate,
            join,
        }
    }

    async fn process(&mut self, event: &AttendeeData) {
        debug!("Processing {}", event);

        if let Some(journal) = self.journal.as_mut()
            && let Err(e) = journal.append(event).await
        {
            self.stats.persist_failures += 1;
            warn!("Failed to journal {}: {}", event, e);
        }

        if let Some(collector) = self.collector.as_mut()
            && let Err(e) = collector.submit(event).await
        {
            self.stats.forward_failures += 1;
            warn!("Failed to forward {} to {}: {}", event, collector.describe(), e);
        }

        self.stats.processed += 1;
    }
}

/// Handle to a spawned [`ProcessingWorker`].
#[derive(Debug)]
pub struct WorkerHandle {
    soft_terminate: CancellationToken,
    join: JoinHandle<WorkerStats>,
}

impl WorkerHandle {
    /// Ask the worker to stop after the event it is processing.
    pub fn soft_terminate(&self) {
        self.soft_terminate.cancel();
    }

    pub fn is_terminating(&self) -> bool {
        self.soft_terminate.is_cancelled()
    }

    /// Wait for the worker to exit.
    ///
    /// # Errors
    /// Returns `TrackerError::TaskFailed` if the worker panicked.
    pub async fn join(self) -> Result<WorkerStats> {
        self.join
            .await
            .map_err(|_| TrackerError::TaskFailed("processing worker"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{EventSender, event_queue};
    use rollcall_core::CardId;
    use rollcall_network::MemoryCollector;
    use std::time::Duration;

    fn enqueue(tx: &EventSender, ids: impl IntoIterator<Item = u64>) {
        for id in ids {
            tx.enqueue(AttendeeData::new(CardId::new(id))).unwrap();
        }
    }

    fn ids(events: &[AttendeeData]) -> Vec<u64> {
        events.iter().map(|e| e.attendee_id().as_u64()).collect()
    }

    #[tokio::test]
    async fn test_processes_in_fifo_order() {
        let (tx, rx) = event_queue(64).unwrap();
        let (collector, mut accepted) = MemoryCollector::new();
        enqueue(&tx, 1..=50);
        drop(tx);

        let stats = ProcessingWorker::new(rx, CancellationToken::new())
            .with_collector(collector)
            .run()
            .await;

        assert_eq!(stats.processed, 50);
        assert_eq!(ids(&accepted.drain()), (1..=50).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_forward_failures_do_not_stop_worker() {
        let (tx, rx) = event_queue(8).unwrap();
        let (collector, mut accepted) = MemoryCollector::new();
        let collector = collector.rejecting([CardId::new(2)]);
        enqueue(&tx, [1, 2, 3]);
        drop(tx);

        let stats = ProcessingWorker::new(rx, CancellationToken::new())
            .with_collector(collector)
            .run()
            .await;

        assert_eq!(
            stats,
            WorkerStats {
                processed: 3,
                persist_failures: 0,
                forward_failures: 1,
            }
        );
        assert_eq!(ids(&accepted.drain()), vec![1, 3]);
        assert_eq!(accepted.attempts(), 3);
    }

    #[tokio::test]
    async fn test_journal_records_every_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");

        let (tx, rx) = event_queue(8).unwrap();
        enqueue(&tx, [7, 8, 7]);
        drop(tx);

        let stats = ProcessingWorker::new(rx, CancellationToken::new())
            .with_journal(AttendanceLog::open(&path).await.unwrap())
            .run()
            .await;

        assert_eq!(stats.processed, 3);
        let journal = rollcall_storage::read_records(&path).await.unwrap();
        assert_eq!(ids(&journal), vec![7, 8, 7]);
    }

    // Writes to /dev/full always fail with ENOSPC
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_journal_failures_do_not_stop_forwarding() {
        let (tx, rx) = event_queue(8).unwrap();
        let (collector, mut accepted) = MemoryCollector::new();
        enqueue(&tx, [1, 2, 3]);
        drop(tx);

        let stats = ProcessingWorker::new(rx, CancellationToken::new())
            .with_journal(AttendanceLog::open("/dev/full").await.unwrap())
            .with_collector(collector)
            .run()
            .await;

        assert_eq!(
            stats,
            WorkerStats {
                processed: 3,
                persist_failures: 3,
                forward_failures: 0,
            }
        );
        assert_eq!(ids(&accepted.drain()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_without_sinks_still_consumes() {
        let (tx, rx) = event_queue(8).unwrap();
        enqueue(&tx, [1, 2]);
        drop(tx);

        let stats = ProcessingWorker::new(rx, CancellationToken::new()).run().await;
        assert_eq!(stats.processed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_terminate_finishes_in_flight_event() {
        let (tx, rx) = event_queue(8).unwrap();
        let (collector, mut accepted) = MemoryCollector::new();
        let collector = collector.with_latency(Duration::from_millis(200));
        enqueue(&tx, [1, 2, 3]);

        let worker = ProcessingWorker::new(rx, CancellationToken::new())
            .with_collector(collector)
            .spawn();

        while accepted.attempts() == 0 {
            tokio::task::yield_now().await;
        }
        worker.soft_terminate();
        assert!(worker.is_terminating());

        let stats = worker.join().await.unwrap();
        assert_eq!(stats.processed, 1);
        assert_eq!(ids(&accepted.drain()), vec![1]);
        assert_eq!(accepted.attempts(), 1);
        drop(tx);
    }

    #[tokio::test]
    async fn test_soft_terminate_while_idle() {
        let (tx, rx) = event_queue(8).unwrap();
        let worker = ProcessingWorker::new(rx, CancellationToken::new()).spawn();

        tokio::task::yield_now().await;
        worker.soft_terminate();

        let stats = worker.join().await.unwrap();
        assert_eq!(stats, WorkerStats::default());
        drop(tx);
    }
}
