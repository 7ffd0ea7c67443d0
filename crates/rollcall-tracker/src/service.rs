//! Wires the poll loop and the processing worker into one run.

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::poll::{PollLoop, PollStats};
use crate::queue::event_queue;
use crate::worker::{ProcessingWorker, WorkerStats};
use rollcall_hardware::AnyCardReader;
use rollcall_network::{AnyCollector, TcpCollector, TcpCollectorConfig};
use rollcall_storage::AttendanceLog;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Requests a stop of a running service. Clones stop the same run.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    terminate: CancellationToken,
    soft_terminate: CancellationToken,
}

impl StopHandle {
    /// Stop the poll loop and ask the worker to stop after its in-flight
    /// event. Calling it again has no effect.
    pub fn stop(&self) {
        if !self.terminate.is_cancelled() {
            info!("Stop requested");
        }
        self.soft_terminate.cancel();
        self.terminate.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.terminate.is_cancelled()
    }
}

/// Counters of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub poll: PollStats,
    pub worker: WorkerStats,
}

/// The attendance tracker: one poll loop feeding one processing worker.
///
/// # Examples
///
/// ```no_run
/// use rollcall_hardware::mock::MockReader;
/// use rollcall_tracker::{TrackerConfig, TrackerService};
///
/// # async fn example() -> rollcall_tracker::Result<()> {
/// let (reader, _handle) = MockReader::new();
/// let service = TrackerService::new(TrackerConfig::default());
/// let stop = service.stop_handle();
///
/// let running = service.start(reader.into());
/// stop.stop();
/// let summary = running.wait().await?;
/// println!("{} presentations recorded", summary.poll.emitted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TrackerService {
    config: TrackerConfig,
    collector: Option<AnyCollector>,
    stop: StopHandle,
}

impl TrackerService {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            collector: None,
            stop: StopHandle::default(),
        }
    }

    /// Forward events to `collector` instead of the configured address.
    pub fn with_collector(mut self, collector: impl Into<AnyCollector>) -> Self {
        self.collector = Some(collector.into());
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run until stopped or until the reader fails.
    ///
    /// The configuration is validated and the reader connected before the
    /// worker starts, so a failure there leaves nothing running. Once the
    /// poll loop ends the queue is closed and the worker is awaited: after a
    /// stop it exits behind its in-flight event, otherwise it drains the
    /// queue first.
    ///
    /// # Errors
    /// Configuration, storage and reader connection errors before polling
    /// starts; `TrackerError::ReaderIo` if a read fails during the run.
    pub async fn run(self, reader: AnyCardReader) -> Result<RunSummary> {
        let Self {
            config,
            collector,
            stop,
        } = self;

        config.validate()?;
        let codec = config.codec()?;

        let swipe_log = AttendanceLog::open(&config.log_path).await?;
        let journal = match &config.journal_path {
            Some(path) => Some(AttendanceLog::open(path).await?),
            None => None,
        };
        let collector = collector.or_else(|| {
            config.collector_addr.map(|server_addr| {
                AnyCollector::from(TcpCollector::new(TcpCollectorConfig {
                    server_addr,
                    timeout: config.collector_timeout,
                }))
            })
        });

        let (sender, receiver) = event_queue(config.queue_capacity)?;
        let mut poll = PollLoop::new(reader, codec, sender, stop.terminate.clone())
            .with_interval(config.poll_interval)
            .with_swipe_log(swipe_log)
            .with_beep_on_swipe(config.beep_on_swipe);
        poll.connect().await?;

        let mut worker = ProcessingWorker::new(receiver, stop.soft_terminate.clone());
        if let Some(journal) = journal {
            worker = worker.with_journal(journal);
        }
        if let Some(collector) = collector {
            worker = worker.with_collector(collector);
        }
        let worker = worker.spawn();

        info!(
            log = %config.log_path.display(),
            queue_capacity = config.queue_capacity,
            "Attendance tracker running"
        );

        let polled = poll.run().await;
        // Dropping the loop drops the sender, which closes the queue
        drop(poll);
        let worker_stats = worker.join().await?;

        let summary = RunSummary {
            poll: polled?,
            worker: worker_stats,
        };
        info!(
            emitted = summary.poll.emitted,
            processed = summary.worker.processed,
            "Attendance tracker stopped"
        );
        Ok(summary)
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn start(self, reader: AnyCardReader) -> ServiceHandle {
        let stop = self.stop_handle();
        let join = tokio::spawn(self.run(reader));
        ServiceHandle { stop, join }
    }
}

/// Handle to a service spawned with [`TrackerService::start`].
#[derive(Debug)]
pub struct ServiceHandle {
    stop: StopHandle,
    join: JoinHandle<Result<RunSummary>>,
}

impl ServiceHandle {
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Wait for the run to end.
    ///
    /// # Errors
    /// The run's own error, or `TrackerError::TaskFailed` if it panicked.
    pub async fn wait(self) -> Result<RunSummary> {
        self.join
            .await
            .map_err(|_| TrackerError::TaskFailed("tracker service"))?
    }
}
