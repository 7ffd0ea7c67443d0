//! Poll loop: reads the reader at a fixed cadence and publishes one event
//! per card presentation.

use crate::error::{QueueError, Result, TrackerError};
use crate::queue::EventSender;
use rollcall_core::constants::DEFAULT_POLL_INTERVAL_MS;
use rollcall_core::{AttendeeData, ChangeDetector, IdentifierCodec};
use rollcall_hardware::{AnyCardReader, BeepPattern, CardReader};
use rollcall_storage::AttendanceLog;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Lifecycle of a [`PollLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Disconnected,
    Connected,
    Polling,
    Terminated,
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Polling => "polling",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Successful reads
    pub polls: u64,

    /// Presentations detected
    pub emitted: u64,

    /// Events the queue refused
    pub dropped: u64,

    /// Events the swipe log failed to record
    pub log_failures: u64,
}

/// Single producer of attendance events.
///
/// Every cycle reads the reader into a zeroed buffer, decodes the identifier
/// when a card is present and runs the change detector. A detected
/// presentation is timestamped, appended to the swipe log and enqueued.
/// Cancelling the terminate token ends the loop at the next check, which
/// happens before every read and during every sleep.
#[derive(Debug)]
pub struct PollLoop {
    reader: AnyCardReader,
    codec: IdentifierCodec,
    detector: ChangeDetector,
    queue: EventSender,
    swipe_log: Option<AttendanceLog>,
    interval: Duration,
    beep_on_swipe: bool,
    terminate: CancellationToken,
    state: PollState,
    stats: PollStats,
    buffer: Vec<u8>,
}

impl PollLoop {
    pub fn new(
        reader: impl Into<AnyCardReader>,
        codec: IdentifierCodec,
        queue: EventSender,
        terminate: CancellationToken,
    ) -> Self {
        Self {
            reader: reader.into(),
            buffer: vec![0; codec.buffer_len()],
            codec,
            detector: ChangeDetector::new(),
            queue,
            swipe_log: None,
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            beep_on_swipe: false,
            terminate,
            state: PollState::Disconnected,
            stats: PollStats::default(),
        }
    }

    /// Set the delay between two reads.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Record every presentation in `log` before it is enqueued.
    pub fn with_swipe_log(mut self, log: AttendanceLog) -> Self {
        self.swipe_log = Some(log);
        self
    }

    /// Beep once on every presentation.
    pub fn with_beep_on_swipe(mut self, beep: bool) -> Self {
        self.beep_on_swipe = beep;
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Connect the reader. Does nothing if already connected.
    ///
    /// # Errors
    /// Returns `TrackerError::ReaderConnect` if the reader cannot be opened.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state != PollState::Disconnected {
            return Ok(());
        }

        if let Err(e) = self.reader.connect().await {
            error!("Failed to connect card reader: {}", e);
            return Err(TrackerError::ReaderConnect(e));
        }
        self.state = PollState::Connected;

        match self.reader.get_reader_info().await {
            Ok(info) => info!(
                reader = %info.name,
                model = %info.model,
                "Card reader connected"
            ),
            Err(e) => warn!("Card reader connected, info unavailable: {}", e),
        }
        Ok(())
    }

    /// Poll until the terminate token fires or a read fails.
    ///
    /// Connects first if needed. The state is `Terminated` afterwards in
    /// both cases.
    ///
    /// # Errors
    /// `TrackerError::ReaderConnect` if connecting fails, `ReaderIo` if a
    /// read fails.
    pub async fn run(&mut self) -> Result<PollStats> {
        self.connect().await?;
        self.state = PollState::Polling;
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Polling card reader"
        );

        let result = loop {
            if self.terminate.is_cancelled() {
                break Ok(());
            }
            if let Err(e) = self.poll_once().await {
                break Err(e);
            }
            tokio::select! {
                biased;
                _ = self.terminate.cancelled() => break Ok(()),
                _ = tokio::time::sleep(self.interval) => {}
            }
        };
        self.state = PollState::Terminated;

        match &result {
            Ok(()) => info!(
                polls = self.stats.polls,
                emitted = self.stats.emitted,
                dropped = self.stats.dropped,
                "Poll loop terminated"
            ),
            Err(TrackerError::ReaderIo(e)) if e.is_disconnect() => {
                error!("Card reader disconnected, poll loop stopped: {}", e)
            }
            Err(e) => error!("Poll loop stopped: {}", e),
        }
        result.map(|()| self.stats)
    }

    /// Run one read cycle.
    ///
    /// Returns the event published in this cycle, if any.
    ///
    /// # Errors
    /// Returns `TrackerError::ReaderIo` if the read fails.
    pub async fn poll_once(&mut self) -> Result<Option<AttendeeData>> {
        self.buffer.fill(0);
        let bits = self
            .reader
            .read_active_id(&mut self.buffer)
            .await
            .map_err(TrackerError::ReaderIo)?;
        self.stats.polls += 1;

        let current = if bits > 0 {
            Some(self.codec.decode(&self.buffer)?)
        } else {
            None
        };

        let Some(id) = self.detector.observe(bits, current) else {
            return Ok(None);
        };

        let event = AttendeeData::new(id);
        self.stats.emitted += 1;
        info!(attendee = %id, "Card presented");

        self.record(&event).await;
        if self.beep_on_swipe
            && let Err(e) = self.reader.beep(BeepPattern::short(1)).await
        {
            warn!("Beep failed: {}", e);
        }
        self.publish(event.clone());

        Ok(Some(event))
    }

    async fn record(&mut self, event: &AttendeeData) {
        let Some(log) = self.swipe_log.as_mut() else {
            return;
        };
        if let Err(e) = log.append(event).await {
            self.stats.log_failures += 1;
            error!("Failed to record {} in swipe log: {}", event, e);
        }
    }

    fn publish(&mut self, event: AttendeeData) {
        match self.queue.enqueue(event) {
            Ok(()) => debug!(pending = self.queue.len(), "Event queued"),
            Err(QueueError::Full(event)) => {
                self.stats.dropped += 1;
                warn!(
                    capacity = self.queue.capacity(),
                    "Event queue full, dropping {}", event
                );
            }
            Err(QueueError::Closed(event)) => {
                self.stats.dropped += 1;
                warn!("Event queue closed, dropping {}", event);
            }
        }
    }
}
