use rollcall_core::AttendeeData;
use rollcall_hardware::HardwareError;
use rollcall_storage::StorageError;
use thiserror::Error;

/// Errors that end a tracker run.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The reader could not be connected; polling never started
    #[error("Card reader connection failed: {0}")]
    ReaderConnect(#[source] HardwareError),

    /// A poll failed; the run ended
    #[error("Card reader failed while polling: {0}")]
    ReaderIo(#[source] HardwareError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid payload layout
    #[error(transparent)]
    Layout(#[from] rollcall_core::Error),

    /// The swipe log or the journal could not be opened
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A spawned task panicked or was aborted
    #[error("{0} task did not complete")]
    TaskFailed(&'static str),
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Enqueue failures. Both hand the rejected event back.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue is at capacity; the worker is lagging behind
    #[error("Event queue full, dropping {0}")]
    Full(AttendeeData),

    /// The worker is gone
    #[error("Event queue closed, dropping {0}")]
    Closed(AttendeeData),
}

impl QueueError {
    /// Recover the event that could not be enqueued.
    pub fn into_event(self) -> AttendeeData {
        match self {
            Self::Full(event) | Self::Closed(event) => event,
        }
    }
}
