use thiserror::Error;

/// Errors that can occur while forwarding events to the collector
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Client is not connected to the collector
    #[error("Not connected to collector")]
    NotConnected,

    /// Connection attempt timed out
    #[error("Connection timeout after {0}ms")]
    ConnectionTimeout(u64),

    /// Write operation timed out
    #[error("Write timeout after {0}ms")]
    WriteTimeout(u64),

    /// Connection was lost during operation
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// The collector refused the event
    #[error("Event rejected: {0}")]
    Rejected(String),

    /// Line framing error
    #[error("Codec error: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    /// Event could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
