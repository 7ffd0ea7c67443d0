//! Default values for the card pipeline.
//!
//! The payload layout constants describe the buffer filled by the reader
//! driver on each poll. The remaining constants tune the polling cadence and
//! the hand-off queue between the poll loop and the processing worker.
//!
//! # Usage
//!
//! ```
//! use rollcall_core::constants::*;
//! use std::time::Duration;
//!
//! assert!(ID_START_BYTE < BUFFER_LEN);
//! let interval = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
//! assert_eq!(interval.as_millis(), 250);
//! ```

// ============================================================================
// Payload Layout
// ============================================================================

/// Size of the buffer handed to the reader driver on every poll.
pub const BUFFER_LEN: usize = 8;

/// Index of the most significant identifier byte.
///
/// The card identifier occupies indices `ID_START_BYTE` down to `0`, so the
/// default layout reads a two byte identifier.
pub const ID_START_BYTE: usize = 1;

/// Largest identifier width (in bytes) that fits a [`CardId`](crate::CardId).
pub const MAX_ID_BYTES: usize = 8;

// ============================================================================
// Pipeline Tuning
// ============================================================================

/// Delay between two reader polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Capacity of the hand-off queue between poll loop and worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Timeout for collector I/O, in milliseconds.
pub const DEFAULT_COLLECTOR_TIMEOUT_MS: u64 = 3000;

// ============================================================================
// Local Log
// ============================================================================

/// File the swipe log is appended to when no override is configured.
pub const DEFAULT_LOG_PATH: &str = "attendeeLog.csv";

/// Separator between the timestamp and the identifier in a log record.
pub const RECORD_SEPARATOR: char = ',';
