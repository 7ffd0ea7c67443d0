//! Tracker configuration.
//!
//! Defaults match a single pcProx-style reader polled every 250ms. The
//! environment can override the file locations and the collector address:
//!
//! | variable                  | field            |
//! |---------------------------|------------------|
//! | `ROLLCALL_LOG_PATH`       | `log_path`       |
//! | `ROLLCALL_JOURNAL_PATH`   | `journal_path`   |
//! | `ROLLCALL_COLLECTOR_ADDR` | `collector_addr` |
//!
//! Empty values are ignored.

use crate::error::{Result, TrackerError};
use rollcall_core::IdentifierCodec;
use rollcall_core::constants::{
    BUFFER_LEN, DEFAULT_COLLECTOR_TIMEOUT_MS, DEFAULT_LOG_PATH, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_QUEUE_CAPACITY, ID_START_BYTE,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the swipe log path.
pub const ENV_LOG_PATH: &str = "ROLLCALL_LOG_PATH";

/// Environment variable enabling the worker journal.
pub const ENV_JOURNAL_PATH: &str = "ROLLCALL_JOURNAL_PATH";

/// Environment variable enabling the TCP collector.
pub const ENV_COLLECTOR_ADDR: &str = "ROLLCALL_COLLECTOR_ADDR";

/// Configuration for a tracker run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Swipe log written by the poll loop
    pub log_path: PathBuf,

    /// Journal written by the processing worker, if any
    pub journal_path: Option<PathBuf>,

    /// Remote collector address, if any
    pub collector_addr: Option<SocketAddr>,

    /// Timeout for collector I/O
    pub collector_timeout: Duration,

    /// Delay between two reader polls
    pub poll_interval: Duration,

    /// Capacity of the hand-off queue
    pub queue_capacity: usize,

    /// Size of the reader payload
    pub buffer_len: usize,

    /// Index of the most significant identifier byte
    pub id_start_byte: usize,

    /// Beep once for every recorded presentation
    pub beep_on_swipe: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            journal_path: None,
            collector_addr: None,
            collector_timeout: Duration::from_millis(DEFAULT_COLLECTOR_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            buffer_len: BUFFER_LEN,
            id_start_byte: ID_START_BYTE,
            beep_on_swipe: false,
        }
    }
}

impl TrackerConfig {
    /// Defaults overridden by the process environment.
    ///
    /// # Errors
    /// Returns `TrackerError::Config` if an override cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    /// Returns `TrackerError::Config` if an override cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = value(ENV_LOG_PATH) {
            config.log_path = PathBuf::from(path);
        }
        if let Some(path) = value(ENV_JOURNAL_PATH) {
            config.journal_path = Some(PathBuf::from(path));
        }
        if let Some(addr) = value(ENV_COLLECTOR_ADDR) {
            let addr = addr.trim().parse().map_err(|_| {
                TrackerError::Config(format!("{ENV_COLLECTOR_ADDR}: invalid address {addr:?}"))
            })?;
            config.collector_addr = Some(addr);
        }

        Ok(config)
    }

    /// Set the swipe log path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Set the worker journal path
    pub fn journal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.journal_path = Some(path.into());
        self
    }

    /// Set the collector address
    pub fn collector_addr(mut self, addr: SocketAddr) -> Self {
        self.collector_addr = Some(addr);
        self
    }

    /// Set the polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the payload layout
    pub fn layout(mut self, buffer_len: usize, id_start_byte: usize) -> Self {
        self.buffer_len = buffer_len;
        self.id_start_byte = id_start_byte;
        self
    }

    /// Set whether to beep on every recorded presentation
    pub fn beep_on_swipe(mut self, beep: bool) -> Self {
        self.beep_on_swipe = beep;
        self
    }

    /// Build the identifier codec for the configured layout.
    ///
    /// # Errors
    /// Returns `TrackerError::Layout` if the layout is invalid.
    pub fn codec(&self) -> Result<IdentifierCodec> {
        Ok(IdentifierCodec::new(self.buffer_len, self.id_start_byte)?)
    }

    /// Check every value before anything is opened.
    ///
    /// # Errors
    /// Returns `TrackerError::Config` for a zero interval or capacity or a
    /// journal sharing the swipe log path, and `TrackerError::Layout` for an
    /// invalid layout.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(TrackerError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(TrackerError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        // Paths are compared as written, not canonicalized
        if self.journal_path.as_ref() == Some(&self.log_path) {
            return Err(TrackerError::Config(format!(
                "journal and swipe log share {}",
                self.log_path.display()
            )));
        }
        self.codec().map(|_| ())
    }
}
