//! Local durable storage for the Rollcall attendance tracker.
//!
//! Attendance events are kept in a plain append-only CSV file, one event per
//! line. The file is the local record of every card presentation and is
//! independent from the remote collector.
//!
//! # Modules
//!
//! - [`log`]: the [`AttendanceLog`] sink and [`read_records`]
//! - [`record`]: the line format
//! - [`error`]: [`StorageError`]

pub mod error;
pub mod log;
pub mod record;

pub use error::{StorageError, StorageResult};
pub use log::{AttendanceLog, read_records};
pub use record::{format_record, parse_record};
