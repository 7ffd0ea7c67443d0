//! Attendance tracking pipeline for the Rollcall RFID reader.
//!
//! A [`PollLoop`] reads the card reader every `poll_interval`, turns each
//! card presentation into one [`AttendeeData`](rollcall_core::AttendeeData)
//! event and hands it to a [`ProcessingWorker`] through a bounded queue. The
//! worker journals the event and forwards it to a remote collector.
//! [`TrackerService`] wires both together.
//!
//! ```text
//! reader -> PollLoop -> swipe log
//!              |
//!         event queue (bounded, drop on full)
//!              |
//!        ProcessingWorker -> journal, collector
//! ```
//!
//! Stopping cancels two tokens: the terminate token ends the poll loop
//! within one interval, the soft-terminate token lets the worker finish its
//! in-flight event and leave the rest.

pub mod config;
pub mod error;
pub mod poll;
pub mod queue;
pub mod service;
pub mod worker;

pub use config::TrackerConfig;
pub use error::{QueueError, Result, TrackerError};
pub use poll::{PollLoop, PollState, PollStats};
pub use queue::{EventReceiver, EventSender, event_queue};
pub use service::{RunSummary, ServiceHandle, StopHandle, TrackerService};
pub use worker::{ProcessingWorker, WorkerHandle, WorkerStats};
