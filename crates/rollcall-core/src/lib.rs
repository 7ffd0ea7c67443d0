//! Domain types and pure logic for the Rollcall attendance tracker.
//!
//! This crate holds the pieces of the card pipeline that do no I/O:
//!
//! - [`codec`]: turns a raw reader payload into a [`CardId`].
//! - [`detector`]: the "present while held" dedup rule.
//! - [`types`]: [`CardId`] and the [`AttendeeData`] event record.
//! - [`constants`]: default payload layout and pipeline tuning.

pub mod codec;
pub mod constants;
pub mod detector;
pub mod error;
pub mod types;

pub use codec::IdentifierCodec;
pub use detector::{ChangeDetector, should_emit};
pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
