//! Remote collector clients for the Rollcall attendance tracker.
//!
//! The processing worker forwards every attendance event to a collector.
//! This crate provides the [`Collector`] trait and two implementations:
//!
//! - [`TcpCollector`]: newline-delimited JSON over TCP
//! - [`MemoryCollector`]: in-process, for tests and dry runs
//!
//! [`AnyCollector`] provides concrete dispatch, since the trait uses native
//! `async fn` and is not object-safe.
//!
//! # Example
//!
//! ```no_run
//! use rollcall_core::{AttendeeData, CardId};
//! use rollcall_network::{AnyCollector, Collector, TcpCollector, TcpCollectorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TcpCollectorConfig {
//!     server_addr: "192.168.0.100:4000".parse()?,
//!     ..Default::default()
//! };
//!
//! let mut collector = AnyCollector::from(TcpCollector::new(config));
//! collector.submit(&AttendeeData::new(CardId::new(6656))).await?;
//! # Ok(())
//! # }
//! ```

mod collector;
mod error;
mod memory;
mod tcp;

pub use collector::{AnyCollector, Collector};
pub use error::CollectorError;
pub use memory::{MemoryCollector, MemoryCollectorHandle};
pub use tcp::{DEFAULT_COLLECTOR_PORT, TcpCollector, TcpCollectorConfig};
