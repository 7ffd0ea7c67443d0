//! Card reader abstraction layer for the Rollcall attendance tracker.
//!
//! This crate defines the [`CardReader`] trait the poll loop drives, the
//! [`AnyCardReader`] enum used for concrete dispatch, and a controllable
//! [`MockReader`](mock::MockReader) for development and testing without a
//! physical reader.
//!
//! # Design Philosophy
//!
//! - **Async-first**: all I/O operations use native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Polled**: readers answer "which card is on the pad right now"; they do
//!   not push events. Dedup is the caller's concern.
//! - **Thread-safe**: the trait requires `Send + Sync` for use with Tokio.
//! - **Error-aware**: all operations return [`Result<T>`][error::Result].
//!
//! # Example
//!
//! ```no_run
//! use rollcall_hardware::traits::CardReader;
//! use rollcall_hardware::types::BeepPattern;
//! use rollcall_hardware::error::Result;
//!
//! async fn greet<R: CardReader>(reader: &mut R) -> Result<()> {
//!     reader.connect().await?;
//!     let info = reader.get_reader_info().await?;
//!     println!("Connected to {}", info.name);
//!     reader.beep(BeepPattern::short(1)).await
//! }
//! ```
//!
//! [`CardReader`]: traits::CardReader
//! [`AnyCardReader`]: devices::AnyCardReader

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::AnyCardReader;
pub use error::{HardwareError, Result};
pub use traits::{CardReader, NO_CARD_BITS};
pub use types::{BeepPattern, ReaderInfo};
