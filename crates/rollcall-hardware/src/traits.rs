//! Card reader trait definition.
//!
//! The [`CardReader`] trait is the contract between the poll loop and a
//! reader driver. It mirrors the small capability set of proximity card
//! readers: connect once, read the active card identifier on demand, and
//! sound the buzzer.
//!
//! The trait uses native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT), so it is not object-safe. Use
//! [`AnyCardReader`](crate::devices::AnyCardReader) where a concrete type is
//! required.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{BeepPattern, ReaderInfo};

/// Bit count reported by a read when no card is on the reader.
pub const NO_CARD_BITS: i16 = 0;

/// Trait for proximity card readers.
///
/// A reader is polled: [`read_active_id`](CardReader::read_active_id)
/// returns immediately with whatever card is currently in the field, and
/// keeps reporting the same card on every call until it is removed.
///
/// Readers are connected once and never disconnected; common drivers offer
/// no disconnect primitive.
///
/// # Examples
///
/// ```no_run
/// use rollcall_hardware::traits::CardReader;
/// use rollcall_hardware::error::Result;
///
/// async fn card_present<R: CardReader>(reader: &mut R) -> Result<bool> {
///     let mut buffer = [0u8; 8];
///     let bits = reader.read_active_id(&mut buffer).await?;
///     Ok(bits > 0)
/// }
/// ```
pub trait CardReader: Send + Sync {
    /// Connect to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if no reader is found or it cannot be opened. The
    /// caller treats this as fatal.
    async fn connect(&mut self) -> Result<()>;

    /// Read the card currently on the reader into `buffer`.
    ///
    /// Returns the number of bits read. Zero or a negative value means no
    /// card is present, in which case the buffer content is meaningless.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is not connected or a communication
    /// error occurs.
    async fn read_active_id(&mut self, buffer: &mut [u8]) -> Result<i16>;

    /// Sound the reader buzzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is rejected or a communication error
    /// occurs.
    async fn beep(&mut self, pattern: BeepPattern) -> Result<()>;

    /// Get reader information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying the
    /// reader.
    async fn get_reader_info(&self) -> Result<ReaderInfo>;
}
