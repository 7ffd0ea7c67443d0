//! Reader payload decoding.
//!
//! The reader driver fills a fixed-size buffer on every poll. Only the low
//! bytes carry the card identifier: bytes `id_start_byte` down to `0`, with
//! the byte at `id_start_byte` being the most significant one. The remaining
//! bytes (facility code, parity, padding) are ignored.
//!
//! ```text
//! index:   0     1     2 ... 7
//! bytes: [0x00][0x1A][ ignored ]
//!          lo    hi
//! id = 0x1A00 = 6656
//! ```
//!
//! The layout is validated once, when the codec is built. A codec that was
//! built successfully never fails on a payload of the configured length.

use crate::{
    CardId, Result,
    constants::{BUFFER_LEN, ID_START_BYTE, MAX_ID_BYTES},
    error::Error,
};

/// Decoder for the identifier bytes of a reader payload.
///
/// # Examples
///
/// ```
/// use rollcall_core::{CardId, IdentifierCodec};
///
/// let codec = IdentifierCodec::default();
/// let payload = [0x00, 0x1A, 0xFF, 0xFF, 0, 0, 0, 0];
/// assert_eq!(codec.decode(&payload).unwrap(), CardId::new(0x1A00));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierCodec {
    buffer_len: usize,
    id_start_byte: usize,
}

impl IdentifierCodec {
    /// Build a codec for a `buffer_len` byte payload whose identifier starts
    /// at `id_start_byte`.
    ///
    /// # Errors
    /// Returns `Error::InvalidLayout` if the buffer is empty, if
    /// `id_start_byte` falls outside the buffer, or if the identifier is wider
    /// than a [`CardId`] can hold.
    pub fn new(buffer_len: usize, id_start_byte: usize) -> Result<Self> {
        if buffer_len == 0 || id_start_byte >= buffer_len || id_start_byte >= MAX_ID_BYTES {
            return Err(Error::InvalidLayout {
                buffer_len,
                id_start_byte,
            });
        }
        Ok(Self {
            buffer_len,
            id_start_byte,
        })
    }

    /// Length of the buffer the driver must fill.
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    /// Number of bytes that make up the identifier.
    #[must_use]
    pub fn id_width(&self) -> usize {
        self.id_start_byte + 1
    }

    /// Decode the identifier carried by `payload`.
    ///
    /// # Errors
    /// Returns `Error::ShortPayload` if `payload` is shorter than the
    /// configured buffer length.
    pub fn decode(&self, payload: &[u8]) -> Result<CardId> {
        if payload.len() < self.buffer_len {
            return Err(Error::ShortPayload {
                expected: self.buffer_len,
                actual: payload.len(),
            });
        }

        let id = payload[..=self.id_start_byte]
            .iter()
            .rev()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
        Ok(CardId::new(id))
    }

    /// Build a payload that decodes to `id`.
    ///
    /// Bits above the identifier width are discarded, matching what a reader
    /// with the same layout could report.
    #[must_use]
    pub fn encode(&self, id: CardId) -> Vec<u8> {
        let mut payload = vec![0u8; self.buffer_len];
        let raw = id.as_u64().to_le_bytes();
        payload[..self.id_width()].copy_from_slice(&raw[..self.id_width()]);
        payload
    }

    /// Whether `id` fits in the identifier bytes of this layout.
    #[must_use]
    pub fn fits(&self, id: CardId) -> bool {
        self.id_width() >= MAX_ID_BYTES || id.as_u64() >> (8 * self.id_width()) == 0
    }

    /// Build a payload that decodes to `id`, refusing identifiers wider than
    /// the layout.
    ///
    /// # Errors
    /// Returns `Error::InvalidCardId` if `id` does not fit.
    pub fn try_encode(&self, id: CardId) -> Result<Vec<u8>> {
        if !self.fits(id) {
            return Err(Error::InvalidCardId(format!(
                "{id} does not fit in {} bytes",
                self.id_width()
            )));
        }
        Ok(self.encode(id))
    }
}

impl Default for IdentifierCodec {
    fn default() -> Self {
        Self {
            buffer_len: BUFFER_LEN,
            id_start_byte: ID_START_BYTE,
        }
    }
}
