//! Enum wrapper for reader dispatch.
//!
//! Native `async fn` in traits are not object-safe, so `Box<dyn CardReader>`
//! is not available. [`AnyCardReader`] provides concrete type dispatch
//! instead, which also keeps the futures `Send` when the poll loop is spawned
//! on the Tokio runtime.
//!
//! # Examples
//!
//! ```
//! use rollcall_hardware::devices::AnyCardReader;
//! use rollcall_hardware::mock::MockReader;
//!
//! let (reader, _handle) = MockReader::new();
//! let any_reader = AnyCardReader::Mock(reader);
//! ```

use crate::mock::MockReader;
use crate::traits::CardReader;
use crate::{BeepPattern, ReaderInfo, Result};

/// Enum wrapper for card reader dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCardReader {
    /// Mock reader for development and testing.
    Mock(MockReader),
}

impl CardReader for AnyCardReader {
    async fn connect(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.connect().await,
        }
    }

    async fn read_active_id(&mut self, buffer: &mut [u8]) -> Result<i16> {
        match self {
            Self::Mock(device) => device.read_active_id(buffer).await,
        }
    }

    async fn beep(&mut self, pattern: BeepPattern) -> Result<()> {
        match self {
            Self::Mock(device) => device.beep(pattern).await,
        }
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        match self {
            Self::Mock(device) => device.get_reader_info().await,
        }
    }
}

impl From<MockReader> for AnyCardReader {
    fn from(reader: MockReader) -> Self {
        Self::Mock(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{CardId, IdentifierCodec};

    #[tokio::test]
    async fn test_any_reader_dispatches_to_mock() {
        let (reader, handle) = MockReader::new();
        let mut reader = AnyCardReader::from(reader);

        reader.connect().await.unwrap();
        handle.present_card(CardId::new(42)).unwrap();

        let mut buffer = [0u8; 8];
        let bits = reader.read_active_id(&mut buffer).await.unwrap();
        assert!(bits > 0);
        assert_eq!(
            IdentifierCodec::default().decode(&buffer).unwrap(),
            CardId::new(42)
        );

        reader.beep(BeepPattern::short(1)).await.unwrap();
        assert_eq!(handle.beep_count(), 1);

        let info = reader.get_reader_info().await.unwrap();
        assert_eq!(info.name, "Mock Card Reader");
    }
}
