//! Mock card reader implementation for testing and development.
//!
//! The mock reader runs in one of two modes:
//!
//! - **Live**: a [`MockReaderHandle`] places cards on the reader and removes
//!   them. Every poll reports whatever is currently in the field, so a card
//!   that stays on the reader is read again on each poll, exactly like a
//!   physical proximity reader.
//! - **Scripted**: every poll consumes the next [`MockRead`] of a fixed
//!   script. Once the script is exhausted the reader reports itself as
//!   disconnected, which ends a poll loop deterministically.

use crate::{
    HardwareError, Result,
    traits::{CardReader, NO_CARD_BITS},
    types::{BeepPattern, ReaderInfo},
};
use rollcall_core::{CardId, IdentifierCodec};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Bit count reported by the mock for any card (26-bit Wiegand format).
pub const MOCK_CARD_BITS: i16 = 26;

/// One scripted poll result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRead {
    /// A card is on the reader; the payload is copied into the read buffer.
    Card(Vec<u8>),

    /// The field is empty.
    NoCard,

    /// The read fails with a communication error.
    Fail,
}

impl MockRead {
    /// A card read encoded with the default payload layout.
    pub fn card(id: impl Into<CardId>) -> Self {
        Self::Card(IdentifierCodec::default().encode(id.into()))
    }
}

/// What the live reader currently sees.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    Empty,
    Card(Vec<u8>),
    Unplugged,
}

#[derive(Debug)]
enum Source {
    Live(watch::Receiver<Field>),
    Script(VecDeque<MockRead>),
}

#[derive(Debug, Default)]
struct Counters {
    polls: AtomicU64,
    beeps: AtomicU64,
}

/// Mock card reader for testing and development.
///
/// # Examples
///
/// ```
/// use rollcall_core::{CardId, IdentifierCodec};
/// use rollcall_hardware::mock::MockReader;
/// use rollcall_hardware::traits::CardReader;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///     reader.connect().await?;
///
///     handle.present_card(CardId::new(6656))?;
///
///     let mut buffer = [0u8; 8];
///     let bits = reader.read_active_id(&mut buffer).await?;
///     assert!(bits > 0);
///     assert_eq!(IdentifierCodec::default().decode(&buffer).unwrap(), CardId::new(6656));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    /// Where poll results come from
    source: Source,

    /// Device name
    name: String,

    /// Set by a successful `connect()`
    connected: bool,

    /// Make `connect()` fail as if no reader were plugged in
    fail_connect: bool,

    /// Shared with the handle
    counters: Arc<Counters>,
}

impl MockReader {
    /// Create a live mock reader with the default name.
    ///
    /// Returns a tuple of (MockReader, MockReaderHandle) where the handle
    /// places cards on and removes them from the reader.
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_name("Mock Card Reader")
    }

    /// Create a live mock reader with a custom name.
    pub fn with_name(name: impl Into<String>) -> (Self, MockReaderHandle) {
        let (field_tx, field_rx) = watch::channel(Field::Empty);
        Self::build(name.into(), Source::Live(field_rx), field_tx)
    }

    /// Create a reader that replays `reads`, one per poll.
    ///
    /// After the last scripted read the reader reports a disconnection.
    /// The handle only exposes counters in this mode; presenting cards
    /// through it has no effect.
    pub fn scripted(reads: impl IntoIterator<Item = MockRead>) -> (Self, MockReaderHandle) {
        let (field_tx, _) = watch::channel(Field::Empty);
        Self::build(
            "Scripted Card Reader".to_string(),
            Source::Script(reads.into_iter().collect()),
            field_tx,
        )
    }

    fn build(
        name: String,
        source: Source,
        field_tx: watch::Sender<Field>,
    ) -> (Self, MockReaderHandle) {
        let counters = Arc::new(Counters::default());

        let reader = Self {
            source,
            name,
            connected: false,
            fail_connect: false,
            counters: Arc::clone(&counters),
        };

        let handle = MockReaderHandle {
            field_tx: Arc::new(field_tx),
            codec: IdentifierCodec::default(),
            counters,
        };

        (reader, handle)
    }

    /// Make `connect()` fail, simulating a missing device.
    pub fn with_connect_failure(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Whether `connect()` has succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Scripted reads not consumed yet (zero in live mode).
    pub fn remaining_script(&self) -> usize {
        match &self.source {
            Source::Script(script) => script.len(),
            Source::Live(_) => 0,
        }
    }

    fn next_read(&mut self) -> Result<MockRead> {
        match &mut self.source {
            Source::Live(field_rx) => Ok(match &*field_rx.borrow() {
                Field::Empty => MockRead::NoCard,
                Field::Card(payload) => MockRead::Card(payload.clone()),
                Field::Unplugged => {
                    return Err(HardwareError::disconnected(self.name.clone()));
                }
            }),
            Source::Script(script) => script
                .pop_front()
                .ok_or_else(|| HardwareError::disconnected(format!("{} (script exhausted)", self.name))),
        }
    }
}

impl CardReader for MockReader {
    async fn connect(&mut self) -> Result<()> {
        if self.fail_connect {
            return Err(HardwareError::not_found(self.name.clone()));
        }
        self.connected = true;
        Ok(())
    }

    async fn read_active_id(&mut self, buffer: &mut [u8]) -> Result<i16> {
        if !self.connected {
            return Err(HardwareError::disconnected(self.name.clone()));
        }
        self.counters.polls.fetch_add(1, Ordering::Relaxed);

        buffer.fill(0);
        match self.next_read()? {
            MockRead::Card(payload) => {
                let len = payload.len().min(buffer.len());
                buffer[..len].copy_from_slice(&payload[..len]);
                Ok(MOCK_CARD_BITS)
            }
            MockRead::NoCard => Ok(NO_CARD_BITS),
            MockRead::Fail => Err(HardwareError::communication(format!(
                "{}: scripted read failure",
                self.name
            ))),
        }
    }

    async fn beep(&mut self, pattern: BeepPattern) -> Result<()> {
        if !self.connected {
            return Err(HardwareError::disconnected(self.name.clone()));
        }
        if pattern.count == 0 {
            return Err(HardwareError::invalid_data("Beep count must be at least 1"));
        }
        self.counters.beeps.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        Ok(ReaderInfo::new(self.name.clone(), "Mock").with_firmware_version(rollcall_core::VERSION))
    }
}

/// Handle for controlling a live mock reader.
///
/// Cloned handles control the same reader.
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    field_tx: Arc<watch::Sender<Field>>,
    codec: IdentifierCodec,
    counters: Arc<Counters>,
}

impl MockReaderHandle {
    /// Place a card on the reader, replacing any card already there.
    ///
    /// # Errors
    /// Returns `HardwareError::InvalidData` if `id` is wider than the
    /// reader's identifier bytes. The field is left unchanged.
    pub fn present_card(&self, id: CardId) -> Result<()> {
        let payload = self
            .codec
            .try_encode(id)
            .map_err(|e| HardwareError::invalid_data(e.to_string()))?;
        self.present_payload(payload);
        Ok(())
    }

    /// Place a card with a raw payload on the reader.
    pub fn present_payload(&self, payload: Vec<u8>) {
        self.field_tx.send_replace(Field::Card(payload));
    }

    /// Remove the current card from the reader.
    pub fn remove_card(&self) {
        self.field_tx.send_replace(Field::Empty);
    }

    /// Unplug the reader: every following read fails.
    pub fn unplug(&self) {
        self.field_tx.send_replace(Field::Unplugged);
    }

    /// Identifier of the card currently on the reader, if any.
    pub fn current_card(&self) -> Option<CardId> {
        match &*self.field_tx.borrow() {
            Field::Card(payload) => self.codec.decode(payload).ok(),
            Field::Empty | Field::Unplugged => None,
        }
    }

    /// Number of reads performed on a connected reader.
    pub fn poll_count(&self) -> u64 {
        self.counters.polls.load(Ordering::Relaxed)
    }

    /// Number of accepted beep requests.
    pub fn beep_count(&self) -> u64 {
        self.counters.beeps.load(Ordering::Relaxed)
    }
}
