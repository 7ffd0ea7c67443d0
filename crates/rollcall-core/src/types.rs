use crate::{Result, error::Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized card identifier decoded from a reader payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u64);

impl CardId {
    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        CardId(id)
    }

    /// Get the raw identifier as u64.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for CardId {
    fn from(id: u64) -> Self {
        CardId(id)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CardId {
    type Err = Error;

    /// Parse a decimal identifier, or a hexadecimal one with a `0x` prefix.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse(),
        };
        parsed
            .map(CardId)
            .map_err(|_| Error::InvalidCardId(s.to_string()))
    }
}

/// A single "card presented" event.
///
/// Created once per detected presentation by the poll loop and consumed by
/// the processing worker. Two events with the same identifier are expected
/// whenever a card is removed and presented again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeData {
    timestamp: DateTime<Utc>,
    attendee_id: CardId,
}

impl AttendeeData {
    /// Record a presentation of `attendee_id` happening now.
    #[must_use]
    pub fn new(attendee_id: CardId) -> Self {
        Self::with_timestamp(Utc::now(), attendee_id)
    }

    /// Record a presentation at a known instant (replays and tests).
    #[must_use]
    pub fn with_timestamp(timestamp: DateTime<Utc>, attendee_id: CardId) -> Self {
        Self {
            timestamp,
            attendee_id,
        }
    }

    /// When the card was recognized.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Identifier of the presented card.
    #[must_use]
    pub fn attendee_id(&self) -> CardId {
        self.attendee_id
    }
}

impl fmt::Display for AttendeeData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}", self.attendee_id, self.timestamp)
    }
}
