//! Common types shared across reader implementations.

use serde::{Deserialize, Serialize};

/// Card reader information.
///
/// Contains metadata about the connected reader, logged once the reader is
/// connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "pcProx USB").
    pub name: String,

    /// Reader model identifier.
    pub model: String,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl ReaderInfo {
    /// Create a new ReaderInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Audible feedback request for the reader buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeepPattern {
    /// Number of beeps.
    pub count: u8,

    /// Long beeps instead of short ones.
    pub long: bool,
}

impl BeepPattern {
    /// `count` short beeps.
    pub fn short(count: u8) -> Self {
        Self { count, long: false }
    }

    /// `count` long beeps.
    pub fn long(count: u8) -> Self {
        Self { count, long: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_info_builder() {
        let info = ReaderInfo::new("pcProx USB", "RDR-6081").with_firmware_version("v13.4");

        assert_eq!(info.name, "pcProx USB");
        assert_eq!(info.model, "RDR-6081");
        assert_eq!(info.firmware_version, Some("v13.4".to_string()));
    }

    #[test]
    fn test_beep_pattern_constructors() {
        assert_eq!(
            BeepPattern::short(2),
            BeepPattern {
                count: 2,
                long: false
            }
        );
        assert!(BeepPattern::long(1).long);
    }

    #[test]
    fn test_reader_info_serialization() {
        let info = ReaderInfo::new("Mock Card Reader", "Mock");
        let json = serde_json::to_string(&info).unwrap();
        let deserialized: ReaderInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, deserialized);
    }
}
