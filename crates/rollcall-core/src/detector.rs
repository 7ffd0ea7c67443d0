//! Change detection for card reads.
//!
//! A reader reports the same card on every poll for as long as it stays on
//! the pad. Attendance is recorded once per physical presentation, so a read
//! only produces an event when the identifier differs from the last one seen.
//! A poll without a card clears the memory, which makes a card that is
//! removed and presented again count twice.

use crate::CardId;

/// Decide whether a poll result produces an attendance event.
///
/// `bits` is the bit count reported by the driver (`<= 0` means no card is
/// present) and `current` the identifier decoded from the payload, if any.
/// Returns the emit decision together with the new last seen identifier.
///
/// # Examples
///
/// ```
/// use rollcall_core::{CardId, should_emit};
///
/// let card = CardId::new(5);
/// assert_eq!(should_emit(None, 26, Some(card)), (true, Some(card)));
/// assert_eq!(should_emit(Some(card), 26, Some(card)), (false, Some(card)));
/// assert_eq!(should_emit(Some(card), 0, None), (false, None));
/// ```
#[must_use]
pub fn should_emit(
    last: Option<CardId>,
    bits: i16,
    current: Option<CardId>,
) -> (bool, Option<CardId>) {
    if bits <= 0 {
        return (false, None);
    }
    match current {
        Some(id) if last != Some(id) => (true, Some(id)),
        _ => (false, last),
    }
}

/// Stateful wrapper around [`should_emit`] holding the reader session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeDetector {
    last_seen: Option<CardId>,
}

impl ChangeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one poll result, returning the identifier to emit, if any.
    pub fn observe(&mut self, bits: i16, current: Option<CardId>) -> Option<CardId> {
        let (emit, last) = should_emit(self.last_seen, bits, current);
        self.last_seen = last;
        if emit { last } else { None }
    }

    /// Identifier of the card currently held on the reader, if any.
    #[must_use]
    pub fn last_seen(&self) -> Option<CardId> {
        self.last_seen
    }

    /// Forget the current session.
    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BITS: i16 = 26;

    /// Run a sequence of reads (0 meaning "no card") through a detector.
    fn emitted(reads: &[u64]) -> Vec<u64> {
        let mut detector = ChangeDetector::new();
        reads
            .iter()
            .filter_map(|&raw| {
                if raw == 0 {
                    detector.observe(0, None)
                } else {
                    detector.observe(BITS, Some(CardId::new(raw)))
                }
            })
            .map(|id| id.as_u64())
            .collect()
    }

    #[rstest]
    #[case(&[5, 5, 5, 9, 9, 5], &[5, 9, 5])]
    #[case(&[5, 0, 5], &[5, 5])]
    #[case(&[7, 7, 7, 7, 0], &[7])]
    #[case(&[0, 0, 0], &[])]
    #[case(&[3, 4, 3, 4], &[3, 4, 3, 4])]
    #[case(&[8, 0, 0, 8, 8], &[8, 8])]
    fn test_emit_sequences(#[case] reads: &[u64], #[case] expected: &[u64]) {
        assert_eq!(emitted(reads), expected);
    }

    #[test]
    fn test_no_card_resets_regardless_of_last() {
        let last = Some(CardId::new(5));
        assert_eq!(should_emit(last, 0, Some(CardId::new(5))), (false, None));
        assert_eq!(should_emit(last, -1, None), (false, None));
    }

    #[test]
    fn test_positive_bits_without_identifier_keeps_session() {
        let last = Some(CardId::new(5));
        assert_eq!(should_emit(last, BITS, None), (false, last));
    }

    #[test]
    fn test_detector_tracks_last_seen() {
        let mut detector = ChangeDetector::new();
        assert_eq!(detector.last_seen(), None);

        detector.observe(BITS, Some(CardId::new(12)));
        assert_eq!(detector.last_seen(), Some(CardId::new(12)));

        detector.observe(0, None);
        assert_eq!(detector.last_seen(), None);
    }

    #[test]
    fn test_detector_reset() {
        let mut detector = ChangeDetector::new();
        let card = CardId::new(12);

        assert_eq!(detector.observe(BITS, Some(card)), Some(card));
        detector.reset();
        assert_eq!(detector.observe(BITS, Some(card)), Some(card));
    }
}
