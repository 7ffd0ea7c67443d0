//! Property-based tests for the dedup rule.

use proptest::prelude::*;
use rollcall_core::{CardId, ChangeDetector};

const BITS: i16 = 26;

fn run(detector: &mut ChangeDetector, reads: &[Option<u64>]) -> Vec<CardId> {
    reads
        .iter()
        .filter_map(|read| match read {
            Some(raw) => detector.observe(BITS, Some(CardId::new(*raw))),
            None => detector.observe(0, None),
        })
        .collect()
}

proptest! {
    #[test]
    fn held_card_emits_once(id in 1u64..=0xFFFF, held in 1usize..50) {
        let mut reads = vec![Some(id); held];
        reads.push(None);

        let events = run(&mut ChangeDetector::new(), &reads);
        prop_assert_eq!(events, vec![CardId::new(id)]);
    }

    #[test]
    fn represented_card_emits_twice(id in 1u64..=0xFFFF, first in 1usize..10, second in 1usize..10) {
        let mut reads = vec![Some(id); first];
        reads.push(None);
        reads.extend(std::iter::repeat_n(Some(id), second));

        let events = run(&mut ChangeDetector::new(), &reads);
        prop_assert_eq!(events, vec![CardId::new(id), CardId::new(id)]);
    }

    #[test]
    fn one_event_per_presentation(reads in prop::collection::vec(prop::option::of(1u64..4), 0..100)) {
        // A presentation starts wherever the read differs from the one before.
        let mut expected = Vec::new();
        let mut previous = None;
        for read in &reads {
            if let Some(id) = read
                && previous != Some(*id)
            {
                expected.push(CardId::new(*id));
            }
            previous = *read;
        }

        let events = run(&mut ChangeDetector::new(), &reads);
        prop_assert_eq!(events, expected);
    }

    #[test]
    fn events_never_repeat_back_to_back_without_gap(ids in prop::collection::vec(1u64..6, 1..60)) {
        let reads: Vec<_> = ids.iter().copied().map(Some).collect();
        let events = run(&mut ChangeDetector::new(), &reads);

        for pair in events.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }
}
