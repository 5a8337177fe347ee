//! Property-based tests for the merge engine.
//!
//! Generates random pole chains and combinator pairs, merges them in random
//! order at random offsets, and checks the structural invariants.

use cityblock_core::test_utils::*;
use cityblock_core::{Blueprint, Offset};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// One of a few template shapes.
fn arb_source() -> impl Strategy<Value = Blueprint> {
    prop_oneof![
        (1..6u32).prop_map(|n| pole_chain("medium-electric-pole", n)),
        (1..4u32).prop_map(|n| pole_chain("big-electric-pole", n)),
        Just(combinator_pair()),
        Just(Blueprint::new()),
    ]
}

fn arb_offset() -> impl Strategy<Value = Offset> {
    (-64i32..64, -64i32..64).prop_map(|(x, y)| Offset::new(x as f64 * 0.5, y as f64 * 0.5))
}

fn arb_merges(max: usize) -> impl Strategy<Value = Vec<(Blueprint, Offset)>> {
    proptest::collection::vec((arb_source(), arb_offset()), 1..=max)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Numbers stay unique and every wire/neighbour resolves after any
    /// sequence of merges.
    #[test]
    fn merges_preserve_integrity(base in arb_source(), merges in arb_merges(12)) {
        let mut target = base;
        for (source, offset) in &merges {
            target.merge(source, *offset).unwrap();
        }
        prop_assert!(target.problems().is_empty(), "{:?}", target.problems());
    }

    /// Merging never modifies the source.
    #[test]
    fn merge_leaves_source_untouched(source in arb_source(), a in arb_offset(), b in arb_offset()) {
        let snapshot = source.clone();
        let mut target = pole_chain("big-electric-pole", 2);
        target.merge(&source, a).unwrap();
        target.merge(&source, b).unwrap();
        prop_assert_eq!(source, snapshot);
    }

    /// The same source at the same offset into identical targets lands at
    /// identical positions.
    #[test]
    fn merge_is_offset_linear(source in arb_source(), offset in arb_offset(), prefix in 0..5u32) {
        let mut first = pole_chain("big-electric-pole", prefix);
        let mut second = pole_chain("big-electric-pole", prefix);
        first.merge(&source, offset).unwrap();
        second.merge(&source.clone(), offset).unwrap();
        prop_assert_eq!(&first, &second);

        let appended = &first.entities[prefix as usize..];
        for (merged, original) in appended.iter().zip(&source.entities) {
            prop_assert_eq!(merged.position.x, original.position.x + offset.x);
            prop_assert_eq!(merged.position.y, original.position.y + offset.y);
        }
    }

    /// Appended entities receive consecutive numbers after the target's
    /// last one.
    #[test]
    fn merge_numbers_are_dense(prefix in 0..6u32, source in arb_source()) {
        let mut target = pole_chain("big-electric-pole", prefix);
        let summary = target.merge(&source, Offset::ZERO).unwrap();
        let numbers: Vec<u32> = target.entities.iter().map(|e| e.entity_number.0).collect();
        let expected: Vec<u32> = (1..=prefix + source.len() as u32).collect();
        prop_assert_eq!(numbers, expected);
        prop_assert_eq!(summary.count, source.len());
    }
}
