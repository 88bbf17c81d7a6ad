//! Property tests for overlap arithmetic.

use std::collections::BTreeSet;

use cohort_core::{Availability, UserId, WeeklySlot};
use cohort_overlap::{AvailabilityBook, count_one_hour_blocks, overlap};
use proptest::prelude::*;

fn availability() -> impl Strategy<Value = Availability> {
    prop::collection::btree_set(0u16..336, 0..80).prop_map(|ticks: BTreeSet<u16>| {
        ticks.into_iter().filter_map(WeeklySlot::from_tick).collect()
    })
}

fn book(sets: &[Availability]) -> AvailabilityBook {
    sets.iter()
        .enumerate()
        .map(|(i, slots)| (UserId(i as u64 + 1), slots.clone()))
        .collect()
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in availability(), b in availability()) {
        let source = book(&[a, b]);
        prop_assert_eq!(
            overlap([UserId(1), UserId(2)], &source),
            overlap([UserId(2), UserId(1)], &source)
        );
    }

    #[test]
    fn adding_a_user_never_grows_overlap(
        a in availability(),
        b in availability(),
        c in availability(),
    ) {
        let source = book(&[a, b, c]);
        let pair = overlap([UserId(1), UserId(2)], &source);
        let triple = overlap([UserId(1), UserId(2), UserId(3)], &source);

        prop_assert!(triple.slots.iter().all(|slot| pair.slots.contains(slot)));
        prop_assert!(triple.hour_blocks <= pair.hour_blocks);
    }

    #[test]
    fn overlap_with_empty_user_is_empty(a in availability()) {
        let source = book(&[a, Availability::new()]);
        prop_assert!(overlap([UserId(1), UserId(2)], &source).is_empty());
    }

    #[test]
    fn hour_blocks_bounded_by_half_the_slots(a in availability()) {
        let slots: Vec<WeeklySlot> = a.iter().collect();
        prop_assert!(count_one_hour_blocks(&slots) as usize <= slots.len() / 2);
    }
}
