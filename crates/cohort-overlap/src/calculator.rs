//! Set arithmetic over weekly slots.
//!
//! Only whole, contiguous clock hours count toward a meeting requirement:
//! two adjacent slots make one hour block and a dangling half hour counts
//! for nothing.

use serde::Serialize;

use cohort_core::{UserId, WeeklySlot};

use crate::source::{AvailabilitySource, slots_for};

/// Slots shared by a group of users and the hour blocks they form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overlap {
    /// Shared slots in chronological order.
    pub slots: Vec<WeeklySlot>,
    pub hour_blocks: u32,
}

impl Overlap {
    fn from_sorted(slots: Vec<WeeklySlot>) -> Self {
        let hour_blocks = count_one_hour_blocks(&slots);
        Self { slots, hour_blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Count complete one-hour blocks in a sorted slot sequence.
///
/// Scans once; a slot immediately followed by its successor consumes both
/// and adds one hour. `[10.0, 10.5, 11.0]` is one hour, not two.
pub fn count_one_hour_blocks(sorted_slots: &[WeeklySlot]) -> u32 {
    let mut blocks = 0;
    let mut i = 0;
    while i + 1 < sorted_slots.len() {
        if sorted_slots[i].is_followed_by(sorted_slots[i + 1]) {
            blocks += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    blocks
}

/// Slots where every user is available at once.
///
/// No users yields an empty overlap. A single user's overlap is their own
/// availability, and any user without availability empties the result.
pub fn overlap<S, I>(users: I, source: &S) -> Overlap
where
    S: AvailabilitySource + ?Sized,
    I: IntoIterator<Item = UserId>,
{
    let mut sets = users.into_iter().map(|user| slots_for(source, user));
    let Some(first) = sets.next() else {
        return Overlap::default();
    };
    let rest: Vec<_> = sets.collect();
    if rest.iter().any(|set| set.is_empty()) {
        return Overlap::default();
    }

    let shared = first
        .iter()
        .filter(|slot| rest.iter().all(|set| set.contains(*slot)))
        .collect();
    Overlap::from_sorted(shared)
}

/// Slots two users share.
pub fn user_overlap<S>(a: UserId, b: UserId, source: &S) -> Vec<WeeklySlot>
where
    S: AvailabilitySource + ?Sized,
{
    overlap([a, b], source).slots
}
