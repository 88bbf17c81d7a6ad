//! Human-readable rendering of weekly slots, always in UTC.

use cohort_core::slot::{DAY_NAMES, SLOTS_PER_DAY};
use cohort_core::WeeklySlot;

/// `"2:30 PM"` for a number of minutes since midnight.
pub fn format_clock(minute_of_day: u32) -> String {
    let hour = minute_of_day / 60 % 24;
    let minute = minute_of_day % 60;
    let period = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02} {period}")
}

/// `"Mon 2:30 PM"`.
pub fn format_slot(slot: WeeklySlot) -> String {
    format!("{} {}", slot.day_name(), format_clock(slot.minute_of_day()))
}

/// Clock time at which `last` ends. Saturday 23:30 ends at 12:00 AM.
pub(crate) fn end_clock(last: WeeklySlot) -> String {
    let tick = (last.tick() + 1) % SLOTS_PER_DAY;
    format_clock(u32::from(tick) * 30)
}

/// Collapse slots into `(first, last)` runs of consecutive half hours.
///
/// Input order does not matter and duplicates are ignored.
pub fn group_consecutive<I>(slots: I) -> Vec<(WeeklySlot, WeeklySlot)>
where
    I: IntoIterator<Item = WeeklySlot>,
{
    let mut sorted: Vec<WeeklySlot> = slots.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs: Vec<(WeeklySlot, WeeklySlot)> = Vec::new();
    for slot in sorted {
        match runs.last_mut() {
            Some((_, last)) if last.is_followed_by(slot) => *last = slot,
            _ => runs.push((slot, slot)),
        }
    }
    runs
}

/// Consecutive runs as `"Mon 2:00 PM - 3:30 PM"`.
///
/// The end time is where the last half hour finishes. A run crossing
/// midnight keeps the starting day's name only.
pub fn format_slot_ranges<I>(slots: I) -> Vec<String>
where
    I: IntoIterator<Item = WeeklySlot>,
{
    group_consecutive(slots)
        .into_iter()
        .map(|(first, last)| format!("{} - {}", format_slot(first), end_clock(last)))
        .collect()
}

/// Time ranges grouped by day, Sunday first, days without slots omitted.
///
/// Runs are split at midnight so each day lists only its own hours.
pub fn availability_by_day<I>(slots: I) -> Vec<(&'static str, Vec<String>)>
where
    I: IntoIterator<Item = WeeklySlot>,
{
    let mut per_day: [Vec<WeeklySlot>; 7] = Default::default();
    for slot in slots {
        per_day[slot.day_index()].push(slot);
    }

    DAY_NAMES
        .iter()
        .zip(per_day)
        .filter(|(_, day_slots)| !day_slots.is_empty())
        .map(|(&day, day_slots)| {
            let ranges = group_consecutive(day_slots)
                .into_iter()
                .map(|(first, last)| {
                    format!("{} - {}", format_clock(first.minute_of_day()), end_clock(last))
                })
                .collect();
            (day, ranges)
        })
        .collect()
}
