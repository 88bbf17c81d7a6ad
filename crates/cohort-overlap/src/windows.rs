//! Best one-hour meeting windows for a group.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use cohort_core::slot::SLOTS_PER_WEEK;
use cohort_core::{Role, UserId, WeeklySlot};

use crate::format::{end_clock, format_slot};
use crate::source::{AvailabilitySource, slots_for};

/// A one-hour window: two consecutive slots and who can make both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityWindow {
    pub start: WeeklySlot,
    pub end: WeeklySlot,
    pub available: Vec<UserId>,
    pub unavailable: Vec<UserId>,
    /// Available users per role. Empty unless roles were supplied.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub role_counts: BTreeMap<Role, usize>,
}

impl AvailabilityWindow {
    pub fn total_available(&self) -> usize {
        self.available.len()
    }

    /// `"Mon 2:00 PM - 3:00 PM"`.
    pub fn formatted_time(&self) -> String {
        format!("{} - {}", format_slot(self.start), end_clock(self.end))
    }

    /// `"navigator: 1, djangonaut: 3"`, roles with no one available left out.
    pub fn role_summary(&self) -> String {
        self.role_counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(role, count)| format!("{role}: {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Top `top_n` one-hour windows by number of available users.
///
/// Every window of the week is considered (starts Sunday 00:00 through
/// Saturday 23:00). Windows where at most one user is free are dropped. Ties
/// keep chronological order.
pub fn find_best_one_hour_windows<S>(
    users: &[UserId],
    source: &S,
    top_n: usize,
) -> Vec<AvailabilityWindow>
where
    S: AvailabilitySource + ?Sized,
{
    let sets: Vec<_> = users.iter().map(|&user| (user, slots_for(source, user))).collect();

    let mut windows: Vec<AvailabilityWindow> = (0..SLOTS_PER_WEEK - 1)
        .filter_map(|tick| {
            let start = WeeklySlot::from_tick(tick)?;
            let end = start.next()?;
            let mut available = Vec::new();
            let mut unavailable = Vec::new();
            for &(user, slots) in &sets {
                if slots.contains(start) && slots.contains(end) {
                    available.push(user);
                } else {
                    unavailable.push(user);
                }
            }
            if available.len() <= 1 {
                return None;
            }
            Some(AvailabilityWindow {
                start,
                end,
                available,
                unavailable,
                role_counts: BTreeMap::new(),
            })
        })
        .collect();

    windows.sort_by(|a, b| b.total_available().cmp(&a.total_available()));
    windows.truncate(top_n);
    windows
}

/// [`find_best_one_hour_windows`] with available users counted per role.
///
/// Every role appears in `role_counts`, zero included.
pub fn find_best_one_hour_windows_with_roles<S>(
    user_roles: &[(UserId, Role)],
    source: &S,
    top_n: usize,
) -> Vec<AvailabilityWindow>
where
    S: AvailabilitySource + ?Sized,
{
    let role_of: HashMap<UserId, Role> = user_roles.iter().copied().collect();
    let users: Vec<UserId> = user_roles.iter().map(|(user, _)| *user).collect();

    let mut windows = find_best_one_hour_windows(&users, source, top_n);
    for window in &mut windows {
        let mut counts: BTreeMap<Role, usize> = Role::ALL.iter().map(|&role| (role, 0)).collect();
        for user in &window.available {
            if let Some(role) = role_of.get(user) {
                *counts.entry(*role).or_default() += 1;
            }
        }
        window.role_counts = counts;
    }
    windows
}
