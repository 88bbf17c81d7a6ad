//! Where availability comes from.
//!
//! The calculator never talks to storage directly. Callers hand it an
//! [`AvailabilitySource`] snapshot; a user missing from the source simply has
//! no availability.

use std::collections::HashMap;

use cohort_core::{Availability, UserId};

/// Read-only lookup of weekly availability by user.
pub trait AvailabilitySource {
    /// The user's stored availability, `None` if they never set one.
    fn availability(&self, user: UserId) -> Option<&Availability>;
}

impl AvailabilitySource for HashMap<UserId, Availability> {
    fn availability(&self, user: UserId) -> Option<&Availability> {
        self.get(&user)
    }
}

impl<S: AvailabilitySource + ?Sized> AvailabilitySource for &S {
    fn availability(&self, user: UserId) -> Option<&Availability> {
        (**self).availability(user)
    }
}

/// The user's availability, or the empty set when none exists.
///
/// Absence is not an error: it only means nothing can be scheduled with
/// that user.
pub fn slots_for<S: AvailabilitySource + ?Sized>(source: &S, user: UserId) -> &Availability {
    source.availability(user).unwrap_or(Availability::empty())
}

/// In-memory availability snapshot for one allocation run.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityBook {
    by_user: HashMap<UserId, Availability>,
}

impl AvailabilityBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a user's availability, replacing any previous value.
    pub fn insert(&mut self, user: UserId, slots: Availability) {
        self.by_user.insert(user, slots);
    }

    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }
}

impl AvailabilitySource for AvailabilityBook {
    fn availability(&self, user: UserId) -> Option<&Availability> {
        self.by_user.get(&user)
    }
}

impl FromIterator<(UserId, Availability)> for AvailabilityBook {
    fn from_iter<T: IntoIterator<Item = (UserId, Availability)>>(iter: T) -> Self {
        Self {
            by_user: iter.into_iter().collect(),
        }
    }
}
