//! Weekly availability slots.
//!
//! A slot is one half hour of the UTC week, counted from Sunday 00:00.
//! At the boundary a slot is a float number of hours (`0.0..=167.5` in steps
//! of `0.5`); inside the crate it is an integer tick so that adjacency is an
//! exact comparison.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Half-hour slots in one week.
pub const SLOTS_PER_WEEK: u16 = 336;

/// Half-hour slots in one day.
pub const SLOTS_PER_DAY: u16 = 48;

/// Largest valid slot in hours (Saturday 23:30).
pub const MAX_SLOT_HOURS: f64 = 167.5;

/// Accepted drift when reading float hours, in hours.
const HOURS_TOLERANCE: f64 = 0.01;

/// Short day names, indexed from Sunday.
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SlotError {
    #[error("slot {0} is outside the week (0.0..=167.5)")]
    OutOfRange(f64),

    #[error("slot {0} is not a multiple of half an hour")]
    NotHalfHour(f64),
}

/// One half hour of the UTC week.
///
/// Ordered chronologically. Serialized as float hours so stored data keeps
/// the `[24.0, 24.5, ...]` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct WeeklySlot(u16);

impl WeeklySlot {
    pub const FIRST: Self = Self(0);
    pub const LAST: Self = Self(SLOTS_PER_WEEK - 1);

    /// Build a slot from its half-hour tick (`0..=335`).
    pub const fn from_tick(tick: u16) -> Option<Self> {
        if tick < SLOTS_PER_WEEK {
            Some(Self(tick))
        } else {
            None
        }
    }

    /// Parse float hours since Sunday 00:00 UTC.
    pub fn from_hours(hours: f64) -> Result<Self, SlotError> {
        if !hours.is_finite() || hours < -HOURS_TOLERANCE || hours > MAX_SLOT_HOURS + HOURS_TOLERANCE {
            return Err(SlotError::OutOfRange(hours));
        }
        let doubled = hours * 2.0;
        let rounded = doubled.round();
        if (doubled - rounded).abs() > HOURS_TOLERANCE * 2.0 {
            return Err(SlotError::NotHalfHour(hours));
        }
        Ok(Self(rounded as u16))
    }

    pub const fn tick(self) -> u16 {
        self.0
    }

    pub fn hours(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Day of the week, `0` = Sunday.
    pub const fn day_index(self) -> usize {
        (self.0 / SLOTS_PER_DAY) as usize
    }

    pub const fn day_name(self) -> &'static str {
        DAY_NAMES[self.day_index()]
    }

    /// Minutes since midnight of the slot's day.
    pub const fn minute_of_day(self) -> u32 {
        (self.0 % SLOTS_PER_DAY) as u32 * 30
    }

    /// The following slot, or `None` after Saturday 23:30.
    pub const fn next(self) -> Option<Self> {
        Self::from_tick(self.0 + 1)
    }

    /// Whether `other` starts exactly where `self` ends.
    pub const fn is_followed_by(self, other: Self) -> bool {
        other.0 == self.0 + 1
    }
}

impl TryFrom<f64> for WeeklySlot {
    type Error = SlotError;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        Self::from_hours(hours)
    }
}

impl From<WeeklySlot> for f64 {
    fn from(slot: WeeklySlot) -> Self {
        slot.hours()
    }
}

impl fmt::Display for WeeklySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.hours())
    }
}

static EMPTY_AVAILABILITY: Availability = Availability::new();

/// A user's weekly availability: an ordered set of slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeSet<WeeklySlot>);

impl Availability {
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Shared empty availability, used for users who never set one.
    pub fn empty() -> &'static Availability {
        &EMPTY_AVAILABILITY
    }

    /// Parse a list of float hours. Duplicates collapse.
    pub fn from_hours<I>(hours: I) -> Result<Self, SlotError>
    where
        I: IntoIterator<Item = f64>,
    {
        hours
            .into_iter()
            .map(WeeklySlot::from_hours)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Contiguous availability covering `[start, end)` in float hours.
    pub fn from_range(start: f64, end: f64) -> Result<Self, SlotError> {
        let first = WeeklySlot::from_hours(start)?;
        if end <= start {
            return Ok(Self::new());
        }
        let last = WeeklySlot::from_hours(end - 0.5)?;
        Ok((first.tick()..=last.tick()).filter_map(WeeklySlot::from_tick).collect())
    }

    pub fn insert(&mut self, slot: WeeklySlot) -> bool {
        self.0.insert(slot)
    }

    pub fn contains(&self, slot: WeeklySlot) -> bool {
        self.0.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = WeeklySlot> + '_ {
        self.0.iter().copied()
    }

    pub fn intersection(&self, other: &Availability) -> Availability {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    pub fn to_hours(&self) -> Vec<f64> {
        self.iter().map(WeeklySlot::hours).collect()
    }
}

impl FromIterator<WeeklySlot> for Availability {
    fn from_iter<T: IntoIterator<Item = WeeklySlot>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Availability {
    type Item = &'a WeeklySlot;
    type IntoIter = std::collections::btree_set::Iter<'a, WeeklySlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
