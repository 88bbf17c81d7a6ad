//! Role-aware overlap for a team.
//!
//! - **Navigator meetings** need every navigator and every djangonaut in the
//!   same window, so the overlap is taken over the whole group and can only
//!   shrink as djangonauts are added.
//! - **Captain 1:1s** pair the captain with one djangonaut at a time.

use serde::Serialize;

use cohort_core::config::ThresholdsConfig;
use cohort_core::{UserId, WeeklySlot};

use crate::calculator::{Overlap, overlap};
use crate::source::AvailabilitySource;

/// Minimum hour blocks a team must reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlapThresholds {
    pub navigator_meeting_hours: u32,
    pub captain_overlap_hours: u32,
}

impl Default for OverlapThresholds {
    fn default() -> Self {
        ThresholdsConfig::default().into()
    }
}

impl From<ThresholdsConfig> for OverlapThresholds {
    fn from(config: ThresholdsConfig) -> Self {
        Self {
            navigator_meeting_hours: config.navigator_meeting_hours,
            captain_overlap_hours: config.captain_overlap_hours,
        }
    }
}

impl From<&ThresholdsConfig> for OverlapThresholds {
    fn from(config: &ThresholdsConfig) -> Self {
        config.clone().into()
    }
}

/// Overlap of all navigators with all djangonauts.
pub fn navigator_meeting_overlap<S>(
    navigators: &[UserId],
    djangonauts: &[UserId],
    source: &S,
) -> Overlap
where
    S: AvailabilitySource + ?Sized,
{
    overlap(navigators.iter().chain(djangonauts).copied(), source)
}

/// Overlap of the captain with a single djangonaut.
pub fn captain_overlap<S>(captain: UserId, djangonaut: UserId, source: &S) -> Overlap
where
    S: AvailabilitySource + ?Sized,
{
    overlap([captain, djangonaut], source)
}

/// One captain/djangonaut pairing in a [`TeamOverlapReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptainMeeting {
    pub djangonaut: UserId,
    pub slots: Vec<WeeklySlot>,
    pub hours: u32,
}

/// Overlap figures for a formed (or forming) team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamOverlapReport {
    pub navigator_meeting_slots: Vec<WeeklySlot>,
    pub navigator_meeting_hours: u32,
    /// Empty without a captain or without djangonauts.
    pub captain_meetings: Vec<CaptainMeeting>,
    /// Smallest captain overlap, when any captain meeting exists.
    pub min_captain_hours: Option<u32>,
    pub is_valid: bool,
}

impl TeamOverlapReport {
    /// Captain hours for one djangonaut.
    pub fn captain_hours_for(&self, djangonaut: UserId) -> Option<u32> {
        self.captain_meetings
            .iter()
            .find(|m| m.djangonaut == djangonaut)
            .map(|m| m.hours)
    }
}

/// Evaluate a team against both overlap minimums.
///
/// A team with neither navigators nor djangonauts is reported invalid. A
/// team without a captain has no captain constraint to violate.
pub fn evaluate_team<S>(
    navigators: &[UserId],
    captain: Option<UserId>,
    djangonauts: &[UserId],
    source: &S,
    thresholds: &OverlapThresholds,
) -> TeamOverlapReport
where
    S: AvailabilitySource + ?Sized,
{
    let mut report = TeamOverlapReport::default();

    if !navigators.is_empty() || !djangonauts.is_empty() {
        let meeting = navigator_meeting_overlap(navigators, djangonauts, source);
        report.is_valid = meeting.hour_blocks >= thresholds.navigator_meeting_hours;
        report.navigator_meeting_hours = meeting.hour_blocks;
        report.navigator_meeting_slots = meeting.slots;
    }

    if let Some(captain) = captain {
        report.captain_meetings = djangonauts
            .iter()
            .map(|&djangonaut| {
                let pair = captain_overlap(captain, djangonaut, source);
                CaptainMeeting {
                    djangonaut,
                    hours: pair.hour_blocks,
                    slots: pair.slots,
                }
            })
            .collect();
        report.min_captain_hours = report.captain_meetings.iter().map(|m| m.hours).min();
        if report
            .min_captain_hours
            .is_some_and(|hours| hours < thresholds.captain_overlap_hours)
        {
            report.is_valid = false;
        }
    }

    report
}
