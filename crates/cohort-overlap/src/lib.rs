//! Availability overlap for team formation.
//!
//! Everything here is pure computation over an [`AvailabilitySource`]
//! snapshot; loading availability from storage is the caller's job.

pub mod calculator;
pub mod format;
pub mod source;
pub mod team;
pub mod windows;

pub use calculator::{Overlap, count_one_hour_blocks, overlap, user_overlap};
pub use format::{availability_by_day, format_slot, format_slot_ranges};
pub use source::{AvailabilityBook, AvailabilitySource, slots_for};
pub use team::{CaptainMeeting, OverlapThresholds, TeamOverlapReport, evaluate_team};
pub use windows::{
    AvailabilityWindow, find_best_one_hour_windows, find_best_one_hour_windows_with_roles,
};
