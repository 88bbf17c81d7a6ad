//! cohort-roster: the write side of team formation.
//!
//! [`apply_allocation`] turns a finished allocation into djangonaut
//! memberships. [`team_reports`] and [`session_windows`] read the resulting
//! roster back for operators.

pub mod applier;
pub mod error;
pub mod report;

pub use applier::{AllocationSummary, apply_allocation, summarize};
pub use error::{RosterError, RosterResult};
pub use report::{TeamReport, session_windows, team_reports};
