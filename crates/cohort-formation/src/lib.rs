//! cohort-formation: places djangonauts onto teams.
//!
//! Candidates come from the session's application survey, teams from the
//! session's memberships. A depth-first bounded search over
//! [`AllocationState`]s picks the placement that seats the most people;
//! ties go to more complete teams and then to better selection ranks.
//! Project preferences and the overlap minimums in [`FormationContext`]
//! decide which teams a candidate may join.
//!
//! The search is pure; [`allocate_session`] is the store-backed entry point.

pub mod candidate;
pub mod context;
pub mod phases;
pub mod search;
pub mod source;
pub mod state;
pub mod team_slot;

pub use candidate::{AllocationCandidate, TeamInfo, sort_candidates};
pub use context::FormationContext;
pub use phases::{AllocationOutcome, allocate_teams};
pub use search::{SearchResult, SearchStats, bounded_search};
pub use source::{allocate_session, get_allocation_candidates, get_team_slots, load_availability};
pub use state::{Allocation, AllocationScore, AllocationState};
pub use team_slot::TeamSlot;
