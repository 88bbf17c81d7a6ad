//! Search nodes and their quality score.

use std::sync::Arc;

use serde::Serialize;

use cohort_core::{TeamId, UserId};

use crate::candidate::AllocationCandidate;
use crate::team_slot::TeamSlot;

/// A candidate committed to a team.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub candidate: Arc<AllocationCandidate>,
    pub team: TeamId,
}

/// Quality of a finished allocation, compared field by field.
///
/// More allocations always wins; then more complete teams; then the
/// smaller sum of selection ranks, stored negated so that larger is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AllocationScore {
    pub allocated: usize,
    pub complete_teams: usize,
    pub negated_rank_sum: i64,
}

/// One node of the search: team capacity plus who went where.
#[derive(Debug, Clone, Default)]
pub struct AllocationState {
    pub teams: Vec<TeamSlot>,
    pub allocations: Vec<Allocation>,
    pub unallocated: Vec<Arc<AllocationCandidate>>,
}

impl AllocationState {
    pub fn new(teams: Vec<TeamSlot>, unallocated: Vec<Arc<AllocationCandidate>>) -> Self {
        Self {
            teams,
            allocations: Vec::new(),
            unallocated,
        }
    }

    /// A new state with `candidate` seated on `team`.
    ///
    /// `self` is left untouched so sibling branches start from the same
    /// node. Returns `None` if the team is unknown or already full.
    pub fn with_candidate(&self, team: TeamId, candidate: &Arc<AllocationCandidate>) -> Option<Self> {
        let mut next = self.clone();
        let slot = next.teams.iter_mut().find(|slot| slot.id() == team)?;
        if !slot.add_djangonaut(candidate.user) {
            return None;
        }
        if let Some(pos) = next.unallocated.iter().position(|c| c.user == candidate.user) {
            next.unallocated.remove(pos);
        }
        next.allocations.push(Allocation {
            candidate: Arc::clone(candidate),
            team,
        });
        Some(next)
    }

    pub fn score(&self) -> AllocationScore {
        let rank_sum: i64 = self
            .allocations
            .iter()
            .map(|a| i64::from(a.candidate.selection_rank))
            .sum();
        AllocationScore {
            allocated: self.allocations.len(),
            complete_teams: self.complete_teams(),
            negated_rank_sum: -rank_sum,
        }
    }

    pub fn complete_teams(&self) -> usize {
        self.teams.iter().filter(|t| t.is_full()).count()
    }

    pub fn has_open_slots(&self) -> bool {
        self.teams.iter().any(|t| t.available_slots() > 0)
    }

    /// Seats still open across all teams.
    pub fn open_capacity(&self) -> usize {
        self.teams.iter().map(TeamSlot::available_slots).sum()
    }

    pub fn team(&self, id: TeamId) -> Option<&TeamSlot> {
        self.teams.iter().find(|t| t.id() == id)
    }

    pub fn is_allocated(&self, user: UserId) -> bool {
        self.allocations.iter().any(|a| a.candidate.user == user)
    }

    /// Allocations for one team, in the order they were made.
    pub fn allocations_for(&self, team: TeamId) -> impl Iterator<Item = &Allocation> {
        self.allocations.iter().filter(move |a| a.team == team)
    }
}
