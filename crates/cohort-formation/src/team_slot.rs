//! A team's open djangonaut capacity during a search.

use std::iter;
use std::sync::Arc;

use cohort_core::{ProjectId, TeamId, UserId};
use cohort_overlap::{TeamOverlapReport, evaluate_team, overlap};

use crate::candidate::{AllocationCandidate, TeamInfo};
use crate::context::FormationContext;

/// One team as seen by the search.
///
/// `Clone` copies only the djangonaut list; team info and navigators are
/// shared between every branch.
#[derive(Debug, Clone)]
pub struct TeamSlot {
    pub team: Arc<TeamInfo>,
    pub navigators: Arc<[UserId]>,
    pub captain: Option<UserId>,
    pub max_djangonauts: usize,
    pub current_djangonauts: Vec<UserId>,
}

impl TeamSlot {
    pub fn new(
        team: TeamInfo,
        navigators: Vec<UserId>,
        captain: Option<UserId>,
        max_djangonauts: usize,
    ) -> Self {
        Self {
            team: Arc::new(team),
            navigators: navigators.into(),
            captain,
            max_djangonauts,
            current_djangonauts: Vec::new(),
        }
    }

    pub fn id(&self) -> TeamId {
        self.team.id
    }

    pub fn project(&self) -> ProjectId {
        self.team.project
    }

    pub fn available_slots(&self) -> usize {
        self.max_djangonauts
            .saturating_sub(self.current_djangonauts.len())
    }

    pub fn is_full(&self) -> bool {
        self.current_djangonauts.len() >= self.max_djangonauts
    }

    /// Seat a djangonaut. Returns `false`, leaving the team unchanged, when
    /// the team is already full.
    pub fn add_djangonaut(&mut self, user: UserId) -> bool {
        if self.is_full() {
            return false;
        }
        self.current_djangonauts.push(user);
        true
    }

    /// Whether `candidate` could join without breaking any team constraint.
    ///
    /// Checks run cheapest first and stop at the first failure: capacity,
    /// project preference, whole-team navigator overlap, then the captain
    /// 1:1 overlap when the team has a captain.
    pub fn can_add(&self, candidate: &AllocationCandidate, ctx: &FormationContext<'_>) -> bool {
        if self.is_full() {
            return false;
        }
        if !candidate.accepts_project(self.project()) {
            return false;
        }

        let group = self
            .navigators
            .iter()
            .chain(&self.current_djangonauts)
            .copied()
            .chain(iter::once(candidate.user));
        if overlap(group, ctx.source).hour_blocks < ctx.thresholds.navigator_meeting_hours {
            return false;
        }

        match self.captain {
            Some(captain) => {
                overlap([captain, candidate.user], ctx.source).hour_blocks
                    >= ctx.thresholds.captain_overlap_hours
            }
            None => true,
        }
    }

    /// Overlap figures for the team as currently seated.
    pub fn overlap_report(&self, ctx: &FormationContext<'_>) -> TeamOverlapReport {
        evaluate_team(
            &self.navigators,
            self.captain,
            &self.current_djangonauts,
            ctx.source,
            &ctx.thresholds,
        )
    }
}
