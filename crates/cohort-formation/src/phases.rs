//! Two-tier invitation policy on top of the bounded search.
//!
//! Phase 1 places the primary pool (`selection_rank <= primary_max_rank`).
//! If seats remain, phase 2 continues from phase 1's best state with the
//! overflow pool (`selection_rank == overflow_rank`).

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use cohort_core::config::PhasesConfig;
use cohort_core::UserId;

use crate::candidate::{AllocationCandidate, sort_candidates};
use crate::context::FormationContext;
use crate::search::bounded_search;
use crate::state::AllocationState;
use crate::team_slot::TeamSlot;

/// Final state of a two-phase run and what each phase contributed.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    pub state: AllocationState,
    pub phase1_allocated: usize,
    pub phase2_allocated: usize,
}

impl AllocationOutcome {
    pub fn total_allocated(&self) -> usize {
        self.state.allocations.len()
    }
}

/// Place `pool` onto `teams` in two phases.
///
/// Candidates outside both tiers are ignored. With no primary candidates or
/// no teams the initial state comes back untouched.
pub fn allocate_teams(
    mut pool: Vec<AllocationCandidate>,
    teams: Vec<TeamSlot>,
    ctx: &FormationContext<'_>,
    phases: &PhasesConfig,
) -> AllocationOutcome {
    sort_candidates(&mut pool);

    let (primary, rest): (Vec<_>, Vec<_>) = pool
        .into_iter()
        .map(Arc::new)
        .partition(|c| c.selection_rank <= phases.primary_max_rank);

    let initial = AllocationState::new(teams, primary.clone());
    if primary.is_empty() || initial.teams.is_empty() {
        info!(
            candidates = primary.len(),
            teams = initial.teams.len(),
            "nothing to allocate"
        );
        return AllocationOutcome {
            state: initial,
            phase1_allocated: 0,
            phase2_allocated: 0,
        };
    }

    let phase1 = bounded_search(&primary, initial, ctx).state;
    let phase1_allocated = phase1.allocations.len();
    info!(
        candidates = primary.len(),
        allocated = phase1_allocated,
        complete_teams = phase1.complete_teams(),
        "phase 1 complete"
    );

    if !phase1.has_open_slots() {
        return AllocationOutcome {
            state: phase1,
            phase1_allocated,
            phase2_allocated: 0,
        };
    }

    let placed: HashSet<UserId> = phase1.allocations.iter().map(|a| a.candidate.user).collect();
    let overflow: Vec<Arc<AllocationCandidate>> = rest
        .into_iter()
        .filter(|c| c.selection_rank == phases.overflow_rank && !placed.contains(&c.user))
        .collect();
    if overflow.is_empty() {
        warn!(
            open_capacity = phase1.open_capacity(),
            "seats left open with no overflow candidates"
        );
        return AllocationOutcome {
            state: phase1,
            phase1_allocated,
            phase2_allocated: 0,
        };
    }

    let mut start = phase1;
    start.unallocated.extend(overflow.iter().cloned());
    let state = bounded_search(&overflow, start, ctx).state;
    let phase2_allocated = state.allocations.len() - phase1_allocated;
    info!(
        candidates = overflow.len(),
        allocated = phase2_allocated,
        complete_teams = state.complete_teams(),
        "phase 2 complete"
    );

    AllocationOutcome {
        state,
        phase1_allocated,
        phase2_allocated,
    }
}
