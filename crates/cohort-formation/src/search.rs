//! Depth-first branch-and-bound over candidate placements.
//!
//! Candidates are taken in order. Each one branches into every team that
//! can take it; a candidate no team can take is skipped once. At the end of
//! the list the state is scored and kept if strictly better than the best
//! so far, so among equal scores the first one found wins.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::candidate::AllocationCandidate;
use crate::context::FormationContext;
use crate::state::{AllocationScore, AllocationState};

/// Counters from one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// States visited, terminals included.
    pub nodes: u64,
    pub terminals: u64,
    /// Subtrees cut because they could not reach the best allocation count.
    pub pruned: u64,
}

/// Result of [`bounded_search`].
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub state: AllocationState,
    pub stats: SearchStats,
}

struct BoundedSearch<'s> {
    candidates: &'s [Arc<AllocationCandidate>],
    ctx: &'s FormationContext<'s>,
    best: AllocationState,
    best_score: AllocationScore,
    stats: SearchStats,
}

impl BoundedSearch<'_> {
    fn explore(&mut self, state: &AllocationState, index: usize) {
        self.stats.nodes += 1;

        let Some(candidate) = self.candidates.get(index) else {
            self.stats.terminals += 1;
            let score = state.score();
            if score > self.best_score {
                self.best_score = score;
                self.best = state.clone();
            }
            return;
        };

        // Each remaining candidate adds at most one allocation, and no more
        // than the open seats can be filled. A subtree that cannot reach the
        // best count cannot beat it.
        let remaining = self.candidates.len() - index;
        let reachable = state.allocations.len() + remaining.min(state.open_capacity());
        if reachable < self.best_score.allocated {
            self.stats.pruned += 1;
            return;
        }

        let mut placed = false;
        for team in &state.teams {
            if !team.can_add(candidate, self.ctx) {
                continue;
            }
            if let Some(next) = state.with_candidate(team.id(), candidate) {
                placed = true;
                self.explore(&next, index + 1);
            }
        }

        if !placed {
            self.explore(state, index + 1);
        }
    }
}

/// Best allocation of `candidates` reachable from `initial`.
///
/// Returns `initial` itself when nothing beats it, e.g. with no candidates
/// or no open seats.
pub fn bounded_search(
    candidates: &[Arc<AllocationCandidate>],
    initial: AllocationState,
    ctx: &FormationContext<'_>,
) -> SearchResult {
    let mut search = BoundedSearch {
        candidates,
        ctx,
        best_score: initial.score(),
        best: initial.clone(),
        stats: SearchStats::default(),
    };
    search.explore(&initial, 0);

    debug!(
        candidates = candidates.len(),
        nodes = search.stats.nodes,
        terminals = search.stats.terminals,
        pruned = search.stats.pruned,
        allocated = search.best_score.allocated,
        complete_teams = search.best_score.complete_teams,
        "bounded search finished"
    );

    SearchResult {
        state: search.best,
        stats: search.stats,
    }
}
