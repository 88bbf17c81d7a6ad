//! Allocation applier: writes a finished allocation back as memberships.

use serde::{Deserialize, Serialize};
use tracing::info;

use cohort_core::{Role, SessionId};
use cohort_formation::AllocationState;
use cohort_state::{Membership, StateStore};

use crate::error::{RosterError, RosterResult};

/// Counts reported to the operator after an allocation is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Memberships actually written. Users who already had a membership in
    /// the session are skipped and not counted, so this can be lower than
    /// the number of allocations in the state, and is `0` when the same
    /// state is applied a second time.
    pub created: usize,
    pub complete_teams: usize,
    pub total_teams: usize,
}

/// Persist every allocation in `state` as a djangonaut membership.
///
/// All rows go in through one write transaction and existing memberships
/// are left alone, so applying the same state twice is harmless.
pub fn apply_allocation(
    state: &AllocationState,
    session: SessionId,
    store: &StateStore,
) -> RosterResult<AllocationSummary> {
    if store.get_session(session)?.is_none() {
        return Err(RosterError::SessionNotFound(session));
    }

    let memberships: Vec<Membership> = state
        .allocations
        .iter()
        .map(|allocation| Membership {
            user: allocation.candidate.user,
            session,
            team: Some(allocation.team),
            role: Role::Djangonaut,
        })
        .collect();

    let created = store.insert_memberships_ignoring_conflicts(&memberships)?;
    let summary = summarize(state, created);

    info!(
        session = %session,
        requested = memberships.len(),
        created = summary.created,
        complete_teams = summary.complete_teams,
        total_teams = summary.total_teams,
        "allocation applied"
    );
    Ok(summary)
}

/// Summary of `state` as if `created` rows had been written.
pub fn summarize(state: &AllocationState, created: usize) -> AllocationSummary {
    AllocationSummary {
        created,
        complete_teams: state.complete_teams(),
        total_teams: state.teams.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cohort_core::{ProjectId, ResponseId, TeamId, UserId};
    use cohort_formation::{AllocationCandidate, TeamInfo, TeamSlot};
    use cohort_state::SessionRecord;

    fn test_store() -> StateStore {
        let store = StateStore::open_in_memory().unwrap();
        store
            .put_session(&SessionRecord {
                id: SessionId(1),
                title: "test".into(),
                application_survey: None,
            })
            .unwrap();
        store
    }

    fn state_with(users: &[u64]) -> AllocationState {
        let info = TeamInfo {
            id: TeamId(1),
            name: "team-1".into(),
            project: ProjectId(1),
        };
        let mut state = AllocationState::new(vec![TeamSlot::new(info, vec![UserId(1)], None, 3)], Vec::new());
        for &user in users {
            let candidate = Arc::new(AllocationCandidate::new(UserId(user), 0, ResponseId(user)));
            state = state.with_candidate(TeamId(1), &candidate).unwrap();
        }
        state
    }

    #[test]
    fn creates_djangonaut_memberships() {
        let store = test_store();
        let summary = apply_allocation(&state_with(&[10, 11]), SessionId(1), &store).unwrap();

        assert_eq!(
            summary,
            AllocationSummary {
                created: 2,
                complete_teams: 0,
                total_teams: 1,
            }
        );
        let m = store.get_membership(SessionId(1), UserId(10)).unwrap().unwrap();
        assert_eq!(m.role, Role::Djangonaut);
        assert_eq!(m.team, Some(TeamId(1)));
    }

    #[test]
    fn reapplying_creates_nothing() {
        let store = test_store();
        let state = state_with(&[10, 11, 12]);

        let first = apply_allocation(&state, SessionId(1), &store).unwrap();
        let second = apply_allocation(&state, SessionId(1), &store).unwrap();

        assert_eq!(first.created, 3);
        assert_eq!(second.created, 0);
        assert_eq!(second.complete_teams, 1);
        assert_eq!(store.list_memberships_for_team(SessionId(1), TeamId(1)).unwrap().len(), 3);
    }

    #[test]
    fn unknown_session_is_an_error() {
        let store = test_store();
        let err = apply_allocation(&state_with(&[10]), SessionId(9), &store).unwrap_err();
        assert!(matches!(err, RosterError::SessionNotFound(SessionId(9))));
    }

    #[test]
    fn empty_allocation_writes_nothing() {
        let store = test_store();
        let summary = apply_allocation(&AllocationState::default(), SessionId(1), &store).unwrap();
        assert_eq!(summary, AllocationSummary::default());
    }
}
