//! Loading formation inputs from the state store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use cohort_core::{FormationConfig, ProjectId, Role, SessionId, TeamId, UserId};
use cohort_overlap::AvailabilityBook;
use cohort_state::{Membership, StateResult, StateStore};

use crate::candidate::{AllocationCandidate, TeamInfo, sort_candidates};
use crate::context::FormationContext;
use crate::phases::{AllocationOutcome, allocate_teams};
use crate::state::AllocationState;
use crate::team_slot::TeamSlot;

/// Applicants eligible for a session, in search order.
///
/// Empty when the session has no application survey. Users who already
/// hold any membership in the session are left out, since a user can hold
/// only one per session. So are responses without a selection rank or
/// ranked above `max_rank`.
pub fn get_allocation_candidates(
    store: &StateStore,
    session: SessionId,
    max_rank: u32,
) -> StateResult<Vec<AllocationCandidate>> {
    let Some(survey) = store
        .get_session(session)?
        .and_then(|record| record.application_survey)
    else {
        debug!(session = %session, "session has no application survey");
        return Ok(Vec::new());
    };

    let members: HashSet<UserId> = store
        .list_memberships_for_session(session)?
        .into_iter()
        .map(|m| m.user)
        .collect();

    let mut preferences: HashMap<UserId, Vec<ProjectId>> = HashMap::new();
    for pref in store.list_preferences_for_session(session)? {
        preferences.entry(pref.user).or_default().push(pref.project);
    }

    let mut candidates: Vec<AllocationCandidate> = store
        .list_responses_for_survey(survey)?
        .into_iter()
        .filter(|r| !members.contains(&r.user))
        .filter_map(|r| {
            let rank = r.selection_rank.filter(|&rank| rank <= max_rank)?;
            Some(AllocationCandidate {
                user: r.user,
                selection_rank: rank,
                score: r.score,
                response: r.id,
                project_preferences: preferences.get(&r.user).cloned().unwrap_or_default(),
            })
        })
        .collect();
    sort_candidates(&mut candidates);

    debug!(
        session = %session,
        survey = %survey,
        candidates = candidates.len(),
        "loaded allocation candidates"
    );
    Ok(candidates)
}

/// Teams of a session that still have room, in team id order.
pub fn get_team_slots(
    store: &StateStore,
    session: SessionId,
    max_djangonauts: usize,
) -> StateResult<Vec<TeamSlot>> {
    let mut by_team: HashMap<TeamId, Vec<Membership>> = HashMap::new();
    for membership in store.list_memberships_for_session(session)? {
        if let Some(team) = membership.team {
            by_team.entry(team).or_default().push(membership);
        }
    }

    let mut slots = Vec::new();
    for record in store.list_teams_for_session(session)? {
        let members = by_team.remove(&record.id).unwrap_or_default();
        let with_role = |role: Role| {
            members
                .iter()
                .filter(move |m| m.role == role)
                .map(|m| m.user)
        };

        let djangonauts: Vec<UserId> = with_role(Role::Djangonaut).collect();
        if djangonauts.len() >= max_djangonauts {
            debug!(team = %record.id, "team already full");
            continue;
        }

        let info = TeamInfo {
            id: record.id,
            name: record.name,
            project: record.project,
        };
        let mut slot = TeamSlot::new(
            info,
            with_role(Role::Navigator).collect(),
            with_role(Role::Captain).next(),
            max_djangonauts,
        );
        for user in djangonauts {
            slot.add_djangonaut(user);
        }
        slots.push(slot);
    }

    Ok(slots)
}

/// Every stored availability, keyed by user.
pub fn load_availability(store: &StateStore) -> StateResult<AvailabilityBook> {
    Ok(store
        .list_availability()?
        .into_iter()
        .map(|row| (row.user, row.slots))
        .collect())
}

/// Load a session's inputs and run the two-phase allocation.
///
/// Nothing is written; pass the outcome's state to the roster applier to
/// persist it.
pub fn allocate_session(
    store: &StateStore,
    session: SessionId,
    config: &FormationConfig,
) -> StateResult<AllocationOutcome> {
    let pool = get_allocation_candidates(store, session, config.phases.overflow_rank)?;
    let teams = get_team_slots(store, session, config.teams.max_djangonauts)?;

    if pool.is_empty() || teams.is_empty() {
        info!(
            session = %session,
            candidates = pool.len(),
            teams = teams.len(),
            "nothing to allocate"
        );
        let unallocated = pool.into_iter().map(Arc::new).collect();
        return Ok(AllocationOutcome {
            state: AllocationState::new(teams, unallocated),
            phase1_allocated: 0,
            phase2_allocated: 0,
        });
    }

    let book = load_availability(store)?;
    let ctx = FormationContext::from_config(&book, config);
    let outcome = allocate_teams(pool, teams, &ctx, &config.phases);

    info!(
        session = %session,
        allocated = outcome.total_allocated(),
        complete_teams = outcome.state.complete_teams(),
        total_teams = outcome.state.teams.len(),
        "allocation computed"
    );
    Ok(outcome)
}
