//! Per-team overlap reports and meeting windows for a session.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use cohort_core::{FormationConfig, ProjectId, Role, SessionId, TeamId, UserId};
use cohort_formation::load_availability;
use cohort_overlap::{
    AvailabilityWindow, OverlapThresholds, TeamOverlapReport, evaluate_team,
    find_best_one_hour_windows_with_roles,
};
use cohort_state::{Membership, StateStore};

use crate::error::{RosterError, RosterResult};

/// A team's members and how well their availability lines up.
#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team: TeamId,
    pub name: String,
    pub project: ProjectId,
    pub navigators: Vec<UserId>,
    pub captain: Option<UserId>,
    pub djangonauts: Vec<UserId>,
    pub overlap: TeamOverlapReport,
}

/// Overlap report for every team of a session, in team id order.
pub fn team_reports(
    store: &StateStore,
    session: SessionId,
    config: &FormationConfig,
) -> RosterResult<Vec<TeamReport>> {
    if store.get_session(session)?.is_none() {
        return Err(RosterError::SessionNotFound(session));
    }

    let book = load_availability(store)?;
    let thresholds = OverlapThresholds::from(&config.thresholds);

    let mut by_team: HashMap<TeamId, Vec<Membership>> = HashMap::new();
    for membership in store.list_memberships_for_session(session)? {
        if let Some(team) = membership.team {
            by_team.entry(team).or_default().push(membership);
        }
    }

    let reports: Vec<TeamReport> = store
        .list_teams_for_session(session)?
        .into_iter()
        .map(|team| {
            let members = by_team.remove(&team.id).unwrap_or_default();
            let users = |role: Role| -> Vec<UserId> {
                members.iter().filter(|m| m.role == role).map(|m| m.user).collect()
            };
            let navigators = users(Role::Navigator);
            let captain = users(Role::Captain).first().copied();
            let djangonauts = users(Role::Djangonaut);
            let overlap = evaluate_team(&navigators, captain, &djangonauts, &book, &thresholds);

            TeamReport {
                team: team.id,
                name: team.name,
                project: team.project,
                navigators,
                captain,
                djangonauts,
                overlap,
            }
        })
        .collect();

    debug!(
        session = %session,
        teams = reports.len(),
        valid = reports.iter().filter(|r| r.overlap.is_valid).count(),
        "team reports built"
    );
    Ok(reports)
}

/// Best one-hour windows across every member of a session, counted by role.
pub fn session_windows(
    store: &StateStore,
    session: SessionId,
    top_n: usize,
) -> RosterResult<Vec<AvailabilityWindow>> {
    if store.get_session(session)?.is_none() {
        return Err(RosterError::SessionNotFound(session));
    }

    let members: Vec<(UserId, Role)> = store
        .list_memberships_for_session(session)?
        .into_iter()
        .map(|m| (m.user, m.role))
        .collect();
    let book = load_availability(store)?;

    Ok(find_best_one_hour_windows_with_roles(&members, &book, top_n))
}
