//! Persisted records for the cohort state store.
//!
//! Every record is JSON-serialized into a redb `&[u8]` value column.
//! Composite keys are built from zero-padded ids so that table iteration
//! follows id order.

use serde::{Deserialize, Serialize};

use cohort_core::{
    Availability, ProjectId, ResponseId, Role, SessionId, SurveyId, TeamId, UserId,
};

/// Fixed-width rendering of an id for use in a table key.
pub(crate) fn key_part(id: u64) -> String {
    format!("{id:020}")
}

// ── Session ───────────────────────────────────────────────────────

/// One program session (a cohort).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub title: String,
    /// Survey applicants answered. No survey means nobody can be allocated.
    pub application_survey: Option<SurveyId>,
}

impl SessionRecord {
    pub fn table_key(&self) -> String {
        key_part(self.id.0)
    }
}

// ── Team ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamRecord {
    pub id: TeamId,
    pub session: SessionId,
    pub name: String,
    pub project: ProjectId,
}

impl TeamRecord {
    /// Build the composite key `{session}:{team}`.
    pub fn table_key(&self) -> String {
        format!("{}:{}", key_part(self.session.0), key_part(self.id.0))
    }
}

// ── Membership ────────────────────────────────────────────────────

/// A user's role in a session, optionally tied to a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub user: UserId,
    pub session: SessionId,
    pub team: Option<TeamId>,
    pub role: Role,
}

impl Membership {
    /// Build the composite key `{session}:{user}`. One membership per user
    /// per session.
    pub fn table_key(&self) -> String {
        membership_key(self.session, self.user)
    }
}

pub(crate) fn membership_key(session: SessionId, user: UserId) -> String {
    format!("{}:{}", key_part(session.0), key_part(user.0))
}

// ── Availability ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAvailability {
    pub user: UserId,
    pub slots: Availability,
}

impl UserAvailability {
    pub fn table_key(&self) -> String {
        key_part(self.user.0)
    }
}

// ── Survey responses ──────────────────────────────────────────────

/// An applicant's answer to a session's application survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyResponse {
    pub id: ResponseId,
    pub survey: SurveyId,
    pub user: UserId,
    /// Reviewer-assigned tier, `0` is best. Unranked responses are never
    /// considered for allocation.
    pub selection_rank: Option<u32>,
    pub score: Option<i64>,
}

impl SurveyResponse {
    /// Build the composite key `{survey}:{user}`.
    pub fn table_key(&self) -> String {
        format!("{}:{}", key_part(self.survey.0), key_part(self.user.0))
    }
}

// ── Project preferences ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectPreference {
    pub session: SessionId,
    pub user: UserId,
    pub project: ProjectId,
}

impl ProjectPreference {
    /// Build the composite key `{session}:{user}:{project}`.
    pub fn table_key(&self) -> String {
        format!(
            "{}:{}:{}",
            key_part(self.session.0),
            key_part(self.user.0),
            key_part(self.project.0)
        )
    }
}

// ── Bulk import ───────────────────────────────────────────────────

/// A full dataset, as read from a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Dataset {
    pub sessions: Vec<SessionRecord>,
    pub teams: Vec<TeamRecord>,
    pub memberships: Vec<Membership>,
    pub availability: Vec<UserAvailability>,
    pub responses: Vec<SurveyResponse>,
    pub preferences: Vec<ProjectPreference>,
}

impl Dataset {
    pub fn record_count(&self) -> usize {
        self.sessions.len()
            + self.teams.len()
            + self.memberships.len()
            + self.availability.len()
            + self.responses.len()
            + self.preferences.len()
    }
}
