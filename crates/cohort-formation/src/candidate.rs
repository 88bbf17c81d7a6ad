//! Applicants under consideration for a team.

use std::cmp::Ordering;

use serde::Serialize;

use cohort_core::{ProjectId, ResponseId, TeamId, UserId};

/// One applicant for a single allocation run.
///
/// Built from the applicant's survey response and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationCandidate {
    pub user: UserId,
    /// Priority tier, `0` is best.
    pub selection_rank: u32,
    pub score: Option<i64>,
    pub response: ResponseId,
    /// Projects the applicant asked for. Empty means any project.
    pub project_preferences: Vec<ProjectId>,
}

impl AllocationCandidate {
    pub fn new(user: UserId, selection_rank: u32, response: ResponseId) -> Self {
        Self {
            user,
            selection_rank,
            score: None,
            response,
            project_preferences: Vec::new(),
        }
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_preferences(mut self, projects: Vec<ProjectId>) -> Self {
        self.project_preferences = projects;
        self
    }

    /// Whether a team working on `project` satisfies the applicant's
    /// preferences. Any single listed project is enough.
    pub fn accepts_project(&self, project: ProjectId) -> bool {
        self.project_preferences.is_empty() || self.project_preferences.contains(&project)
    }
}

/// Search order: rank ascending, then score descending.
///
/// Missing scores sort after every present score. The sort is stable, so
/// equal candidates keep their input order.
pub fn sort_candidates(candidates: &mut [AllocationCandidate]) {
    candidates.sort_by(compare_priority);
}

pub(crate) fn compare_priority(a: &AllocationCandidate, b: &AllocationCandidate) -> Ordering {
    a.selection_rank
        .cmp(&b.selection_rank)
        .then_with(|| match (a.score, b.score) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Display name and project for a team, shared by every copy of its slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamInfo {
    pub id: TeamId,
    pub name: String,
    pub project: ProjectId,
}
