//! Roster error types.

use thiserror::Error;

use cohort_core::SessionId;

/// Errors from applying or reporting on a session's roster.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("state store error: {0}")]
    State(#[from] cohort_state::StateError),
}

pub type RosterResult<T> = Result<T, RosterError>;
