use thiserror::Error;

use crate::domain::{models::IncidentId, SyncOp, TrackerPhase};

/// Errors surfaced by incident time tracking.
///
/// `Clone` so the detail model can keep the last one around for display
/// while also handing it to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncidentSyncError {
    #[error("could not reach the server: {0}")]
    Transport(String),
    #[error("session expired or not authorized")]
    Unauthorized,
    #[error("incident {0} not found")]
    NotFound(IncidentId),
    #[error("cannot {op} while the timer is {phase}")]
    InvalidTransition { op: SyncOp, phase: TrackerPhase },
    #[error("no time has been recorded yet")]
    NothingRecorded,
    #[error("another operation is still in progress")]
    Busy,
    /// The change was sent and accepted but the incident could not be
    /// reloaded afterwards, so the server may already hold the new state.
    #[error("change sent but the incident could not be reloaded: {0}")]
    Unconfirmed(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unknown(String),
}

impl IncidentSyncError {
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// True when the operation was rejected before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::NothingRecorded | Self::Busy
        )
    }

    /// True when the backend state is unknown and should be re-fetched.
    pub fn needs_reload(&self) -> bool {
        matches!(self, Self::Unconfirmed(_))
    }
}
