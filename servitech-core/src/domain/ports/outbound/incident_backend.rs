use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::{Incident, IncidentId, IncidentState, UserId, WorkDuration},
    IncidentSyncError,
};

/// Outbound port for the authoritative incident store.
///
/// Every mutating call returns the incident as the backend sees it after the
/// change, so callers can re-seed local state from confirmed values.
#[async_trait]
pub trait IncidentBackend: Send + Sync + 'static {
    async fn fetch_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError>;

    /// Move a pending incident into repair with zero recorded time.
    async fn start_incident(
        &self,
        id: IncidentId,
        started_at: OffsetDateTime,
    ) -> Result<Incident, IncidentSyncError>;

    /// The backend folds the running interval into the stored duration.
    async fn pause_incident(
        &self,
        id: IncidentId,
        paused_at: OffsetDateTime,
    ) -> Result<Incident, IncidentSyncError>;

    async fn resume_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError>;

    /// Resolve the incident, storing `recorded` as its final duration.
    async fn finalize_incident(
        &self,
        id: IncidentId,
        ended_at: OffsetDateTime,
        recorded: WorkDuration,
    ) -> Result<Incident, IncidentSyncError>;

    /// Throw away all recorded work and return the incident to pending.
    async fn discard_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError>;

    async fn list_for_technician(
        &self,
        technician_id: UserId,
        state: IncidentState,
    ) -> Result<Vec<Incident>, IncidentSyncError>;
}
