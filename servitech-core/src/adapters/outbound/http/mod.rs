mod conversions;

use async_trait::async_trait;
use servitech_client::{
    domain::{format_db_datetime, format_iso_datetime, PausePayload, ResetPayload, ResolvePayload, StartRepairPayload},
    AuthToken, ServitechClient, ServitechFetchError,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::domain::{
    models::{Incident, IncidentId, IncidentState, Session, UserId, WorkDuration},
    ports::outbound::IncidentBackend,
    IncidentSyncError,
};

use self::conversions::{to_bucket, to_domain_incident, to_session};

/// Adapter that wraps the ServiTech REST client to implement the
/// IncidentBackend port.
///
/// The update endpoints do not return a usable incident, so every mutation is
/// followed by a fetch.
#[derive(Debug, Clone)]
pub struct HttpIncidentBackend {
    client: ServitechClient,
}

impl HttpIncidentBackend {
    pub fn new(client: ServitechClient) -> Self {
        Self { client }
    }

    /// Build an adapter that authenticates as `session`.
    pub fn for_session(client: ServitechClient, session: &Session) -> Self {
        Self::new(client.with_token(AuthToken::new(session.token())))
    }

    async fn refetch(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        let raw = self
            .client
            .fetch_incident(id.as_i64())
            .await
            .map_err(|e| map_fetch_error(e, id))?;
        to_domain_incident(raw)
    }

    /// Reload after a mutation the server accepted. One extra attempt, then
    /// the caller is told the change may already be applied.
    async fn confirm(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        let first = match self.refetch(id).await {
            Ok(incident) => return Ok(incident),
            Err(e) => e,
        };
        tracing::warn!(%id, "Reload after update failed, retrying: {}", first);
        self.refetch(id).await.map_err(unconfirmed)
    }
}

#[async_trait]
impl IncidentBackend for HttpIncidentBackend {
    async fn fetch_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        self.refetch(id).await
    }

    #[instrument(skip(self))]
    async fn start_incident(
        &self,
        id: IncidentId,
        started_at: OffsetDateTime,
    ) -> Result<Incident, IncidentSyncError> {
        let payload = StartRepairPayload::new(format_db_datetime(started_at));
        self.client
            .update_incident(id.as_i64(), &payload)
            .await
            .map_err(|e| map_fetch_error(e, id))?;
        self.confirm(id).await
    }

    #[instrument(skip(self))]
    async fn pause_incident(
        &self,
        id: IncidentId,
        paused_at: OffsetDateTime,
    ) -> Result<Incident, IncidentSyncError> {
        let payload = PausePayload {
            fecha_hora_pausa: format_iso_datetime(paused_at),
        };
        self.client
            .pause_incident(id.as_i64(), &payload)
            .await
            .map_err(|e| map_fetch_error(e, id))?;
        self.confirm(id).await
    }

    #[instrument(skip(self))]
    async fn resume_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        self.client
            .resume_incident(id.as_i64())
            .await
            .map_err(|e| map_fetch_error(e, id))?;
        self.confirm(id).await
    }

    #[instrument(skip(self))]
    async fn finalize_incident(
        &self,
        id: IncidentId,
        ended_at: OffsetDateTime,
        recorded: WorkDuration,
    ) -> Result<Incident, IncidentSyncError> {
        let payload = ResolvePayload::new(format_db_datetime(ended_at), recorded.to_string());
        self.client
            .update_incident(id.as_i64(), &payload)
            .await
            .map_err(|e| map_fetch_error(e, id))?;
        self.confirm(id).await
    }

    #[instrument(skip(self))]
    async fn discard_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        self.client
            .update_incident(id.as_i64(), &ResetPayload::default())
            .await
            .map_err(|e| map_fetch_error(e, id))?;
        self.confirm(id).await
    }

    #[instrument(skip(self))]
    async fn list_for_technician(
        &self,
        technician_id: UserId,
        state: IncidentState,
    ) -> Result<Vec<Incident>, IncidentSyncError> {
        let rows = self
            .client
            .fetch_incidents_for_technician(technician_id.as_i64(), to_bucket(state))
            .await
            .map_err(map_list_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match to_domain_incident(row) {
                Ok(incident) => Some(incident),
                Err(e) => {
                    tracing::warn!("Skipping incident row: {}", e);
                    None
                }
            })
            .collect())
    }
}

/// Exchange credentials for a session.
#[instrument(skip(client, password))]
pub async fn authenticate(
    client: &ServitechClient,
    email: &str,
    password: &str,
) -> Result<Session, IncidentSyncError> {
    let response = client
        .verify_credentials(email, password)
        .await
        .map_err(|e| match e {
            ServitechFetchError::Unauthorized | ServitechFetchError::NotFound => {
                IncidentSyncError::InvalidCredentials
            }
            other => map_list_error(other),
        })?;

    match (response.access_token, response.user) {
        (Some(token), Some(user)) if !token.is_empty() => Ok(to_session(token, user)),
        _ => Err(IncidentSyncError::InvalidCredentials),
    }
}

fn unconfirmed(e: IncidentSyncError) -> IncidentSyncError {
    match e {
        IncidentSyncError::Unconfirmed(_) => e,
        other => IncidentSyncError::Unconfirmed(other.to_string()),
    }
}

fn map_fetch_error(e: ServitechFetchError, id: IncidentId) -> IncidentSyncError {
    match e {
        ServitechFetchError::NotFound => IncidentSyncError::NotFound(id),
        other => map_list_error(other),
    }
}

fn map_list_error(e: ServitechFetchError) -> IncidentSyncError {
    match e {
        ServitechFetchError::Unauthorized => IncidentSyncError::Unauthorized,
        ServitechFetchError::NotFound => IncidentSyncError::unknown("endpoint not found"),
        ServitechFetchError::ResponseError(msg) => IncidentSyncError::Transport(msg),
        ServitechFetchError::ParsingError(msg) => IncidentSyncError::unknown(msg),
        ServitechFetchError::Other(msg) => IncidentSyncError::unknown(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_incident() {
        assert_eq!(
            map_fetch_error(ServitechFetchError::NotFound, IncidentId::new(5)),
            IncidentSyncError::NotFound(IncidentId::new(5))
        );
    }

    #[test]
    fn failed_reload_after_update_is_reported_as_unconfirmed() {
        let err = unconfirmed(IncidentSyncError::Transport("connection reset".into()));
        assert_eq!(
            err,
            IncidentSyncError::Unconfirmed("could not reach the server: connection reset".into())
        );
        assert!(err.needs_reload());
        assert_eq!(unconfirmed(err.clone()), err);
    }

    #[test]
    fn transport_failures_are_not_local() {
        let err = map_fetch_error(
            ServitechFetchError::ResponseError("connection refused".into()),
            IncidentId::new(5),
        );
        assert_eq!(err, IncidentSyncError::Transport("connection refused".into()));
        assert!(!err.is_local());
        assert_eq!(
            map_list_error(ServitechFetchError::Unauthorized),
            IncidentSyncError::Unauthorized
        );
    }
}
