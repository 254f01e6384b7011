use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::domain::{
    models::{Incident, IncidentId, IncidentKind, IncidentState, UserId, WorkDuration},
    ports::outbound::{Clock, IncidentBackend},
    IncidentSyncError,
};

/// A request as the in-memory backend received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Fetch(IncidentId),
    Start(IncidentId),
    Pause(IncidentId),
    Resume(IncidentId),
    /// Carries the duration exactly as it would go over the wire.
    Finalize(IncidentId, String),
    Discard(IncidentId),
    List(UserId, IncidentState),
}

#[derive(Debug, Clone)]
struct StoredIncident {
    incident: Incident,
    running_since: Option<OffsetDateTime>,
}

#[derive(Debug, Default)]
struct Store {
    incidents: BTreeMap<IncidentId, StoredIncident>,
    calls: Vec<BackendCall>,
    fail_next: Option<IncidentSyncError>,
}

/// Backend that keeps incidents in memory and behaves like the real server:
/// pausing folds the running interval into the stored duration, stopping
/// stores whatever the client reports.
///
/// Used by `dev` mode and by tests. Clones share the same store.
#[derive(Clone)]
pub struct InMemoryIncidentBackend {
    store: Arc<Mutex<Store>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryIncidentBackend {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            clock,
        }
    }

    /// Backend pre-filled with a few incidents for `technician`.
    pub fn with_sample_data(clock: Arc<dyn Clock>, technician: UserId) -> Self {
        let backend = Self::new(clock);
        for incident in sample_incidents(technician) {
            backend.insert(incident);
        }
        backend
    }

    pub fn insert(&self, incident: Incident) {
        let running_since = incident.is_running().then(|| self.clock.now());
        if let Ok(mut store) = self.lock() {
            store.incidents.insert(
                incident.id,
                StoredIncident {
                    incident,
                    running_since,
                },
            );
        }
    }

    pub fn get(&self, id: IncidentId) -> Option<Incident> {
        self.lock()
            .ok()?
            .incidents
            .get(&id)
            .map(|stored| stored.incident.clone())
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Make the next request fail with `error` without changing anything.
    pub fn fail_next(&self, error: IncidentSyncError) {
        if let Ok(mut store) = self.lock() {
            store.fail_next = Some(error);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, IncidentSyncError> {
        self.store
            .lock()
            .map_err(|_| IncidentSyncError::unknown("in-memory store lock poisoned"))
    }

    fn update<F>(&self, call: BackendCall, id: IncidentId, f: F) -> Result<Incident, IncidentSyncError>
    where
        F: FnOnce(&mut StoredIncident, OffsetDateTime),
    {
        let now = self.clock.now();
        let mut store = self.lock()?;
        store.calls.push(call);
        if let Some(error) = store.fail_next.take() {
            return Err(error);
        }

        let stored = store
            .incidents
            .get_mut(&id)
            .ok_or(IncidentSyncError::NotFound(id))?;
        f(stored, now);
        Ok(stored.incident.clone())
    }
}

fn to_primitive(at: OffsetDateTime) -> PrimitiveDateTime {
    let utc = at.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

fn whole_seconds_between(from: OffsetDateTime, to: OffsetDateTime) -> WorkDuration {
    WorkDuration::from_secs((to - from).whole_seconds().max(0) as u64)
}

#[async_trait]
impl IncidentBackend for InMemoryIncidentBackend {
    async fn fetch_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        self.update(BackendCall::Fetch(id), id, |_, _| {})
    }

    async fn start_incident(
        &self,
        id: IncidentId,
        started_at: OffsetDateTime,
    ) -> Result<Incident, IncidentSyncError> {
        self.update(BackendCall::Start(id), id, |stored, _| {
            let incident = &mut stored.incident;
            incident.state = IncidentState::InRepair;
            incident.paused = false;
            incident.accumulated = WorkDuration::ZERO;
            incident.started_at = Some(to_primitive(started_at));
            incident.paused_at = None;
            incident.ended_at = None;
            stored.running_since = Some(started_at);
        })
    }

    async fn pause_incident(
        &self,
        id: IncidentId,
        paused_at: OffsetDateTime,
    ) -> Result<Incident, IncidentSyncError> {
        self.update(BackendCall::Pause(id), id, |stored, _| {
            if let Some(since) = stored.running_since.take() {
                let interval = whole_seconds_between(since, paused_at);
                stored.incident.accumulated = stored.incident.accumulated.saturating_add(interval);
            }
            stored.incident.paused = true;
            stored.incident.paused_at = Some(to_primitive(paused_at));
        })
    }

    async fn resume_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        self.update(BackendCall::Resume(id), id, |stored, now| {
            stored.incident.paused = false;
            stored.running_since = Some(now);
        })
    }

    async fn finalize_incident(
        &self,
        id: IncidentId,
        ended_at: OffsetDateTime,
        recorded: WorkDuration,
    ) -> Result<Incident, IncidentSyncError> {
        let call = BackendCall::Finalize(id, recorded.to_string());
        self.update(call, id, |stored, _| {
            stored.incident.state = IncidentState::Resolved;
            stored.incident.paused = false;
            stored.incident.accumulated = recorded;
            stored.incident.ended_at = Some(to_primitive(ended_at));
            stored.running_since = None;
        })
    }

    async fn discard_incident(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        self.update(BackendCall::Discard(id), id, |stored, _| {
            let incident = &mut stored.incident;
            incident.state = IncidentState::Pending;
            incident.paused = false;
            incident.accumulated = WorkDuration::ZERO;
            incident.started_at = None;
            incident.paused_at = None;
            incident.ended_at = None;
            stored.running_since = None;
        })
    }

    async fn list_for_technician(
        &self,
        technician_id: UserId,
        state: IncidentState,
    ) -> Result<Vec<Incident>, IncidentSyncError> {
        let mut store = self.lock()?;
        store.calls.push(BackendCall::List(technician_id, state));
        if let Some(error) = store.fail_next.take() {
            return Err(error);
        }
        let incidents = store
            .incidents
            .values()
            .map(|stored| &stored.incident)
            .filter(|i| i.technician_id == Some(technician_id) && i.state == state)
            .cloned()
            .collect();
        Ok(incidents)
    }
}

fn sample_incidents(technician: UserId) -> Vec<Incident> {
    vec![
        Incident::new(IncidentId::new(101), IncidentState::Pending)
            .with_description("Caldera sin presión, pierde agua por la válvula")
            .with_address("Calle Mayor 12, 3ºB")
            .with_kind(IncidentKind::OnSite)
            .with_client(UserId::new(21))
            .with_technician(technician),
        Incident::new(IncidentId::new(102), IncidentState::Pending)
            .with_description("Router de la oficina se reinicia cada hora")
            .with_kind(IncidentKind::Remote)
            .with_client(UserId::new(22))
            .with_technician(technician),
        Incident::new(IncidentId::new(103), IncidentState::InRepair)
            .with_paused(true)
            .with_accumulated(WorkDuration::from_secs(1_260))
            .with_description("Aire acondicionado no enfría")
            .with_address("Av. de la Constitución 4")
            .with_kind(IncidentKind::OnSite)
            .with_client(UserId::new(23))
            .with_technician(technician),
        Incident::new(IncidentId::new(104), IncidentState::Resolved)
            .with_accumulated(WorkDuration::from_secs(5_400))
            .with_description("Sustitución de enchufe quemado")
            .with_kind(IncidentKind::OnSite)
            .with_client(UserId::new(21))
            .with_technician(technician),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::ManualClock;
    use time::{macros::datetime, Duration};

    fn backend() -> (InMemoryIncidentBackend, ManualClock) {
        let clock = ManualClock::new(datetime!(2024-06-10 08:00 UTC));
        let backend =
            InMemoryIncidentBackend::with_sample_data(Arc::new(clock.clone()), UserId::new(7));
        (backend, clock)
    }

    #[tokio::test]
    async fn pause_folds_running_interval_into_duration() {
        let (backend, clock) = backend();
        let id = IncidentId::new(101);

        backend.start_incident(id, clock.now()).await.unwrap();
        clock.advance(Duration::seconds(65));
        let paused = backend.pause_incident(id, clock.now()).await.unwrap();

        assert!(paused.paused);
        assert_eq!(paused.accumulated, WorkDuration::from_secs(65));

        clock.advance(Duration::seconds(600));
        backend.resume_incident(id).await.unwrap();
        clock.advance(Duration::seconds(10));
        let paused = backend.pause_incident(id, clock.now()).await.unwrap();
        assert_eq!(paused.accumulated, WorkDuration::from_secs(75));
    }

    #[tokio::test]
    async fn lists_by_state_for_technician() {
        let (backend, _) = backend();

        let pending = backend
            .list_for_technician(UserId::new(7), IncidentState::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);

        let other = backend
            .list_for_technician(UserId::new(8), IncidentState::Pending)
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn injected_failure_changes_nothing() {
        let (backend, clock) = backend();
        let id = IncidentId::new(101);
        backend.fail_next(IncidentSyncError::Transport("offline".into()));

        let err = backend.start_incident(id, clock.now()).await.unwrap_err();
        assert_eq!(err, IncidentSyncError::Transport("offline".into()));
        assert_eq!(backend.get(id).unwrap().state, IncidentState::Pending);
        assert_eq!(backend.calls(), vec![BackendCall::Start(id)]);
    }

    #[tokio::test]
    async fn unknown_incident_is_not_found() {
        let (backend, _) = backend();
        let err = backend.fetch_incident(IncidentId::new(999)).await.unwrap_err();
        assert_eq!(err, IncidentSyncError::NotFound(IncidentId::new(999)));
    }
}
