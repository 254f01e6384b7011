use std::{fmt, sync::Arc};

use tracing::instrument;

use crate::domain::{
    models::{Incident, IncidentId, WorkDuration},
    ports::outbound::{Clock, IncidentBackend},
    ElapsedTimeTracker, IncidentSyncError, TrackerPhase,
};

/// The user-initiated operations that change an incident's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncOp {
    Start,
    Pause,
    Resume,
    Stop,
    Discard,
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncOp::Start => "start",
            SyncOp::Pause => "pause",
            SyncOp::Resume => "resume",
            SyncOp::Stop => "stop",
            SyncOp::Discard => "discard",
        };
        f.write_str(name)
    }
}

/// An operation whose preconditions held against the tracker at the time
/// it was prepared. Carries whatever local state the request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    Start,
    Pause,
    Resume,
    Stop { recorded: WorkDuration },
    Discard,
}

impl SyncCommand {
    /// Check `op` against the tracker without touching the network.
    pub fn prepare(op: SyncOp, tracker: &ElapsedTimeTracker) -> Result<Self, IncidentSyncError> {
        let phase = tracker.phase();
        let invalid = || IncidentSyncError::InvalidTransition { op, phase };

        match op {
            SyncOp::Start if phase == TrackerPhase::NotStarted => Ok(Self::Start),
            SyncOp::Pause if phase == TrackerPhase::Running => Ok(Self::Pause),
            SyncOp::Resume if phase == TrackerPhase::Paused => Ok(Self::Resume),
            SyncOp::Stop if matches!(phase, TrackerPhase::Running | TrackerPhase::Paused) => {
                if tracker.elapsed().is_zero() {
                    return Err(IncidentSyncError::NothingRecorded);
                }
                Ok(Self::Stop {
                    recorded: tracker.elapsed(),
                })
            }
            SyncOp::Discard if phase != TrackerPhase::Finalized => Ok(Self::Discard),
            _ => Err(invalid()),
        }
    }

    pub fn op(&self) -> SyncOp {
        match self {
            SyncCommand::Start => SyncOp::Start,
            SyncCommand::Pause => SyncOp::Pause,
            SyncCommand::Resume => SyncOp::Resume,
            SyncCommand::Stop { .. } => SyncOp::Stop,
            SyncCommand::Discard => SyncOp::Discard,
        }
    }
}

/// Reconciles a tracker with the backend's incident record.
///
/// This is the only place backend state is mutated from. Each operation is a
/// single exchange; failures are returned as-is and never retried.
pub struct IncidentStateSync<B: ?Sized> {
    backend: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<B: ?Sized> Clone for IncidentStateSync<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<B: IncidentBackend + ?Sized> IncidentStateSync<B> {
    pub fn new(backend: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Send a prepared command and return the incident the backend now holds.
    #[instrument(skip(self), fields(op = %command.op()))]
    pub async fn execute(
        &self,
        id: IncidentId,
        command: SyncCommand,
    ) -> Result<Incident, IncidentSyncError> {
        let result = match command {
            SyncCommand::Start => self.backend.start_incident(id, self.clock.now()).await,
            SyncCommand::Pause => self.backend.pause_incident(id, self.clock.now()).await,
            SyncCommand::Resume => self.backend.resume_incident(id).await,
            SyncCommand::Stop { recorded } => {
                self.backend
                    .finalize_incident(id, self.clock.now(), recorded)
                    .await
            }
            SyncCommand::Discard => self.backend.discard_incident(id).await,
        };

        match &result {
            Ok(incident) => tracing::info!(
                state = %incident.state,
                paused = incident.paused,
                accumulated = %incident.accumulated,
                "Incident synced"
            ),
            Err(e) => tracing::warn!("Incident sync failed: {}", e),
        }
        result
    }

    /// Prepare, send and re-seed in one go. Discard resets the tracker.
    pub async fn apply(
        &self,
        op: SyncOp,
        id: IncidentId,
        tracker: &mut ElapsedTimeTracker,
    ) -> Result<(), IncidentSyncError> {
        let command = SyncCommand::prepare(op, tracker)?;
        let incident = self.execute(id, command).await?;
        if op == SyncOp::Discard {
            tracker.reset();
        } else {
            tracker.seed(&incident);
        }
        Ok(())
    }

    pub async fn start(
        &self,
        id: IncidentId,
        tracker: &mut ElapsedTimeTracker,
    ) -> Result<(), IncidentSyncError> {
        self.apply(SyncOp::Start, id, tracker).await
    }

    pub async fn pause(
        &self,
        id: IncidentId,
        tracker: &mut ElapsedTimeTracker,
    ) -> Result<(), IncidentSyncError> {
        self.apply(SyncOp::Pause, id, tracker).await
    }

    pub async fn resume(
        &self,
        id: IncidentId,
        tracker: &mut ElapsedTimeTracker,
    ) -> Result<(), IncidentSyncError> {
        self.apply(SyncOp::Resume, id, tracker).await
    }

    pub async fn stop(
        &self,
        id: IncidentId,
        tracker: &mut ElapsedTimeTracker,
    ) -> Result<(), IncidentSyncError> {
        self.apply(SyncOp::Stop, id, tracker).await
    }

    pub async fn discard(
        &self,
        id: IncidentId,
        tracker: &mut ElapsedTimeTracker,
    ) -> Result<(), IncidentSyncError> {
        self.apply(SyncOp::Discard, id, tracker).await
    }

    /// Plain re-fetch.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: IncidentId) -> Result<Incident, IncidentSyncError> {
        self.backend.fetch_incident(id).await
    }

    pub async fn refresh(
        &self,
        id: IncidentId,
        tracker: &mut ElapsedTimeTracker,
    ) -> Result<Incident, IncidentSyncError> {
        let incident = self.fetch(id).await?;
        tracker.seed(&incident);
        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IncidentState;

    fn seeded(state: IncidentState, paused: bool, secs: u64) -> ElapsedTimeTracker {
        let mut tracker = ElapsedTimeTracker::new();
        tracker.seed(
            &Incident::new(IncidentId::new(1), state)
                .with_paused(paused)
                .with_accumulated(WorkDuration::from_secs(secs)),
        );
        tracker
    }

    #[test]
    fn start_only_from_not_started() {
        let fresh = ElapsedTimeTracker::new();
        assert_eq!(SyncCommand::prepare(SyncOp::Start, &fresh), Ok(SyncCommand::Start));

        let running = seeded(IncidentState::InRepair, false, 3);
        assert_eq!(
            SyncCommand::prepare(SyncOp::Start, &running),
            Err(IncidentSyncError::InvalidTransition {
                op: SyncOp::Start,
                phase: TrackerPhase::Running,
            })
        );
    }

    #[test]
    fn pause_and_resume_follow_phase() {
        let running = seeded(IncidentState::InRepair, false, 3);
        let paused = seeded(IncidentState::InRepair, true, 3);

        assert_eq!(SyncCommand::prepare(SyncOp::Pause, &running), Ok(SyncCommand::Pause));
        assert!(SyncCommand::prepare(SyncOp::Pause, &paused).is_err());
        assert_eq!(SyncCommand::prepare(SyncOp::Resume, &paused), Ok(SyncCommand::Resume));
        assert!(SyncCommand::prepare(SyncOp::Resume, &running).is_err());
    }

    #[test]
    fn stop_carries_local_duration() {
        let paused = seeded(IncidentState::InRepair, true, 95);
        assert_eq!(
            SyncCommand::prepare(SyncOp::Stop, &paused),
            Ok(SyncCommand::Stop {
                recorded: WorkDuration::from_secs(95)
            })
        );
    }

    #[test]
    fn stop_with_nothing_recorded_is_rejected() {
        let running_at_zero = seeded(IncidentState::InRepair, false, 0);
        assert_eq!(
            SyncCommand::prepare(SyncOp::Stop, &running_at_zero),
            Err(IncidentSyncError::NothingRecorded)
        );
        assert!(SyncCommand::prepare(SyncOp::Stop, &ElapsedTimeTracker::new()).is_err());
    }

    #[test]
    fn finalized_incident_accepts_nothing() {
        let done = seeded(IncidentState::Resolved, false, 60);
        for op in [
            SyncOp::Start,
            SyncOp::Pause,
            SyncOp::Resume,
            SyncOp::Stop,
            SyncOp::Discard,
        ] {
            let err = SyncCommand::prepare(op, &done).unwrap_err();
            assert!(err.is_local());
        }
    }
}
