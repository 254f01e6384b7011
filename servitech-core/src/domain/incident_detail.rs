use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{
    models::{Incident, IncidentId},
    ElapsedTimeTracker, ExitDecision, ExitGuard, IncidentSyncError, SyncCommand, SyncOp,
};

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

/// Identifies one mounting of a detail view. Results tagged with an older
/// mount are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl MountId {
    pub fn next() -> Self {
        Self(NEXT_MOUNT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A sync request the view should run and report back through
/// [`IncidentDetail::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSync {
    pub mount: MountId,
    pub incident_id: IncidentId,
    pub command: SyncCommand,
}

impl PendingSync {
    pub fn op(&self) -> SyncOp {
        self.command.op()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Tracker re-seeded from the backend.
    Applied,
    /// Error recorded for inline display, tracker untouched.
    Failed(IncidentSyncError),
    /// Stale or unmounted; nothing changed.
    Ignored,
    /// Discard finished. The view must navigate away; a failed discard is
    /// reported here so it can be shown after leaving.
    Left { error: Option<IncidentSyncError> },
}

/// Screen model behind an incident detail view.
///
/// Owns the tracker and exit guard for one incident, serialises operations
/// with a busy flag, and ignores anything that arrives after unmount.
#[derive(Debug)]
pub struct IncidentDetail {
    incident_id: IncidentId,
    mount: MountId,
    incident: Option<Incident>,
    tracker: ElapsedTimeTracker,
    guard: ExitGuard,
    in_flight: Option<SyncOp>,
    last_error: Option<IncidentSyncError>,
    confirming_stop: bool,
    unmounted: bool,
}

impl IncidentDetail {
    pub fn new(incident_id: IncidentId, mount: MountId) -> Self {
        Self {
            incident_id,
            mount,
            incident: None,
            tracker: ElapsedTimeTracker::new(),
            guard: ExitGuard::new(),
            in_flight: None,
            last_error: None,
            confirming_stop: false,
            unmounted: false,
        }
    }

    pub fn seed(&mut self, incident: Incident) {
        self.tracker.seed(&incident);
        self.incident = Some(incident);
    }

    /// Apply the result of the initial fetch (or a later refresh).
    pub fn loaded(
        &mut self,
        mount: MountId,
        result: Result<Incident, IncidentSyncError>,
    ) -> SyncOutcome {
        if !self.accepts(mount) {
            return SyncOutcome::Ignored;
        }
        match result {
            Ok(incident) => {
                self.seed(incident);
                self.last_error = None;
                SyncOutcome::Applied
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                SyncOutcome::Failed(e)
            }
        }
    }

    /// Reload is allowed whenever no operation is in flight.
    pub fn can_reload(&self) -> bool {
        !self.unmounted && self.in_flight.is_none()
    }

    /// Claim the busy slot for `op`. Rejections never reach the network.
    pub fn begin(&mut self, op: SyncOp) -> Result<PendingSync, IncidentSyncError> {
        // Until the first fetch lands the tracker does not reflect the server.
        let prepared = if self.in_flight.is_some() || self.incident.is_none() {
            Err(IncidentSyncError::Busy)
        } else {
            SyncCommand::prepare(op, &self.tracker)
        };

        match prepared {
            Ok(command) => {
                self.in_flight = Some(op);
                self.last_error = None;
                Ok(PendingSync {
                    mount: self.mount,
                    incident_id: self.incident_id,
                    command,
                })
            }
            Err(e) => {
                tracing::debug!(%op, "Rejected locally: {}", e);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn complete(
        &mut self,
        mount: MountId,
        op: SyncOp,
        result: Result<Incident, IncidentSyncError>,
    ) -> SyncOutcome {
        if !self.accepts(mount) {
            tracing::debug!(%op, "Dropping result for a view that is gone");
            return SyncOutcome::Ignored;
        }
        self.in_flight = None;

        if op == SyncOp::Discard {
            self.tracker.reset();
            self.guard.cancel();
            return SyncOutcome::Left {
                error: result.err(),
            };
        }

        match result {
            Ok(incident) => {
                self.seed(incident);
                SyncOutcome::Applied
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                SyncOutcome::Failed(e)
            }
        }
    }

    /// The clock freezes once a stop is sent: the request carries the value
    /// shown at that moment and the display must not run past it.
    pub fn tick(&mut self, mount: MountId) -> bool {
        if self.in_flight == Some(SyncOp::Stop) {
            return false;
        }
        self.accepts(mount) && self.tracker.tick()
    }

    pub fn request_back(&mut self) -> ExitDecision {
        self.guard.on_back(&self.tracker)
    }

    pub fn cancel_exit(&mut self) {
        self.guard.cancel();
    }

    /// Leave anyway, throwing the recorded work away.
    pub fn confirm_exit(&mut self) -> Result<PendingSync, IncidentSyncError> {
        self.guard.confirm();
        self.begin(SyncOp::Discard)
    }

    /// Open the stop confirmation if stopping is currently possible.
    pub fn request_stop(&mut self) -> Result<(), IncidentSyncError> {
        if let Err(e) = SyncCommand::prepare(SyncOp::Stop, &self.tracker) {
            self.last_error = Some(e.clone());
            return Err(e);
        }
        self.confirming_stop = true;
        Ok(())
    }

    pub fn cancel_stop(&mut self) {
        self.confirming_stop = false;
    }

    pub fn confirm_stop(&mut self) -> Result<PendingSync, IncidentSyncError> {
        self.confirming_stop = false;
        self.begin(SyncOp::Stop)
    }

    pub fn unmount(&mut self) {
        self.unmounted = true;
        self.in_flight = None;
    }

    fn accepts(&self, mount: MountId) -> bool {
        !self.unmounted && mount == self.mount
    }

    pub fn incident_id(&self) -> IncidentId {
        self.incident_id
    }

    pub fn mount(&self) -> MountId {
        self.mount
    }

    pub fn incident(&self) -> Option<&Incident> {
        self.incident.as_ref()
    }

    pub fn tracker(&self) -> &ElapsedTimeTracker {
        &self.tracker
    }

    pub fn in_flight(&self) -> Option<SyncOp> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&IncidentSyncError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn exit_prompt_open(&self) -> bool {
        self.guard.is_prompting()
    }

    pub fn stop_prompt_open(&self) -> bool {
        self.confirming_stop
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }
}
