use servitech_core::domain::{
    models::{Incident, IncidentId, IncidentState},
    IncidentSyncError, MountId, SyncOp,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub(super) enum Action {
    RefreshLists,
    ListLoaded {
        state: IncidentState,
        result: Result<Vec<Incident>, IncidentSyncError>,
    },
    OpenIncident(IncidentId),
    ReloadIncident,
    IncidentLoaded {
        mount: MountId,
        result: Result<Incident, IncidentSyncError>,
    },
    Begin(SyncOp),
    ConfirmStop,
    ConfirmExit,
    SyncFinished {
        mount: MountId,
        op: SyncOp,
        result: Result<Incident, IncidentSyncError>,
    },
    Tick {
        mount: MountId,
    },
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
