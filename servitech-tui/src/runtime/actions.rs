use crate::app::{App, DetailScreen, LIST_TABS};
use crate::bootstrap::Services;
use servitech_core::domain::{
    models::{Incident, IncidentId},
    IncidentSyncError, MountId, PendingSync, SyncOp, SyncOutcome,
};

use super::action_queue::{Action, ActionTx};

pub(super) fn run_action(action: Action, app: &mut App, services: &Services, tx: &ActionTx) {
    match action {
        Action::RefreshLists => refresh_lists(app, services, tx),
        Action::ListLoaded { state, result } => app.apply_list(state, result),
        Action::OpenIncident(id) => open_incident(id, app, services, tx),
        Action::ReloadIncident => reload_incident(app, services, tx),
        Action::IncidentLoaded { mount, result } => {
            let Some(screen) = app.detail.as_mut() else {
                return;
            };
            match screen.model.loaded(mount, result) {
                SyncOutcome::Failed(e) => {
                    app.set_status(format!("Could not load incident: {}", e));
                    return;
                }
                SyncOutcome::Applied => {
                    sync_ticker(screen, tx);
                    app.clear_status();
                }
                _ => {}
            }
        }
        Action::Begin(op) => {
            let pending = match app.detail.as_mut().map(|screen| screen.model.begin(op)) {
                Some(pending) => pending,
                None => return,
            };
            dispatch(pending, app, services, tx);
        }
        Action::ConfirmStop => {
            let Some(screen) = app.detail.as_mut() else {
                return;
            };
            let pending = screen.model.confirm_stop();
            dispatch(pending, app, services, tx);
        }
        Action::ConfirmExit => {
            let Some(screen) = app.detail.as_mut() else {
                return;
            };
            let pending = screen.model.confirm_exit();
            dispatch(pending, app, services, tx);
        }
        Action::SyncFinished { mount, op, result } => {
            handle_sync_finished(mount, op, result, app, tx);
        }
        Action::Tick { mount } => {
            if let Some(screen) = app.detail.as_mut() {
                screen.model.tick(mount);
            }
        }
    }
}

fn refresh_lists(app: &mut App, services: &Services, tx: &ActionTx) {
    let technician = app.technician.id;
    for state in LIST_TABS {
        app.loading_tabs.insert(state);
        let sync = services.sync.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = sync.backend().list_for_technician(technician, state).await;
            let _ = tx.send(Action::ListLoaded { state, result });
        });
    }
}

fn open_incident(id: IncidentId, app: &mut App, services: &Services, tx: &ActionTx) {
    let mount = app.open_detail(id, services.tick_period);
    spawn_fetch(id, mount, services, tx);
}

fn reload_incident(app: &mut App, services: &Services, tx: &ActionTx) {
    let Some(screen) = app.detail.as_ref() else {
        return;
    };
    if !screen.model.can_reload() {
        app.set_status(IncidentSyncError::Busy.to_string());
        return;
    }
    let (id, mount) = (screen.model.incident_id(), screen.model.mount());
    app.set_status("Reloading incident...".to_string());
    spawn_fetch(id, mount, services, tx);
}

fn spawn_fetch(id: IncidentId, mount: MountId, services: &Services, tx: &ActionTx) {
    let sync = services.sync.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = sync.fetch(id).await;
        let _ = tx.send(Action::IncidentLoaded { mount, result });
    });
}

fn dispatch(
    pending: Result<PendingSync, IncidentSyncError>,
    app: &mut App,
    services: &Services,
    tx: &ActionTx,
) {
    let pending = match pending {
        Ok(pending) => pending,
        Err(e) => {
            app.set_status(e.to_string());
            return;
        }
    };

    app.set_status(format!("{}...", progress_label(pending.op())));
    let sync = services.sync.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = sync.execute(pending.incident_id, pending.command).await;
        let _ = tx.send(Action::SyncFinished {
            mount: pending.mount,
            op: pending.op(),
            result,
        });
    });
}

fn handle_sync_finished(
    mount: MountId,
    op: SyncOp,
    result: Result<Incident, IncidentSyncError>,
    app: &mut App,
    tx: &ActionTx,
) {
    let Some(screen) = app.detail.as_mut() else {
        return;
    };

    match screen.model.complete(mount, op, result) {
        SyncOutcome::Applied => {
            sync_ticker(screen, tx);
            app.set_status(done_label(op).to_string());
        }
        SyncOutcome::Failed(e) => {
            sync_ticker(screen, tx);
            if e.needs_reload() {
                let _ = tx.send(Action::ReloadIncident);
            }
            app.set_status(format!("Could not {}: {}", op, e));
        }
        SyncOutcome::Ignored => {}
        SyncOutcome::Left { error } => {
            app.close_detail();
            let _ = tx.send(Action::RefreshLists);
            match error {
                Some(e) => app.set_status(format!("Recorded time could not be discarded: {}", e)),
                None => app.set_status("Recorded time discarded".to_string()),
            }
        }
    }
}

/// Arm the ticker exactly while the tracker is running.
fn sync_ticker(screen: &mut DetailScreen, tx: &ActionTx) {
    let mount = screen.model.mount();
    let running = screen.model.tracker().running();
    screen.ticker.set_running(running, tx, Action::Tick { mount });
}

fn progress_label(op: SyncOp) -> &'static str {
    match op {
        SyncOp::Start => "Starting repair",
        SyncOp::Pause => "Pausing",
        SyncOp::Resume => "Resuming",
        SyncOp::Stop => "Finishing incident",
        SyncOp::Discard => "Discarding recorded time",
    }
}

fn done_label(op: SyncOp) -> &'static str {
    match op {
        SyncOp::Start => "Repair started",
        SyncOp::Pause => "Timer paused",
        SyncOp::Resume => "Timer resumed",
        SyncOp::Stop => "Incident finalized",
        SyncOp::Discard => "Recorded time discarded",
    }
}
