use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use servitech_core::domain::{ExitDecision, SyncOp};

use super::action_queue::{Action, ActionTx};

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    // Ctrl+C quits, unless a running timer has to be dealt with first
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        let guarded = app.detail.as_mut().is_some_and(|screen| {
            screen.model.cancel_stop();
            screen.model.request_back() == ExitDecision::Prompt
        });
        if !guarded {
            app.quit();
        }
        return;
    }

    match app.current_view {
        View::IncidentList => handle_list_key(key, app, action_tx),
        View::IncidentDetail => handle_detail_key(key, app, action_tx),
    }
}

fn handle_list_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_tab(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Char('r') | KeyCode::Char('R') => enqueue_action(action_tx, Action::RefreshLists),
        KeyCode::Enter => {
            if let Some(incident) = app.selected_incident() {
                let id = incident.id;
                enqueue_action(action_tx, Action::OpenIncident(id));
            }
        }
        _ => {}
    }
}

fn handle_detail_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(screen) = app.detail.as_mut() else {
        app.current_view = View::IncidentList;
        return;
    };
    let model = &mut screen.model;

    if model.stop_prompt_open() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                enqueue_action(action_tx, Action::ConfirmStop)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => model.cancel_stop(),
            _ => {}
        }
        return;
    }

    if model.exit_prompt_open() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                enqueue_action(action_tx, Action::ConfirmExit)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => model.cancel_exit(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') => {
            enqueue_action(action_tx, Action::Begin(SyncOp::Start))
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            enqueue_action(action_tx, Action::Begin(SyncOp::Pause))
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            enqueue_action(action_tx, Action::Begin(SyncOp::Resume))
        }
        KeyCode::Char('l') | KeyCode::Char('L') => enqueue_action(action_tx, Action::ReloadIncident),
        KeyCode::Char('f') | KeyCode::Char('F') => {
            if let Err(e) = model.request_stop() {
                app.set_status(e.to_string());
            }
        }
        KeyCode::Esc
        | KeyCode::Backspace
        | KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Char('q')
        | KeyCode::Char('Q') => {
            if model.request_back() == ExitDecision::Proceed {
                app.close_detail();
                app.clear_status();
                enqueue_action(action_tx, Action::RefreshLists);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servitech_core::domain::models::{
        Incident, IncidentId, IncidentState, SessionUser, UserId, WorkDuration,
    };
    use std::time::Duration;

    use super::super::action_queue::channel;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        App::new(SessionUser {
            id: UserId::new(1),
            name: "Test Technician".to_string(),
            email: None,
            role: None,
        })
    }

    fn app_with_detail(incident: Incident) -> App {
        let mut app = test_app();
        let mount = app.open_detail(incident.id, Duration::from_secs(1));
        let screen = app.detail.as_mut().unwrap();
        screen.model.loaded(mount, Ok(incident));
        app
    }

    fn running() -> Incident {
        Incident::new(IncidentId::new(7), IncidentState::InRepair)
            .with_accumulated(WorkDuration::from_secs(40))
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_view_key(key(code), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn enter_opens_selected_incident() {
        let mut app = test_app();
        app.apply_list(
            IncidentState::Pending,
            Ok(vec![Incident::new(IncidentId::new(12), IncidentState::Pending)]),
        );

        match press(&mut app, KeyCode::Enter) {
            Some(Action::OpenIncident(id)) => assert_eq!(id, IncidentId::new(12)),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn back_while_running_opens_prompt_instead_of_leaving() {
        let mut app = app_with_detail(running());

        assert!(press(&mut app, KeyCode::Esc).is_none());
        assert_eq!(app.current_view, View::IncidentDetail);
        assert!(app.detail.as_ref().unwrap().model.exit_prompt_open());

        assert!(matches!(
            press(&mut app, KeyCode::Char('y')),
            Some(Action::ConfirmExit)
        ));
    }

    #[test]
    fn cancelling_exit_prompt_stays_on_screen() {
        let mut app = app_with_detail(running());
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('n')).is_none());

        let model = &app.detail.as_ref().unwrap().model;
        assert!(!model.exit_prompt_open());
        assert!(model.tracker().running());
    }

    #[test]
    fn back_while_paused_leaves_and_refreshes() {
        let mut app = app_with_detail(running().with_paused(true));

        assert!(matches!(
            press(&mut app, KeyCode::Esc),
            Some(Action::RefreshLists)
        ));
        assert_eq!(app.current_view, View::IncidentList);
        assert!(app.detail.is_none());
    }

    #[test]
    fn ctrl_c_with_running_timer_asks_before_leaving() {
        let mut app = app_with_detail(running());
        let (tx, mut rx) = channel();
        handle_view_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
            &tx,
        );

        assert!(app.running);
        assert!(rx.try_recv().is_err());
        assert!(app.detail.as_ref().unwrap().model.exit_prompt_open());
    }

    #[test]
    fn ctrl_c_quits_when_nothing_is_running() {
        let mut app = app_with_detail(running().with_paused(true));
        let (tx, _rx) = channel();
        handle_view_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
            &tx,
        );
        assert!(!app.running);

        let mut app = test_app();
        handle_view_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
            &tx,
        );
        assert!(!app.running);
    }

    #[test]
    fn reload_key_queues_a_refetch() {
        let mut app = app_with_detail(running().with_paused(true));
        assert!(matches!(
            press(&mut app, KeyCode::Char('l')),
            Some(Action::ReloadIncident)
        ));
    }

    #[test]
    fn finish_asks_for_confirmation_first() {
        let mut app = app_with_detail(running());

        assert!(press(&mut app, KeyCode::Char('f')).is_none());
        assert!(app.detail.as_ref().unwrap().model.stop_prompt_open());
        assert!(matches!(
            press(&mut app, KeyCode::Char('y')),
            Some(Action::ConfirmStop)
        ));
    }

    #[test]
    fn finish_without_recorded_time_reports_status() {
        let mut app = app_with_detail(Incident::new(IncidentId::new(7), IncidentState::InRepair));

        assert!(press(&mut app, KeyCode::Char('f')).is_none());
        assert!(!app.detail.as_ref().unwrap().model.stop_prompt_open());
        assert_eq!(
            app.status_message.as_deref(),
            Some("no time has been recorded yet")
        );
    }
}
