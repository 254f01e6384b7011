use servitech_core::domain::{
    models::{Incident, IncidentId, IncidentState, SessionUser},
    IncidentDetail, IncidentSyncError, MountId, Ticker,
};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

mod state;
pub use state::{tab_index, tab_title, View, LIST_TABS};

/// A mounted incident detail view. Dropping it stops its ticker.
#[derive(Debug)]
pub struct DetailScreen {
    pub model: IncidentDetail,
    pub ticker: Ticker,
}

impl DetailScreen {
    pub fn new(incident_id: IncidentId, tick_period: Duration) -> Self {
        Self {
            model: IncidentDetail::new(incident_id, MountId::next()),
            ticker: Ticker::new(tick_period),
        }
    }
}

pub struct App {
    pub running: bool,
    pub technician: SessionUser,
    pub current_view: View,
    pub status_message: Option<String>,

    // Incident lists, one per tab
    pub current_tab: IncidentState,
    pub incidents: HashMap<IncidentState, Vec<Incident>>,
    pub selected_index: usize,
    pub loading_tabs: HashSet<IncidentState>,

    pub detail: Option<DetailScreen>,
}

impl App {
    pub fn new(technician: SessionUser) -> Self {
        Self {
            running: true,
            technician,
            current_view: View::IncidentList,
            status_message: None,
            current_tab: IncidentState::Pending,
            incidents: HashMap::new(),
            selected_index: 0,
            loading_tabs: HashSet::new(),
            detail: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn visible_incidents(&self) -> &[Incident] {
        self.incidents
            .get(&self.current_tab)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn selected_incident(&self) -> Option<&Incident> {
        self.visible_incidents().get(self.selected_index)
    }

    pub fn next_tab(&mut self) {
        let next = (tab_index(self.current_tab) + 1) % LIST_TABS.len();
        self.switch_tab(LIST_TABS[next]);
    }

    pub fn previous_tab(&mut self) {
        let current = tab_index(self.current_tab);
        let previous = (current + LIST_TABS.len() - 1) % LIST_TABS.len();
        self.switch_tab(LIST_TABS[previous]);
    }

    fn switch_tab(&mut self, tab: IncidentState) {
        self.current_tab = tab;
        self.selected_index = 0;
    }

    pub fn select_next(&mut self) {
        let len = self.visible_incidents().len();
        if len > 0 && self.selected_index + 1 < len {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn apply_list(
        &mut self,
        state: IncidentState,
        result: Result<Vec<Incident>, IncidentSyncError>,
    ) {
        self.loading_tabs.remove(&state);
        match result {
            Ok(mut incidents) => {
                incidents.sort_by(|a, b| b.id.cmp(&a.id));
                self.incidents.insert(state, incidents);
            }
            Err(e) => {
                tracing::warn!(%state, "Failed to load incidents: {}", e);
                self.set_status(format!("Could not load {} incidents: {}", tab_title(state), e));
            }
        }
        let len = self.visible_incidents().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.loading_tabs.is_empty()
    }

    pub fn open_detail(&mut self, incident_id: IncidentId, tick_period: Duration) -> MountId {
        self.close_detail();
        let screen = DetailScreen::new(incident_id, tick_period);
        let mount = screen.model.mount();
        self.detail = Some(screen);
        self.current_view = View::IncidentDetail;
        self.clear_status();
        mount
    }

    /// Unmount the detail view, if any, and return to the list.
    pub fn close_detail(&mut self) {
        if let Some(mut screen) = self.detail.take() {
            screen.model.unmount();
        }
        self.current_view = View::IncidentList;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servitech_core::domain::models::UserId;

    fn test_app() -> App {
        App::new(SessionUser {
            id: UserId::new(1),
            name: "Test Technician".to_string(),
            email: None,
            role: None,
        })
    }

    fn incidents(ids: &[i64]) -> Vec<Incident> {
        ids.iter()
            .map(|id| Incident::new(IncidentId::new(*id), IncidentState::Pending))
            .collect()
    }

    #[test]
    fn tabs_wrap_in_both_directions() {
        let mut app = test_app();
        app.previous_tab();
        assert_eq!(app.current_tab, IncidentState::Resolved);
        app.next_tab();
        assert_eq!(app.current_tab, IncidentState::Pending);
        app.next_tab();
        assert_eq!(app.current_tab, IncidentState::InRepair);
    }

    #[test]
    fn list_is_newest_first_and_selection_is_clamped() {
        let mut app = test_app();
        app.apply_list(IncidentState::Pending, Ok(incidents(&[3, 9, 5])));
        let ids: Vec<_> = app.visible_incidents().iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![9, 5, 3]);

        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_index, 2);

        app.apply_list(IncidentState::Pending, Ok(incidents(&[1])));
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.selected_incident().map(|i| i.id), Some(IncidentId::new(1)));
    }

    #[test]
    fn failed_load_keeps_previous_list() {
        let mut app = test_app();
        app.loading_tabs.insert(IncidentState::Pending);
        app.apply_list(IncidentState::Pending, Ok(incidents(&[4])));
        app.apply_list(
            IncidentState::Pending,
            Err(IncidentSyncError::Transport("offline".into())),
        );

        assert_eq!(app.visible_incidents().len(), 1);
        assert!(app.status_message.is_some());
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn closing_detail_unmounts_and_returns_to_list() {
        let mut app = test_app();
        let first = app.open_detail(IncidentId::new(4), Duration::from_secs(1));
        let second = app.open_detail(IncidentId::new(5), Duration::from_secs(1));
        assert_ne!(first, second);
        assert_eq!(app.current_view, View::IncidentDetail);

        app.close_detail();
        assert!(app.detail.is_none());
        assert_eq!(app.current_view, View::IncidentList);
    }
}
