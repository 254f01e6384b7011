use servitech_core::domain::models::IncidentState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    IncidentList,
    IncidentDetail,
}

/// Tabs of the incident list, in display order.
pub const LIST_TABS: [IncidentState; 3] = [
    IncidentState::Pending,
    IncidentState::InRepair,
    IncidentState::Resolved,
];

pub fn tab_index(state: IncidentState) -> usize {
    LIST_TABS.iter().position(|s| *s == state).unwrap_or(0)
}

pub fn tab_title(state: IncidentState) -> &'static str {
    match state {
        IncidentState::Pending => "Pending",
        IncidentState::InRepair => "In repair",
        IncidentState::Resolved => "Resolved",
    }
}
