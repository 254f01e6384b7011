use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::{IncidentId, UserId, WorkDuration};

/// Outer lifecycle of an incident. Only the backend moves it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentState {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_reparacion")]
    InRepair,
    #[serde(rename = "resuelta")]
    Resolved,
}

impl IncidentState {
    pub fn as_wire(&self) -> &'static str {
        match self {
            IncidentState::Pending => "pendiente",
            IncidentState::InRepair => "en_reparacion",
            IncidentState::Resolved => "resuelta",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncidentState::Pending => "Pending",
            IncidentState::InRepair => "In repair",
            IncidentState::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for IncidentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

impl std::str::FromStr for IncidentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(IncidentState::Pending),
            "en_reparacion" => Ok(IncidentState::InRepair),
            "resuelta" => Ok(IncidentState::Resolved),
            _ => Err(format!("Unknown incident state: {}", s)),
        }
    }
}

/// Whether the repair happens on site or remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentKind {
    #[serde(rename = "presencial")]
    OnSite,
    #[serde(rename = "remota")]
    Remote,
}

impl std::str::FromStr for IncidentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "presencial" => Ok(IncidentKind::OnSite),
            "remota" => Ok(IncidentKind::Remote),
            _ => Err(format!("Unknown incident kind: {}", s)),
        }
    }
}

/// Local projection of the backend's incident record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub id: IncidentId,
    pub state: IncidentState,
    /// Only meaningful while `state` is `InRepair`.
    pub paused: bool,
    pub accumulated: WorkDuration,
    pub started_at: Option<PrimitiveDateTime>,
    pub paused_at: Option<PrimitiveDateTime>,
    pub ended_at: Option<PrimitiveDateTime>,
    pub reported_at: Option<PrimitiveDateTime>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub kind: Option<IncidentKind>,
    pub client_id: Option<UserId>,
    pub technician_id: Option<UserId>,
}

impl Incident {
    pub fn new(id: IncidentId, state: IncidentState) -> Self {
        Self {
            id,
            state,
            paused: false,
            accumulated: WorkDuration::ZERO,
            started_at: None,
            paused_at: None,
            ended_at: None,
            reported_at: None,
            description: None,
            address: None,
            kind: None,
            client_id: None,
            technician_id: None,
        }
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn with_accumulated(mut self, accumulated: WorkDuration) -> Self {
        self.accumulated = accumulated;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_kind(mut self, kind: IncidentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_client(mut self, client_id: UserId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn with_technician(mut self, technician_id: UserId) -> Self {
        self.technician_id = Some(technician_id);
        self
    }

    pub fn with_reported_at(mut self, reported_at: PrimitiveDateTime) -> Self {
        self.reported_at = Some(reported_at);
        self
    }

    /// True while work time is being accumulated server-side.
    pub fn is_running(&self) -> bool {
        self.state == IncidentState::InRepair && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_wire_names() {
        for state in [
            IncidentState::Pending,
            IncidentState::InRepair,
            IncidentState::Resolved,
        ] {
            assert_eq!(state.as_wire().parse::<IncidentState>().unwrap(), state);
        }
        assert!("en_curso".parse::<IncidentState>().is_err());
    }

    #[test]
    fn paused_flag_only_counts_in_repair() {
        let pending = Incident::new(IncidentId::new(1), IncidentState::Pending);
        assert!(!pending.is_running());

        let running = Incident::new(IncidentId::new(1), IncidentState::InRepair);
        assert!(running.is_running());
        assert!(!running.clone().with_paused(true).is_running());
    }
}
