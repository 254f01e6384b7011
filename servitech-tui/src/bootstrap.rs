use anyhow::{Context, Result};
use servitech_client::ServitechClient;
use servitech_core::{
    adapters::outbound::{HttpIncidentBackend, InMemoryIncidentBackend, SystemClock},
    config::Settings,
    domain::{
        models::{Session, SessionUser, UserId},
        ports::outbound::{Clock, IncidentBackend},
        IncidentStateSync,
    },
};
use std::{sync::Arc, time::Duration};

/// Everything the runtime needs besides UI state.
#[derive(Clone)]
pub struct Services {
    pub sync: IncidentStateSync<dyn IncidentBackend>,
    pub tick_period: Duration,
}

impl Services {
    pub fn new(
        backend: Arc<dyn IncidentBackend>,
        clock: Arc<dyn Clock>,
        tick_period: Duration,
    ) -> Self {
        Self {
            sync: IncidentStateSync::new(backend, clock),
            tick_period,
        }
    }
}

pub fn http_services(settings: &Settings, session: &Session) -> Result<Services> {
    let client = ServitechClient::new(&settings.api.base_url, settings.api.timeout())
        .context("Failed to create API client")?;
    let backend = HttpIncidentBackend::for_session(client, session);
    tracing::info!(base_url = %settings.api.base_url, "Using HTTP backend");

    Ok(Services::new(
        Arc::new(backend),
        Arc::new(SystemClock),
        settings.tracker.tick_interval(),
    ))
}

pub fn dev_session() -> Session {
    Session::new(
        "dev-token",
        SessionUser {
            id: UserId::new(1),
            name: "Dev Technician".to_string(),
            email: Some("dev@servitech.local".to_string()),
            role: Some("tecnico".to_string()),
        },
    )
}

pub fn dev_services(settings: &Settings, session: &Session) -> Services {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let backend = InMemoryIncidentBackend::with_sample_data(clock.clone(), session.user_id());
    tracing::info!("Using in-memory dev backend");

    Services::new(Arc::new(backend), clock, settings.tracker.tick_interval())
}
