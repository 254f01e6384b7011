use servitech_client::domain::{parse_backend_datetime, IncidentBucket, RawIncident, RawUser};
use time::PrimitiveDateTime;

use crate::domain::{
    models::{Incident, IncidentId, IncidentState, Session, SessionUser, UserId, WorkDuration},
    IncidentSyncError,
};

/// Convert a backend incident row into the domain model.
///
/// Only an unknown `estado` is an error; every other field degrades to
/// `None` or zero.
pub fn to_domain_incident(raw: RawIncident) -> Result<Incident, IncidentSyncError> {
    let state: IncidentState = raw
        .estado
        .parse()
        .map_err(|e: String| IncidentSyncError::unknown(format!("incident {}: {}", raw.id, e)))?;

    let mut incident = Incident::new(IncidentId::from(raw.id), state)
        .with_paused(raw.pausada.unwrap_or(false))
        .with_accumulated(WorkDuration::parse_lenient(raw.horas.as_deref()));

    incident.started_at = to_timestamp("fecha_inicio", raw.fecha_inicio.as_deref());
    incident.paused_at = to_timestamp("fecha_hora_pausa", raw.fecha_hora_pausa.as_deref());
    incident.ended_at = to_timestamp("fecha_final", raw.fecha_final.as_deref());
    incident.reported_at = to_timestamp("fecha_reporte", raw.fecha_reporte.as_deref());
    incident.description = raw.descripcion.filter(|s| !s.trim().is_empty());
    incident.address = raw.direccion.filter(|s| !s.trim().is_empty());
    incident.kind = raw.tipo.as_deref().and_then(|t| t.parse().ok());
    incident.client_id = raw.cliente_id.map(UserId::from);
    incident.technician_id = raw.tecnico_id.map(UserId::from);

    Ok(incident)
}

fn to_timestamp(field: &str, raw: Option<&str>) -> Option<PrimitiveDateTime> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    let parsed = parse_backend_datetime(raw);
    if parsed.is_none() {
        tracing::warn!(field, raw, "Dropping unparseable timestamp");
    }
    parsed
}

pub fn to_bucket(state: IncidentState) -> IncidentBucket {
    match state {
        IncidentState::Pending => IncidentBucket::Pending,
        IncidentState::InRepair => IncidentBucket::InRepair,
        IncidentState::Resolved => IncidentBucket::Resolved,
    }
}

pub fn to_session(token: String, user: RawUser) -> Session {
    let name = user.full_name();
    Session::new(
        token,
        SessionUser {
            id: UserId::from(user.id),
            name,
            email: user.email,
            role: user.rol,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IncidentKind;
    use time::macros::datetime;

    fn raw(estado: &str) -> RawIncident {
        RawIncident {
            id: 31,
            estado: estado.to_string(),
            descripcion: Some("Caldera sin presión".into()),
            direccion: Some("  ".into()),
            tipo: Some("presencial".into()),
            fecha_reporte: Some("2024-05-02T08:15:00.000Z".into()),
            fecha_inicio: Some("2024-05-03 10:00:00".into()),
            fecha_final: None,
            fecha_hora_pausa: Some("yesterday".into()),
            horas: Some("01:30:05".into()),
            pausada: Some(true),
            cliente_id: Some(4),
            tecnico_id: None,
        }
    }

    #[test]
    fn converts_full_row() {
        let incident = to_domain_incident(raw("en_reparacion")).unwrap();

        assert_eq!(incident.id, IncidentId::new(31));
        assert_eq!(incident.state, IncidentState::InRepair);
        assert!(incident.paused);
        assert_eq!(incident.accumulated, WorkDuration::from_secs(5_405));
        assert_eq!(incident.started_at, Some(datetime!(2024-05-03 10:00:00)));
        assert_eq!(incident.reported_at, Some(datetime!(2024-05-02 08:15:00)));
        assert_eq!(incident.paused_at, None);
        assert_eq!(incident.address, None);
        assert_eq!(incident.kind, Some(IncidentKind::OnSite));
        assert_eq!(incident.client_id, Some(UserId::new(4)));
    }

    #[test]
    fn missing_duration_is_zero() {
        let mut row = raw("pendiente");
        row.horas = None;
        row.pausada = None;

        let incident = to_domain_incident(row).unwrap();
        assert!(incident.accumulated.is_zero());
        assert!(!incident.paused);
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!(to_domain_incident(raw("archivada")).is_err());
    }
}
