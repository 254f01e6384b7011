use serde::{Deserialize, Serialize};
use serde_with::{serde_as, BoolFromInt, DisplayFromStr, PickFirst};

pub const ESTADO_PENDIENTE: &str = "pendiente";
pub const ESTADO_EN_REPARACION: &str = "en_reparacion";
pub const ESTADO_RESUELTA: &str = "resuelta";

/// Zero duration in the backend's `horas` format.
pub const HORAS_CERO: &str = "00:00:00";

/// An incident exactly as the backend serializes it.
///
/// Everything except `id` and `estado` is optional: older rows and the
/// per-technician listing endpoints omit fields freely.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIncident {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub id: i64,
    pub estado: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub fecha_reporte: Option<String>,
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    #[serde(default)]
    pub fecha_final: Option<String>,
    #[serde(default)]
    pub fecha_hora_pausa: Option<String>,
    #[serde(default)]
    pub horas: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, BoolFromInt)>>")]
    pub pausada: Option<bool>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub cliente_id: Option<i64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub tecnico_id: Option<i64>,
}

/// Body for `PUT /incidencias/{id}` when a technician starts the repair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRepairPayload {
    pub estado: String,
    pub pausada: bool,
    pub fecha_inicio: String,
    pub horas: String,
}

impl StartRepairPayload {
    pub fn new(fecha_inicio: String) -> Self {
        Self {
            estado: ESTADO_EN_REPARACION.to_string(),
            pausada: false,
            fecha_inicio,
            horas: HORAS_CERO.to_string(),
        }
    }
}

/// Body for `PATCH /incidencias/pausar/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PausePayload {
    pub fecha_hora_pausa: String,
}

/// Body for `PUT /incidencias/{id}` when the repair is finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvePayload {
    pub estado: String,
    pub fecha_final: String,
    pub horas: String,
}

impl ResolvePayload {
    pub fn new(fecha_final: String, horas: String) -> Self {
        Self {
            estado: ESTADO_RESUELTA.to_string(),
            fecha_final,
            horas,
        }
    }
}

/// Body for `PUT /incidencias/{id}` that throws away all recorded work.
///
/// The timestamp fields are always serialized so the backend receives
/// explicit nulls and clears them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetPayload {
    pub horas: String,
    pub estado: String,
    pub pausada: bool,
    pub fecha_inicio: Option<String>,
    pub fecha_final: Option<String>,
    pub fecha_hora_pausa: Option<String>,
    pub fecha_ultimo_reinicio: Option<String>,
}

impl Default for ResetPayload {
    fn default() -> Self {
        Self {
            horas: HORAS_CERO.to_string(),
            estado: ESTADO_PENDIENTE.to_string(),
            pausada: false,
            fecha_inicio: None,
            fecha_final: None,
            fecha_hora_pausa: None,
            fecha_ultimo_reinicio: None,
        }
    }
}

/// The per-technician listing endpoints, one per incident state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentBucket {
    Pending,
    InRepair,
    Resolved,
}

impl IncidentBucket {
    pub fn path_segment(&self) -> &'static str {
        match self {
            IncidentBucket::Pending => "pendientes",
            IncidentBucket::InRepair => "en-reparacion",
            IncidentBucket::Resolved => "resueltas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_incident_with_string_id_and_int_flag() {
        let raw: RawIncident = serde_json::from_value(json!({
            "id": "12",
            "estado": "en_reparacion",
            "horas": "00:03:10",
            "pausada": 1,
            "tecnico_id": 4
        }))
        .unwrap();

        assert_eq!(raw.id, 12);
        assert_eq!(raw.pausada, Some(true));
        assert_eq!(raw.tecnico_id, Some(4));
        assert_eq!(raw.cliente_id, None);
        assert_eq!(raw.fecha_inicio, None);
    }

    #[test]
    fn decodes_incident_with_null_horas() {
        let raw: RawIncident = serde_json::from_value(json!({
            "id": 3,
            "estado": "pendiente",
            "horas": null,
            "pausada": false
        }))
        .unwrap();

        assert_eq!(raw.horas, None);
        assert_eq!(raw.pausada, Some(false));
    }

    #[test]
    fn reset_payload_sends_explicit_nulls() {
        let body = serde_json::to_value(ResetPayload::default()).unwrap();
        assert_eq!(
            body,
            json!({
                "horas": "00:00:00",
                "estado": "pendiente",
                "pausada": false,
                "fecha_inicio": null,
                "fecha_final": null,
                "fecha_hora_pausa": null,
                "fecha_ultimo_reinicio": null
            })
        );
    }

    #[test]
    fn start_payload_zeroes_hours() {
        let body =
            serde_json::to_value(StartRepairPayload::new("2024-05-02 09:15:00".to_string()))
                .unwrap();
        assert_eq!(body["estado"], "en_reparacion");
        assert_eq!(body["horas"], "00:00:00");
        assert_eq!(body["pausada"], false);
    }
}
