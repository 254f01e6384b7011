use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// A user row as returned by `/usuarios` and by the login endpoint.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub apellido1: Option<String>,
    #[serde(default)]
    pub apellido2: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub empresa_id: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
}

impl RawUser {
    /// Name followed by both surnames, skipping the ones that are missing.
    pub fn full_name(&self) -> String {
        [
            Some(self.nombre.as_str()),
            self.apellido1.as_deref(),
            self.apellido2.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_name_skips_missing_surnames() {
        let user: RawUser = serde_json::from_value(json!({
            "id": 5,
            "nombre": "Lucía",
            "apellido1": "Ortega",
            "apellido2": ""
        }))
        .unwrap();
        assert_eq!(user.full_name(), "Lucía Ortega");
    }
}
