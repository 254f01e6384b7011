use reqwest::header::{HeaderValue, InvalidHeaderValue};
use serde::{Deserialize, Serialize};

use crate::domain::RawUser;

/// Bearer token handed out by `POST /usuarios/verificar`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyCredentialsPayload<'a> {
    pub email: &'a str,
    #[serde(rename = "contraseña")]
    pub password: &'a str,
}

/// Response of the credential check. The backend answers 200 with no token
/// when the credentials are wrong, so both fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_field_uses_backend_name() {
        let body = serde_json::to_value(VerifyCredentialsPayload {
            email: "tecnico@servitech.es",
            password: "hunter2",
        })
        .unwrap();
        assert_eq!(body["contraseña"], "hunter2");
        assert!(body.get("password").is_none());
    }

    #[test]
    fn token_is_not_leaked_by_debug() {
        let token = AuthToken::new("secret-token");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
        assert!(token.as_header_value().unwrap().is_sensitive());
    }
}
