use std::time::Duration;

use reqwest::{header::AUTHORIZATION, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{IncidentBucket, PausePayload, RawIncident},
    AuthToken, LoginResponse, ServitechURL, VerifyCredentialsPayload,
};

/// Thin wrapper over the ServiTech REST API.
///
/// Mutating calls return `()`: the backend's response bodies for updates are
/// not stable across endpoints, so callers re-fetch the incident afterwards.
#[derive(Debug, Clone)]
pub struct ServitechClient {
    http: reqwest::Client,
    base_url: ServitechURL,
    token: Option<AuthToken>,
}

impl ServitechClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServitechFetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServitechFetchError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: ServitechURL::new(base_url),
            token: None,
        })
    }

    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_ref()
    }

    fn incidents_url(&self) -> ServitechURL {
        self.base_url.append_path("/incidencias")
    }

    async fn send(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<Response, ServitechFetchError> {
        let request = match &self.token {
            Some(token) => {
                let header = token
                    .as_header_value()
                    .map_err(|e| ServitechFetchError::Other(e.to_string()))?;
                request.header(AUTHORIZATION, header)
            }
            None => request,
        };

        let resp = request
            .send()
            .await
            .map_err(|e| ServitechFetchError::ResponseError(format!("{}: {}", call_name, e)))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ServitechFetchError::Unauthorized)
            }
            StatusCode::NOT_FOUND => Err(ServitechFetchError::NotFound),
            status if !status.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                Err(ServitechFetchError::ResponseError(format!(
                    "{} returned {}: {}",
                    call_name, status, body
                )))
            }
            _ => Ok(resp),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ServitechFetchError> {
        let resp = self.send(request, call_name).await?;

        resp.json::<T>().await.map_err(|e| {
            ServitechFetchError::ParsingError(format!(
                "Failed to parse {} response as JSON: {}",
                call_name, e
            ))
        })
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<(), ServitechFetchError> {
        let resp = self.send(request, call_name).await?;
        if let Err(e) = resp.bytes().await {
            tracing::debug!("Ignoring unreadable {} response body: {}", call_name, e);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn fetch_incident(&self, incident_id: i64) -> Result<RawIncident, ServitechFetchError> {
        let url = self.incidents_url().append_id(incident_id);
        self.fetch(self.http.get(url.as_ref()), "GET /incidencias/:id")
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch_incidents_for_technician(
        &self,
        technician_id: i64,
        bucket: IncidentBucket,
    ) -> Result<Vec<RawIncident>, ServitechFetchError> {
        let url = self
            .incidents_url()
            .append_path("tecnico")
            .append_id(technician_id)
            .append_path(bucket.path_segment());
        self.fetch(
            self.http.get(url.as_ref()),
            "GET /incidencias/tecnico/:id/:bucket",
        )
        .await
    }

    /// `PUT /incidencias/{id}` with a partial body.
    #[instrument(skip(self, payload))]
    pub async fn update_incident<P: Serialize + ?Sized>(
        &self,
        incident_id: i64,
        payload: &P,
    ) -> Result<(), ServitechFetchError> {
        let url = self.incidents_url().append_id(incident_id);
        self.send_without_body(
            self.http.put(url.as_ref()).json(payload),
            "PUT /incidencias/:id",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn pause_incident(
        &self,
        incident_id: i64,
        payload: &PausePayload,
    ) -> Result<(), ServitechFetchError> {
        let url = self
            .incidents_url()
            .append_path("pausar")
            .append_id(incident_id);
        self.send_without_body(
            self.http.patch(url.as_ref()).json(payload),
            "PATCH /incidencias/pausar/:id",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn resume_incident(&self, incident_id: i64) -> Result<(), ServitechFetchError> {
        let url = self
            .incidents_url()
            .append_path("reanudar")
            .append_id(incident_id);
        self.send_without_body(
            self.http.patch(url.as_ref()),
            "PATCH /incidencias/reanudar/:id",
        )
        .await
    }

    #[instrument(skip(self, password))]
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ServitechFetchError> {
        let url = self.base_url.append_path("/usuarios/verificar");
        self.fetch(
            self.http
                .post(url.as_ref())
                .json(&VerifyCredentialsPayload { email, password }),
            "POST /usuarios/verificar",
        )
        .await
    }
}

#[derive(Error, Debug)]
pub enum ServitechFetchError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("NotFound")]
    NotFound,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Other: {0}")]
    Other(String),
}
