//! REST adapter for the boat data service.
//!
//! Thin `reqwest` wrapper implementing all three service traits. Response
//! handling is split into pure functions (`parse_list`, `parse_rejection`)
//! so it can be tested without a server.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::{BoatQueryService, BoatTypeService, BoatUpdateService, ErrorBody, ServiceError};
use crate::config::AppConfig;
use crate::model::{BoatRecord, BoatType, RecordInput};

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBoatDataService {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBoatDataService {
    /// # Errors
    ///
    /// Returns [`ServiceError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.clone(), token: config.api_token.clone() })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, String), ServiceError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok((status, text))
    }
}

#[async_trait::async_trait]
impl BoatTypeService for HttpBoatDataService {
    async fn get_boat_types(&self) -> Result<Vec<BoatType>, ServiceError> {
        let url = boat_types_url(&self.base_url);
        let (status, text) = self.send(self.http.get(&url)).await?;
        debug!(%url, status = status.as_u16(), "boat types response");
        parse_list(status, &text)
    }
}

#[async_trait::async_trait]
impl BoatQueryService for HttpBoatDataService {
    async fn get_boats(&self, boat_type_id: &str) -> Result<Vec<BoatRecord>, ServiceError> {
        let url = boats_url(&self.base_url);
        let request = self.http.get(&url).query(&[("boatTypeId", boat_type_id)]);
        let (status, text) = self.send(request).await?;
        debug!(%url, %boat_type_id, status = status.as_u16(), "boats response");
        parse_list(status, &text)
    }
}

#[async_trait::async_trait]
impl BoatUpdateService for HttpBoatDataService {
    async fn update_record(&self, input: RecordInput) -> Result<(), ServiceError> {
        let url = boat_record_url(&self.base_url, &input.id);
        let body = update_body(input.fields);
        let (status, text) = self.send(self.http.patch(&url).json(&body)).await?;
        debug!(%url, status = status.as_u16(), "record update response");
        if status.is_success() {
            return Ok(());
        }
        Err(parse_rejection(status, &text))
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

fn boat_types_url(base: &str) -> String {
    format!("{base}/boat-types")
}

fn boats_url(base: &str) -> String {
    format!("{base}/boats")
}

fn boat_record_url(base: &str, id: &str) -> String {
    format!("{base}/boats/{id}")
}

fn update_body(fields: Map<String, Value>) -> Value {
    serde_json::json!({ "fields": fields })
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_list<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<Vec<T>, ServiceError> {
    if !status.is_success() {
        return Err(parse_rejection(status, text));
    }
    serde_json::from_str(text).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// A non-2xx body that is not a recognized error shape still counts as a
/// rejection, with no message.
fn parse_rejection(status: StatusCode, text: &str) -> ServiceError {
    let body = serde_json::from_str::<ErrorBody>(text).unwrap_or(ErrorBody::Single { message: None });
    ServiceError::Rejected { status: status.as_u16(), body }
}
