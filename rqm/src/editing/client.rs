//! HTTP transport for edit requests

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;

use super::error::EditError;
use super::request::{EditRequest, Method};
use crate::config::ServerConfig;

/// Status and body of a successful response, uninterpreted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one edit request
///
/// Implementations perform exactly one call per `send`; retrying is left to
/// the scheduler.
#[async_trait]
pub trait EditTransport: Send + Sync {
    async fn send(&self, request: &EditRequest) -> Result<RawResponse, EditError>;
}

/// reqwest-backed transport against a MusicBrainz server
///
/// The session (cookies) is assumed to be established out of band.
pub struct HttpEditClient {
    base_url: Url,
    http: Client,
}

impl HttpEditClient {
    /// Create a new client from configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, EditError> {
        debug!(?config, "HttpEditClient::from_config: called");
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| EditError::InvalidRequest(format!("bad base url {}: {}", config.base_url, e)))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(EditError::Network)?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl EditTransport for HttpEditClient {
    async fn send(&self, request: &EditRequest) -> Result<RawResponse, EditError> {
        let url = request.url(&self.base_url)?;
        debug!(%url, method = %request.method, fields = request.form.len(), "HttpEditClient::send: called");

        let builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url).form(&request.form),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&status) {
            debug!(status, "HttpEditClient::send: error status");
            return Err(EditError::Status { status, body });
        }

        debug!(status, bytes = body.len(), "HttpEditClient::send: ok");
        Ok(RawResponse { status, body })
    }
}
