//! Retrieval service client.
//!
//! `RetrievalClient` is the seam between the orchestrator and the network:
//! the HTTP implementation talks to `{RAG_API_URL}/query` and `/health`,
//! tests substitute in-process mocks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::types::{RetrievalRequest, RetrievalResponse, ServiceHealth};
use super::RetrievalError;
use crate::config::EnhancementConfig;

/// Timeout for health probes, independent of the query timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Query/response contract of the knowledge-retrieval service.
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Run one retrieval query. No retries.
    async fn query(&self, request: &RetrievalRequest) -> Result<RetrievalResponse, RetrievalError>;

    /// Probe service availability.
    async fn health(&self) -> ServiceHealth;
}

/// HTTP client for the retrieval service.
pub struct HttpRetrievalClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRetrievalClient {
    pub fn new(base_url: &str) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RetrievalError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &EnhancementConfig) -> Result<Self, RetrievalError> {
        Self::new(&config.api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> RetrievalError {
        if e.is_connect() {
            RetrievalError::Connection(self.base_url.clone())
        } else {
            RetrievalError::HttpClient(e.to_string())
        }
    }
}

#[async_trait]
impl RetrievalClient for HttpRetrievalClient {
    async fn query(&self, request: &RetrievalRequest) -> Result<RetrievalResponse, RetrievalError> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<RetrievalResponse>()
            .await
            .map_err(|e| RetrievalError::ResponseParsing(e.to_string()))
    }

    async fn health(&self) -> ServiceHealth {
        let url = format!("{}/health", self.base_url);

        match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => ServiceHealth::Healthy,
            Ok(resp) => ServiceHealth::Unhealthy {
                code: resp.status().as_u16(),
            },
            Err(e) => ServiceHealth::Unreachable {
                error: self.map_send_error(e).to_string(),
            },
        }
    }
}
