//! In-process retrieval client for tests and offline runs.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::client::RetrievalClient;
use super::types::{
    ResultMetadata, RetrievalRequest, RetrievalResponse, RetrievalResult, ServiceHealth,
};
use super::RetrievalError;

/// What the mock does for one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(RetrievalResponse),
    Fail(RetrievalError),
    /// Sleep, then respond. Used to exercise timeouts and cancellation.
    Delay(Duration, RetrievalResponse),
}

type Responder = dyn Fn(&RetrievalRequest) -> MockReply + Send + Sync;

/// Configurable mock of the retrieval service.
pub struct MockRetrievalClient {
    responder: Box<Responder>,
    health: ServiceHealth,
    call_count: AtomicU32,
}

impl MockRetrievalClient {
    /// Decide the reply per request.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RetrievalRequest) -> MockReply + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            health: ServiceHealth::Healthy,
            call_count: AtomicU32::new(0),
        }
    }

    /// Same reply for every request.
    pub fn always(reply: MockReply) -> Self {
        Self::new(move |_| reply.clone())
    }

    pub fn with_health(mut self, health: ServiceHealth) -> Self {
        self.health = health;
        self
    }

    /// Number of queries received.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// A well-formed single-result response.
    pub fn sample_response(content: &str) -> RetrievalResponse {
        RetrievalResponse {
            results: Some(vec![RetrievalResult {
                content: content.to_string(),
                metadata: ResultMetadata {
                    concept: Some("energy metabolism".into()),
                    source: Some("newsletter".into()),
                },
            }]),
            confidence_score: Some(0.8),
        }
    }
}

#[async_trait]
impl RetrievalClient for MockRetrievalClient {
    async fn query(&self, request: &RetrievalRequest) -> Result<RetrievalResponse, RetrievalError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match (self.responder)(request) {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(error) => Err(error),
            MockReply::Delay(delay, response) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
        }
    }

    async fn health(&self) -> ServiceHealth {
        self.health.clone()
    }
}
