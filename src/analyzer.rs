//! Entry point for callers: deterministic scoring, optionally enriched by the
//! retrieval service.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::EnhancementConfig;
use crate::enhancement::client::{HttpRetrievalClient, RetrievalClient};
use crate::enhancement::health::{check_service_health, ServiceStatusReport};
use crate::enhancement::orchestrator::{disabled_result, EnhancementOrchestrator};
use crate::enhancement::types::EnhancedAnalysisResults;
use crate::enhancement::RetrievalError;
use crate::models::{AnalysisResults, BiomarkerData};
use crate::scoring::engine::AnalysisEngine;
use crate::scoring::reference::RangeCatalog;
use crate::scoring::AnalysisError;

pub struct BiomarkerAnalyzer {
    engine: AnalysisEngine,
    config: EnhancementConfig,
    /// `None` when enhancement is disabled.
    orchestrator: Option<EnhancementOrchestrator>,
}

impl BiomarkerAnalyzer {
    /// Build with the HTTP retrieval client described by `config`. No client
    /// is constructed when enhancement is disabled.
    pub fn from_config(
        catalog: Arc<RangeCatalog>,
        config: EnhancementConfig,
    ) -> Result<Self, RetrievalError> {
        let client: Option<Arc<dyn RetrievalClient>> = if config.enabled {
            Some(Arc::new(HttpRetrievalClient::from_config(&config)?))
        } else {
            None
        };
        Ok(Self::assemble(catalog, config, client))
    }

    /// Build around an existing client, e.g. a mock.
    pub fn with_client(
        catalog: Arc<RangeCatalog>,
        config: EnhancementConfig,
        client: Arc<dyn RetrievalClient>,
    ) -> Self {
        Self::assemble(catalog, config, Some(client))
    }

    /// Scoring only.
    pub fn offline(catalog: Arc<RangeCatalog>) -> Self {
        let config = EnhancementConfig {
            enabled: false,
            ..EnhancementConfig::default()
        };
        Self::assemble(catalog, config, None)
    }

    fn assemble(
        catalog: Arc<RangeCatalog>,
        config: EnhancementConfig,
        client: Option<Arc<dyn RetrievalClient>>,
    ) -> Self {
        let orchestrator = client
            .filter(|_| config.enabled)
            .map(|client| EnhancementOrchestrator::new(client, catalog.clone(), &config));

        Self {
            engine: AnalysisEngine::new(catalog),
            config,
            orchestrator,
        }
    }

    pub fn config(&self) -> &EnhancementConfig {
        &self.config
    }

    /// Deterministic analysis. Never touches the network.
    pub fn analyze(&self, data: &BiomarkerData) -> Result<AnalysisResults, AnalysisError> {
        self.engine.analyze(data)
    }

    /// Analysis plus retrieval insights. Only input errors fail the call;
    /// retrieval problems show up as empty slots and a degraded status.
    pub async fn analyze_enhanced(
        &self,
        data: &BiomarkerData,
    ) -> Result<EnhancedAnalysisResults, AnalysisError> {
        let baseline = self.engine.analyze(data)?;
        Ok(match &self.orchestrator {
            Some(orchestrator) => orchestrator.enhance(baseline).await,
            None => disabled_result(baseline),
        })
    }

    /// As [`analyze_enhanced`](Self::analyze_enhanced), abandoning outstanding
    /// queries once `cancel` turns `true`.
    pub async fn analyze_enhanced_with_cancel(
        &self,
        data: &BiomarkerData,
        cancel: watch::Receiver<bool>,
    ) -> Result<EnhancedAnalysisResults, AnalysisError> {
        let baseline = self.engine.analyze(data)?;
        Ok(match &self.orchestrator {
            Some(orchestrator) => orchestrator.enhance_with_cancel(baseline, cancel).await,
            None => disabled_result(baseline),
        })
    }

    pub async fn service_health(&self) -> ServiceStatusReport {
        let client = self.orchestrator.as_ref().map(|o| o.client());
        check_service_health(&self.config, client).await
    }
}
