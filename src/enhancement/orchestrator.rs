use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::watch;
use uuid::Uuid;

use super::client::RetrievalClient;
use super::parse::parse_insight;
use super::queries::{plan_queries, PlannedQuery};
use super::types::{
    EnhancedAnalysisResults, EnhancedRecommendations, EnhancementInsights, EnhancementStatus,
    InsightSlot, RayPeatInsight, RetrievalRequest,
};
use super::RetrievalError;
use crate::config::EnhancementConfig;
use crate::models::{AnalysisResults, Recommendations};
use crate::scoring::recommendations::dedup_preserving_order;
use crate::scoring::reference::RangeCatalog;

/// Fans targeted queries out to the retrieval service and folds the answers
/// into an enhanced result.
///
/// Every query runs concurrently under its own timeout and settles to either
/// an insight or `None`; one slow or failing query never affects the others.
/// The baseline analysis is carried through untouched.
pub struct EnhancementOrchestrator {
    client: Arc<dyn RetrievalClient>,
    catalog: Arc<RangeCatalog>,
    config: EnhancementConfig,
}

impl EnhancementOrchestrator {
    pub fn new(
        client: Arc<dyn RetrievalClient>,
        catalog: Arc<RangeCatalog>,
        config: &EnhancementConfig,
    ) -> Self {
        Self {
            client,
            catalog,
            config: config.clone(),
        }
    }

    pub fn client(&self) -> &dyn RetrievalClient {
        self.client.as_ref()
    }

    /// Enrich a baseline result.
    pub async fn enhance(&self, analysis: AnalysisResults) -> EnhancedAnalysisResults {
        self.run(analysis, None).await
    }

    /// Enrich a baseline result, abandoning outstanding queries once `cancel`
    /// turns `true`. A cancelled request keeps no insight at all, including
    /// slots that settled before the signal.
    pub async fn enhance_with_cancel(
        &self,
        analysis: AnalysisResults,
        cancel: watch::Receiver<bool>,
    ) -> EnhancedAnalysisResults {
        self.run(analysis, Some(cancel)).await
    }

    async fn run(
        &self,
        analysis: AnalysisResults,
        cancel: Option<watch::Receiver<bool>>,
    ) -> EnhancedAnalysisResults {
        let start = Instant::now();
        let request_id = Uuid::new_v4();

        let planned = plan_queries(&analysis, &self.catalog);
        let query_count = planned.len();

        let settled = join_all(
            planned
                .into_iter()
                .map(|query| self.run_query(request_id, query, cancel.clone())),
        )
        .await;

        let mut insights = EnhancementInsights::default();
        if is_cancelled(cancel.as_ref()) {
            // Aborted requests keep nothing, even slots that settled in time.
            tracing::info!(request_id = %request_id, "Enhancement cancelled");
        } else {
            for (slot, insight) in settled {
                insights.set(slot, insight);
            }
        }

        let populated = insights.populated();
        let enhancement_status = EnhancementStatus::from_populated(populated);
        let enhanced_recommendations = merge_recommendations(&analysis.recommendations, &insights);

        tracing::info!(
            request_id = %request_id,
            queries = query_count,
            populated,
            status = enhancement_status.as_str(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Enhancement complete"
        );

        EnhancedAnalysisResults {
            analysis,
            insights,
            enhanced_recommendations,
            enhancement_status,
            request_id,
            timestamp: Utc::now(),
        }
    }

    /// One slot: query under timeout and cancellation, then parse.
    async fn run_query(
        &self,
        request_id: Uuid,
        planned: PlannedQuery,
        cancel: Option<watch::Receiver<bool>>,
    ) -> (InsightSlot, Option<RayPeatInsight>) {
        let request = RetrievalRequest {
            query: planned.text,
            max_results: self.config.max_results,
            include_metadata: true,
        };
        let outcome = tokio::select! {
            result = tokio::time::timeout(self.config.timeout, self.client.query(&request)) => {
                result.unwrap_or(Err(RetrievalError::Timeout(self.config.timeout_ms())))
            }
            () = cancelled(cancel) => Err(RetrievalError::Cancelled),
        };

        let insight = match outcome {
            Ok(response) => {
                let insight = parse_insight(&request.query, response);
                if insight.is_none() {
                    tracing::debug!(
                        request_id = %request_id,
                        slot = planned.slot.label(),
                        "Retrieval returned no results"
                    );
                }
                insight
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    slot = planned.slot.label(),
                    error = %e,
                    "Retrieval query failed"
                );
                None
            }
        };

        (planned.slot, insight)
    }
}

/// Resolves once the cancel flag is `true`; never resolves without a flag or
/// after the sender is gone.
async fn cancelled(cancel: Option<watch::Receiver<bool>>) {
    if let Some(mut rx) = cancel {
        if rx.wait_for(|flag| *flag).await.is_ok() {
            return;
        }
    }
    std::future::pending::<()>().await
}

fn is_cancelled(cancel: Option<&watch::Receiver<bool>>) -> bool {
    cancel.is_some_and(|rx| *rx.borrow())
}

/// Result for a request where enhancement is switched off.
pub fn disabled_result(analysis: AnalysisResults) -> EnhancedAnalysisResults {
    let enhanced_recommendations = EnhancedRecommendations {
        base: analysis.recommendations.clone(),
        ..Default::default()
    };
    EnhancedAnalysisResults {
        analysis,
        insights: EnhancementInsights::default(),
        enhanced_recommendations,
        enhancement_status: EnhancementStatus::Disabled,
        request_id: Uuid::new_v4(),
        timestamp: Utc::now(),
    }
}

/// Append insight text to the deterministic buckets. The base buckets are
/// copied as-is, never reordered.
pub fn merge_recommendations(
    base: &Recommendations,
    insights: &EnhancementInsights,
) -> EnhancedRecommendations {
    let bioenergetic = dedup_preserving_order(
        insights
            .iter()
            .filter(|(_, insight)| !insight.explanation.is_empty())
            .map(|(slot, insight)| format!("{}: {}", slot.label(), insight.explanation)),
    );
    let contraindications = dedup_preserving_order(
        insights
            .iter()
            .flat_map(|(_, insight)| insight.contraindications.iter().cloned()),
    );
    let safety_alerts = dedup_preserving_order(
        insights
            .iter()
            .flat_map(|(_, insight)| insight.safety_alerts.iter().cloned()),
    );

    EnhancedRecommendations {
        base: base.clone(),
        bioenergetic,
        contraindications,
        safety_alerts,
    }
}
