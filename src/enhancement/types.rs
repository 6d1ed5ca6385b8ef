use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AnalysisResults, Recommendations};

// ---------------------------------------------------------------------------
// Retrieval contract
// ---------------------------------------------------------------------------

/// Body of `POST {RAG_API_URL}/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    pub query: String,
    pub max_results: u32,
    pub include_metadata: bool,
}

/// Response of `POST {RAG_API_URL}/query`.
///
/// `results` stays optional so a missing field can be told apart from an
/// empty list; both count as no result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResponse {
    #[serde(default)]
    pub results: Option<Vec<RetrievalResult>>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub content: String,
    #[serde(default)]
    pub metadata: ResultMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

// ---------------------------------------------------------------------------
// InsightSlot
// ---------------------------------------------------------------------------

/// Fixed fan-out slots, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSlot {
    Thyroid,
    Metabolic,
    Nutritional,
    Hormonal,
    General,
}

impl InsightSlot {
    pub const ALL: [InsightSlot; 5] = [
        Self::Thyroid,
        Self::Metabolic,
        Self::Nutritional,
        Self::Hormonal,
        Self::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Thyroid => "Thyroid",
            Self::Metabolic => "Metabolic",
            Self::Nutritional => "Nutritional",
            Self::Hormonal => "Hormonal",
            Self::General => "General",
        }
    }
}

// ---------------------------------------------------------------------------
// RayPeatInsight
// ---------------------------------------------------------------------------

/// Parsed result of one enrichment query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayPeatInsight {
    pub query: String,
    #[serde(rename = "relevantConcepts")]
    pub relevant_concepts: Vec<String>,
    pub explanation: String,
    pub contraindications: Vec<String>,
    pub safety_alerts: Vec<String>,
    /// Always within [0, 1].
    pub confidence_score: f64,
    pub source_documents: Vec<String>,
}

/// One optional insight per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancementInsights {
    pub thyroid: Option<RayPeatInsight>,
    pub metabolic: Option<RayPeatInsight>,
    pub nutritional: Option<RayPeatInsight>,
    pub hormonal: Option<RayPeatInsight>,
    pub general: Option<RayPeatInsight>,
}

impl EnhancementInsights {
    pub fn get(&self, slot: InsightSlot) -> Option<&RayPeatInsight> {
        match slot {
            InsightSlot::Thyroid => self.thyroid.as_ref(),
            InsightSlot::Metabolic => self.metabolic.as_ref(),
            InsightSlot::Nutritional => self.nutritional.as_ref(),
            InsightSlot::Hormonal => self.hormonal.as_ref(),
            InsightSlot::General => self.general.as_ref(),
        }
    }

    pub fn set(&mut self, slot: InsightSlot, insight: Option<RayPeatInsight>) {
        let target = match slot {
            InsightSlot::Thyroid => &mut self.thyroid,
            InsightSlot::Metabolic => &mut self.metabolic,
            InsightSlot::Nutritional => &mut self.nutritional,
            InsightSlot::Hormonal => &mut self.hormonal,
            InsightSlot::General => &mut self.general,
        };
        *target = insight;
    }

    /// Populated slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (InsightSlot, &RayPeatInsight)> {
        InsightSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|i| (slot, i)))
    }

    pub fn populated(&self) -> usize {
        self.iter().count()
    }
}

// ---------------------------------------------------------------------------
// EnhancementStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementStatus {
    Success,
    Partial,
    Failed,
    Disabled,
}

impl EnhancementStatus {
    /// Status from the number of populated slots out of the five.
    pub fn from_populated(populated: usize) -> Self {
        match populated {
            0 => Self::Failed,
            n if n >= InsightSlot::ALL.len() => Self::Success,
            _ => Self::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Disabled => "disabled",
        }
    }
}

// ---------------------------------------------------------------------------
// EnhancedAnalysisResults
// ---------------------------------------------------------------------------

/// Deterministic buckets plus the enrichment-only lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedRecommendations {
    #[serde(flatten)]
    pub base: Recommendations,
    pub bioenergetic: Vec<String>,
    pub contraindications: Vec<String>,
    pub safety_alerts: Vec<String>,
}

/// Baseline analysis plus optional enrichment.
///
/// `analysis` is exactly what the deterministic engine produced; enrichment
/// only ever adds to the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedAnalysisResults {
    pub analysis: AnalysisResults,
    pub insights: EnhancementInsights,
    pub enhanced_recommendations: EnhancedRecommendations,
    pub enhancement_status: EnhancementStatus,
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// ServiceHealth
// ---------------------------------------------------------------------------

/// Reported state of the retrieval service. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServiceHealth {
    Healthy,
    Unhealthy { code: u16 },
    Unreachable { error: String },
    Disabled,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}
