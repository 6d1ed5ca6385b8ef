use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::biomarker::BiomarkerAnalysis;
use super::enums::{
    FindingType, HealthCategory, PatternSeverity, PatternType, RecommendationBucket, Severity,
};

// ---------------------------------------------------------------------------
// MetabolicPattern
// ---------------------------------------------------------------------------

/// A cross-marker heuristic finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetabolicPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub name: String,
    pub severity: PatternSeverity,
    /// Matched indicators over possible indicators for the rule.
    pub confidence: f64,
    /// Labels of the indicators that matched, in rule order.
    pub indicators: Vec<String>,
    pub recommendations: Vec<String>,
    pub priority: u8,
}

// ---------------------------------------------------------------------------
// CriticalFinding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalFinding {
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub title: String,
    pub impact: u8,
    pub severity: Severity,
    pub biomarkers: Vec<String>,
    /// 1-based rank in the returned list.
    pub priority: usize,
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub thyroid: f64,
    pub metabolic: f64,
    pub inflammation: f64,
    pub nutrients: f64,
}

impl CategoryScores {
    pub fn get(&self, category: HealthCategory) -> f64 {
        match category {
            HealthCategory::Thyroid => self.thyroid,
            HealthCategory::Metabolic => self.metabolic,
            HealthCategory::Inflammation => self.inflammation,
            HealthCategory::Nutrients => self.nutrients,
        }
    }

    pub fn set(&mut self, category: HealthCategory, score: f64) {
        match category {
            HealthCategory::Thyroid => self.thyroid = score,
            HealthCategory::Metabolic => self.metabolic = score,
            HealthCategory::Inflammation => self.inflammation = score,
            HealthCategory::Nutrients => self.nutrients = score,
        }
    }
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self {
            thyroid: 100.0,
            metabolic: 100.0,
            inflammation: 100.0,
            nutrients: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Deduplicated recommendation strings, one bucket per string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub lifestyle: Vec<String>,
    pub supplements: Vec<String>,
    pub monitoring: Vec<String>,
}

impl Recommendations {
    pub fn bucket(&self, bucket: RecommendationBucket) -> &[String] {
        match bucket {
            RecommendationBucket::Immediate => &self.immediate,
            RecommendationBucket::ShortTerm => &self.short_term,
            RecommendationBucket::Lifestyle => &self.lifestyle,
            RecommendationBucket::Supplements => &self.supplements,
            RecommendationBucket::Monitoring => &self.monitoring,
        }
    }

    pub fn bucket_mut(&mut self, bucket: RecommendationBucket) -> &mut Vec<String> {
        match bucket {
            RecommendationBucket::Immediate => &mut self.immediate,
            RecommendationBucket::ShortTerm => &mut self.short_term,
            RecommendationBucket::Lifestyle => &mut self.lifestyle,
            RecommendationBucket::Supplements => &mut self.supplements,
            RecommendationBucket::Monitoring => &mut self.monitoring,
        }
    }

    pub fn total(&self) -> usize {
        self.immediate.len()
            + self.short_term.len()
            + self.lifestyle.len()
            + self.supplements.len()
            + self.monitoring.len()
    }
}

// ---------------------------------------------------------------------------
// AnalysisResults
// ---------------------------------------------------------------------------

/// Deterministic output of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub overall_score: f64,
    pub category_scores: CategoryScores,
    pub biomarkers: BTreeMap<String, BiomarkerAnalysis>,
    pub patterns: Vec<MetabolicPattern>,
    pub critical_findings: Vec<CriticalFinding>,
    pub recommendations: Recommendations,
}
