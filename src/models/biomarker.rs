use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::{BiomarkerStatus, Severity};

/// Raw laboratory input: biomarker key to measured value.
///
/// Ordered so every key-order dependent step of the analysis is deterministic.
pub type BiomarkerData = BTreeMap<String, f64>;

/// Optimal reference interval for one biomarker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalRange {
    pub display_name: String,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub description: String,
}

impl OptimalRange {
    /// Inclusive on both bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Evaluated result for a single biomarker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomarkerAnalysis {
    pub key: String,
    pub value: f64,
    pub optimal_range: OptimalRange,
    pub status: BiomarkerStatus,
    pub severity: Severity,
    /// 0 when optimal, otherwise the severity tier impact.
    pub impact: u8,
    /// Percent distance from the violated bound; 0 when optimal.
    pub deviation_percent: f64,
    pub recommendations: Vec<String>,
}

impl BiomarkerAnalysis {
    pub fn is_optimal(&self) -> bool {
        self.status == BiomarkerStatus::Optimal
    }
}
