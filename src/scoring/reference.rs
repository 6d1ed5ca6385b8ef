use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::enums::{BiomarkerStatus, HealthCategory};
use crate::models::OptimalRange;

use super::ConfigError;

/// File name of the catalog inside a resources directory.
pub const CATALOG_FILE: &str = "optimal_ranges.json";

const BUILTIN_CATALOG: &str = include_str!("../../resources/optimal_ranges.json");

/// Weights must sum to 1.0 within this tolerance.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Category weights for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub thyroid: f64,
    pub metabolic: f64,
    pub inflammation: f64,
    pub nutrients: f64,
}

impl ScoringWeights {
    pub fn get(&self, category: HealthCategory) -> f64 {
        match category {
            HealthCategory::Thyroid => self.thyroid,
            HealthCategory::Metabolic => self.metabolic,
            HealthCategory::Inflammation => self.inflammation,
            HealthCategory::Nutrients => self.nutrients,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut sum = 0.0;
        for category in HealthCategory::ALL {
            let weight = self.get(category);
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::Invariant(format!(
                    "weight for {category} must be within [0, 1], got {weight}"
                )));
            }
            sum += weight;
        }
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Invariant(format!(
                "category weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            thyroid: 0.4,
            metabolic: 0.3,
            inflammation: 0.15,
            nutrients: 0.15,
        }
    }
}

/// On-disk shape of the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    ranges: BTreeMap<String, OptimalRange>,
    categories: BTreeMap<HealthCategory, Vec<String>>,
    weights: ScoringWeights,
    #[serde(default)]
    recommendations: BTreeMap<String, BTreeMap<BiomarkerStatus, Vec<String>>>,
}

/// Immutable optimal-range table, category membership and scoring weights.
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
/// Every constructor validates, so holding a `RangeCatalog` means the
/// invariants hold.
#[derive(Debug, Clone)]
pub struct RangeCatalog {
    ranges: BTreeMap<String, OptimalRange>,
    categories: BTreeMap<HealthCategory, Vec<String>>,
    weights: ScoringWeights,
    recommendations: BTreeMap<String, BTreeMap<BiomarkerStatus, Vec<String>>>,
}

impl RangeCatalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_CATALOG, "builtin")
    }

    /// Load a catalog from `optimal_ranges.json` in a resources directory.
    pub fn load(resources_dir: &Path) -> Result<Self, ConfigError> {
        let path = resources_dir.join(CATALOG_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::CatalogLoad(path.display().to_string(), e.to_string())
        })?;
        Self::from_json(&json, &path.display().to_string())
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| ConfigError::CatalogParse(origin.to_string(), e.to_string()))?;

        let catalog = Self {
            ranges: file.ranges,
            categories: file.categories,
            weights: file.weights,
            recommendations: file.recommendations,
        };
        catalog.validate()?;

        tracing::debug!(
            origin,
            ranges = catalog.ranges.len(),
            "Range catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from parts (tests and embedders).
    pub fn from_parts(
        ranges: BTreeMap<String, OptimalRange>,
        categories: BTreeMap<HealthCategory, Vec<String>>,
        weights: ScoringWeights,
        recommendations: BTreeMap<String, BTreeMap<BiomarkerStatus, Vec<String>>>,
    ) -> Result<Self, ConfigError> {
        let catalog = Self {
            ranges,
            categories,
            weights,
            recommendations,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, range) in &self.ranges {
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(ConfigError::Invariant(format!(
                    "range for {key} has non-finite bounds"
                )));
            }
            if range.min >= range.max {
                return Err(ConfigError::Invariant(format!(
                    "range for {key} requires min < max, got {} >= {}",
                    range.min, range.max
                )));
            }
        }

        for category in HealthCategory::ALL {
            let markers = self.categories.get(&category).ok_or_else(|| {
                ConfigError::Invariant(format!("category {category} has no marker list"))
            })?;
            if let Some(missing) = markers.iter().find(|m| !self.ranges.contains_key(*m)) {
                return Err(ConfigError::Invariant(format!(
                    "category {category} references unknown biomarker {missing}"
                )));
            }
        }

        self.weights.validate()?;

        if let Some(missing) = self
            .recommendations
            .keys()
            .find(|k| !self.ranges.contains_key(*k))
        {
            return Err(ConfigError::Invariant(format!(
                "recommendations reference unknown biomarker {missing}"
            )));
        }

        Ok(())
    }

    pub fn range(&self, key: &str) -> Option<&OptimalRange> {
        self.ranges.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ranges.contains_key(key)
    }

    /// Marker keys scored under a category, in catalog order.
    pub fn category_markers(&self, category: HealthCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Static recommendations for a marker in a given status.
    /// Unmapped combinations yield an empty slice.
    pub fn recommendations_for(&self, key: &str, status: BiomarkerStatus) -> &[String] {
        self.recommendations
            .get(key)
            .and_then(|by_status| by_status.get(&status))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
