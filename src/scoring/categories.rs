use std::collections::BTreeMap;

use crate::models::enums::HealthCategory;
use crate::models::{BiomarkerAnalysis, CategoryScores};

use super::reference::{RangeCatalog, ScoringWeights};

/// Score given to a category when none of its markers were measured.
pub const ABSENT_CATEGORY_SCORE: f64 = 100.0;

/// Round to one decimal place for reporting.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean of `100 - impact` over the category markers present in the input.
/// Absence is not penalized.
pub fn category_score(markers: &[String], analyses: &BTreeMap<String, BiomarkerAnalysis>) -> f64 {
    let present: Vec<f64> = markers
        .iter()
        .filter_map(|key| analyses.get(key))
        .map(|a| 100.0 - f64::from(a.impact))
        .collect();

    if present.is_empty() {
        return ABSENT_CATEGORY_SCORE;
    }
    present.iter().sum::<f64>() / present.len() as f64
}

/// Unrounded scores for all four categories.
fn raw_scores(
    catalog: &RangeCatalog,
    analyses: &BTreeMap<String, BiomarkerAnalysis>,
) -> CategoryScores {
    let mut scores = CategoryScores::default();
    for category in HealthCategory::ALL {
        scores.set(
            category,
            category_score(catalog.category_markers(category), analyses),
        );
    }
    scores
}

/// Weighted sum of category scores.
pub fn overall_score(weights: &ScoringWeights, scores: &CategoryScores) -> f64 {
    HealthCategory::ALL
        .iter()
        .map(|c| weights.get(*c) * scores.get(*c))
        .sum()
}

/// Category scores and the overall score, both rounded to one decimal.
///
/// The overall score is computed from unrounded category means so rounding
/// error never compounds.
pub fn score(
    catalog: &RangeCatalog,
    analyses: &BTreeMap<String, BiomarkerAnalysis>,
) -> (CategoryScores, f64) {
    let raw = raw_scores(catalog, analyses);
    let overall = overall_score(catalog.weights(), &raw);

    let mut rounded = raw;
    for category in HealthCategory::ALL {
        rounded.set(category, round1(raw.get(category)));
    }
    (rounded, round1(overall))
}
