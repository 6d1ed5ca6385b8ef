use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::models::{AnalysisResults, BiomarkerData};

use super::categories::score;
use super::evaluator::evaluate_all;
use super::findings::rank_findings;
use super::patterns::detect_patterns;
use super::recommendations::synthesize;
use super::reference::RangeCatalog;
use super::AnalysisError;

/// Deterministic analysis pipeline.
///
/// evaluate → score → detect patterns → rank findings → synthesize.
/// No I/O and no mutable state; safe to share across threads.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    catalog: Arc<RangeCatalog>,
}

impl AnalysisEngine {
    pub fn new(catalog: Arc<RangeCatalog>) -> Self {
        Self { catalog }
    }

    /// Run the full deterministic analysis.
    ///
    /// Fails only when an input key is not in the catalog or a value is not
    /// finite.
    pub fn analyze(&self, data: &BiomarkerData) -> Result<AnalysisResults, AnalysisError> {
        let start = Instant::now();

        let biomarkers: BTreeMap<String, _> = evaluate_all(&self.catalog, data)?
            .into_iter()
            .map(|a| (a.key.clone(), a))
            .collect();

        let (category_scores, overall_score) = score(&self.catalog, &biomarkers);
        let patterns = detect_patterns(&biomarkers);
        let critical_findings = rank_findings(&biomarkers);
        let recommendations = synthesize(&biomarkers, &patterns);

        tracing::info!(
            biomarkers = biomarkers.len(),
            overall_score,
            patterns = patterns.len(),
            findings = critical_findings.len(),
            recommendations = recommendations.total(),
            processing_us = start.elapsed().as_micros() as u64,
            "Biomarker analysis complete"
        );

        Ok(AnalysisResults {
            overall_score,
            category_scores,
            biomarkers,
            patterns,
            critical_findings,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{BiomarkerStatus, PatternType};

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(Arc::new(RangeCatalog::builtin().unwrap()))
    }

    fn data(pairs: &[(&str, f64)]) -> BiomarkerData {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn empty_input_is_perfect_score() {
        let results = engine().analyze(&BiomarkerData::new()).unwrap();
        assert_eq!(results.overall_score, 100.0);
        assert!(results.biomarkers.is_empty());
        assert!(results.patterns.is_empty());
        assert!(results.critical_findings.is_empty());
        assert_eq!(results.recommendations.total(), 0);
    }

    #[test]
    fn hypothyroid_scenario() {
        let results = engine()
            .analyze(&data(&[("tsh", 4.5), ("freeT3", 2.0), ("reverseT3", 30.0)]))
            .unwrap();

        assert!(results
            .biomarkers
            .values()
            .all(|a| a.status != BiomarkerStatus::Optimal));
        let hypo = results
            .patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::Hypothyroid)
            .unwrap();
        assert!(hypo.confidence >= 2.0 / 3.0);
        assert!(results.category_scores.thyroid < 100.0);
        assert!(results.overall_score < 100.0);
    }

    #[test]
    fn overall_matches_weighted_categories() {
        let results = engine()
            .analyze(&data(&[
                ("tsh", 2.3),
                ("freeT3", 3.5),
                ("glucose", 98.0),
                ("insulin", 9.0),
                ("crp", 2.5),
                ("vitaminD", 42.0),
                ("ferritin", 30.0),
            ]))
            .unwrap();
        let s = results.category_scores;
        let expected =
            0.4 * s.thyroid + 0.3 * s.metabolic + 0.15 * s.inflammation + 0.15 * s.nutrients;
        assert!((results.overall_score - expected).abs() <= 1.0);
    }

    #[test]
    fn unknown_biomarker_aborts_request() {
        let err = engine()
            .analyze(&data(&[("tsh", 1.0), ("mystery", 3.0)]))
            .unwrap_err();
        assert_eq!(err, AnalysisError::UnknownBiomarker("mystery".into()));
    }

    #[test]
    fn analysis_is_deterministic() {
        let input = data(&[("tsh", 3.1), ("glucose", 101.0), ("b12", 350.0), ("zinc", 70.0)]);
        let e = engine();
        assert_eq!(e.analyze(&input).unwrap(), e.analyze(&input).unwrap());
    }
}
