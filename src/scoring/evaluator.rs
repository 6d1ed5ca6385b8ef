use crate::models::enums::{BiomarkerStatus, Severity};
use crate::models::{BiomarkerAnalysis, BiomarkerData, OptimalRange};

use super::reference::RangeCatalog;
use super::AnalysisError;

/// Deviation thresholds (percent, exclusive) for each severity tier.
const CRITICAL_DEVIATION_PCT: f64 = 50.0;
const HIGH_DEVIATION_PCT: f64 = 25.0;
const MEDIUM_DEVIATION_PCT: f64 = 10.0;

/// Outcome of placing one value against its optimal range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub status: BiomarkerStatus,
    pub severity: Severity,
    pub impact: u8,
    pub deviation_percent: f64,
}

/// Map a percentage deviation to its severity tier.
pub fn severity_for_deviation(deviation_percent: f64) -> Severity {
    if deviation_percent > CRITICAL_DEVIATION_PCT {
        Severity::Critical
    } else if deviation_percent > HIGH_DEVIATION_PCT {
        Severity::High
    } else if deviation_percent > MEDIUM_DEVIATION_PCT {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Decimal places kept on a deviation before tier comparison. Decimal inputs
/// sitting exactly on a tier boundary must compare equal to it.
const DEVIATION_DECIMALS: i32 = 9;

/// Stored in place of an unbounded deviation; JSON has no infinity.
pub const UNBOUNDED_DEVIATION: f64 = f64::MAX;

fn round_deviation(pct: f64) -> f64 {
    let scale = 10f64.powi(DEVIATION_DECIMALS);
    let scaled = (pct * scale).round();
    if scaled.is_finite() {
        scaled / scale
    } else {
        pct
    }
}

/// Percent distance of `value` from `bound`. A zero bound makes any
/// violation unbounded.
fn deviation_from(value: f64, bound: f64) -> f64 {
    if bound == 0.0 {
        return UNBOUNDED_DEVIATION;
    }
    round_deviation((value - bound).abs() * 100.0 / bound.abs())
}

/// Classify a value against a range. Pure; no catalog lookup.
pub fn classify(range: &OptimalRange, value: f64) -> Classification {
    if range.contains(value) {
        return Classification {
            status: BiomarkerStatus::Optimal,
            severity: Severity::Low,
            impact: 0,
            deviation_percent: 0.0,
        };
    }

    let (status, bound) = if value < range.min {
        (BiomarkerStatus::Deficient, range.min)
    } else {
        (BiomarkerStatus::Excessive, range.max)
    };

    let deviation_percent = deviation_from(value, bound);
    let severity = severity_for_deviation(deviation_percent);

    Classification {
        status,
        severity,
        impact: severity.impact(),
        deviation_percent,
    }
}

/// Evaluate one biomarker against the catalog.
pub fn evaluate(
    catalog: &RangeCatalog,
    key: &str,
    value: f64,
) -> Result<BiomarkerAnalysis, AnalysisError> {
    let range = catalog
        .range(key)
        .ok_or_else(|| AnalysisError::UnknownBiomarker(key.to_string()))?;

    if !value.is_finite() {
        return Err(AnalysisError::InvalidValue {
            key: key.to_string(),
            value,
        });
    }

    let classification = classify(range, value);

    Ok(BiomarkerAnalysis {
        key: key.to_string(),
        value,
        optimal_range: range.clone(),
        status: classification.status,
        severity: classification.severity,
        impact: classification.impact,
        deviation_percent: classification.deviation_percent,
        recommendations: catalog
            .recommendations_for(key, classification.status)
            .to_vec(),
    })
}

/// Evaluate every input marker, stopping at the first invalid one.
pub fn evaluate_all(
    catalog: &RangeCatalog,
    data: &BiomarkerData,
) -> Result<Vec<BiomarkerAnalysis>, AnalysisError> {
    data.iter()
        .map(|(key, value)| evaluate(catalog, key, *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::reference::tests::range;

    fn catalog() -> RangeCatalog {
        RangeCatalog::builtin().unwrap()
    }

    #[test]
    fn in_range_is_optimal_with_zero_impact() {
        let r = range("TSH", 0.5, 2.0);
        for value in [0.5, 1.2, 2.0] {
            let c = classify(&r, value);
            assert_eq!(c.status, BiomarkerStatus::Optimal);
            assert_eq!(c.severity, Severity::Low);
            assert_eq!(c.impact, 0);
        }
    }

    #[test]
    fn below_range_is_deficient_against_min() {
        // 2.0 vs min 3.0 => 33.3% => high
        let c = classify(&range("Free T3", 3.0, 4.2), 2.0);
        assert_eq!(c.status, BiomarkerStatus::Deficient);
        assert_eq!(c.severity, Severity::High);
        assert_eq!(c.impact, 70);
        assert!((c.deviation_percent - 33.333).abs() < 0.01);
    }

    #[test]
    fn above_range_is_excessive_against_max() {
        // 4.5 vs max 2.0 => 125% => critical
        let c = classify(&range("TSH", 0.5, 2.0), 4.5);
        assert_eq!(c.status, BiomarkerStatus::Excessive);
        assert_eq!(c.severity, Severity::Critical);
        assert_eq!(c.impact, 90);
    }

    #[test]
    fn tier_boundaries_are_exclusive() {
        assert_eq!(severity_for_deviation(10.0), Severity::Low);
        assert_eq!(severity_for_deviation(10.01), Severity::Medium);
        assert_eq!(severity_for_deviation(25.0), Severity::Medium);
        assert_eq!(severity_for_deviation(25.01), Severity::High);
        assert_eq!(severity_for_deviation(50.0), Severity::High);
        assert_eq!(severity_for_deviation(50.01), Severity::Critical);
    }

    #[test]
    fn impact_never_decreases_with_deviation() {
        let r = range("X", 10.0, 20.0);
        let mut last_impact = 0;
        for step in 1..200 {
            let value = 20.0 + step as f64 * 0.1;
            let c = classify(&r, value);
            assert!(c.impact >= last_impact, "impact fell at {value}");
            last_impact = c.impact;
        }
        assert_eq!(last_impact, 90);
    }

    #[test]
    fn zero_lower_bound_is_treated_as_critical() {
        let c = classify(&range("X", 0.0, 1.0), -0.5);
        assert_eq!(c.status, BiomarkerStatus::Deficient);
        assert_eq!(c.severity, Severity::Critical);
        assert_eq!(c.deviation_percent, UNBOUNDED_DEVIATION);
    }

    #[test]
    fn unbounded_deviation_survives_json() {
        let catalog = RangeCatalog::from_json(
            r#"{
                "ranges": {"x": {"displayName": "X", "min": 0.0, "max": 1.0, "unit": "u", "description": ""}},
                "categories": {"thyroid": ["x"], "metabolic": [], "inflammation": [], "nutrients": []},
                "weights": {"thyroid": 0.4, "metabolic": 0.3, "inflammation": 0.15, "nutrients": 0.15}
            }"#,
            "test",
        )
        .unwrap();
        let analysis = evaluate(&catalog, "x", -0.5).unwrap();

        let json = serde_json::to_string(&analysis).unwrap();
        let back: BiomarkerAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
    }

    #[test]
    fn decimal_inputs_on_tier_boundary_stay_in_lower_tier() {
        let catalog = catalog();
        let graded = |key: &str, value: f64| {
            let a = evaluate(&catalog, key, value).unwrap();
            (a.severity, a.impact)
        };

        // exactly 10% above max
        assert_eq!(graded("tsh", 2.2), (Severity::Low, 15));
        assert_eq!(graded("crp", 1.1), (Severity::Low, 15));
        assert_eq!(graded("hba1c", 5.83), (Severity::Low, 15));
        assert_eq!(graded("glucose", 99.0), (Severity::Low, 15));
        // exactly 10% below min
        assert_eq!(graded("b12", 540.0), (Severity::Low, 15));
        // exactly 25% above max
        assert_eq!(graded("tsh", 2.5), (Severity::Medium, 40));
        // exactly 50% above max
        assert_eq!(graded("tsh", 3.0), (Severity::High, 70));
    }

    #[test]
    fn evaluate_attaches_recommendations() {
        let analysis = evaluate(&catalog(), "tsh", 4.5).unwrap();
        assert_eq!(analysis.key, "tsh");
        assert_eq!(analysis.status, BiomarkerStatus::Excessive);
        assert!(!analysis.recommendations.is_empty());
    }

    #[test]
    fn unmapped_status_yields_no_recommendations() {
        // reverseT3 has no "deficient" recommendations
        let analysis = evaluate(&catalog(), "reverseT3", 5.0).unwrap();
        assert_eq!(analysis.status, BiomarkerStatus::Deficient);
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = evaluate(&catalog(), "unobtainium", 1.0).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownBiomarker("unobtainium".into()));
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let err = evaluate(&catalog(), "tsh", f64::NAN).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidValue { ref key, .. } if key == "tsh"));
    }

    #[test]
    fn evaluate_all_fails_on_any_unknown_key() {
        let mut data = BiomarkerData::new();
        data.insert("tsh".into(), 1.0);
        data.insert("bogus".into(), 1.0);
        assert!(evaluate_all(&catalog(), &data).is_err());
    }
}
