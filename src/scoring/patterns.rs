use std::collections::BTreeMap;

use crate::models::enums::BiomarkerStatus::{self, Deficient, Excessive};
use crate::models::enums::{PatternSeverity, PatternType};
use crate::models::{BiomarkerAnalysis, MetabolicPattern};

/// One predicate of a pattern rule: a marker observed in a given status.
struct Indicator {
    marker: &'static str,
    status: BiomarkerStatus,
    label: &'static str,
}

/// A named cross-marker heuristic.
struct PatternRule {
    pattern_type: PatternType,
    name: &'static str,
    indicators: &'static [Indicator],
    min_matches: usize,
    recommendations: &'static [&'static str],
}

const fn indicator(
    marker: &'static str,
    status: BiomarkerStatus,
    label: &'static str,
) -> Indicator {
    Indicator {
        marker,
        status,
        label,
    }
}

/// Rules in declaration order. Output preserves this order.
const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        pattern_type: PatternType::Hypothyroid,
        name: "Hypothyroid Pattern",
        indicators: &[
            indicator("tsh", Excessive, "Elevated TSH"),
            indicator("freeT3", Deficient, "Low Free T3"),
            indicator("reverseT3", Excessive, "Elevated Reverse T3"),
        ],
        min_matches: 2,
        recommendations: &[
            "Request a full thyroid panel review with your physician",
            "Monitor basal body temperature and resting pulse each morning",
            "Support thyroid function with adequate protein and carbohydrate in your diet",
        ],
    },
    PatternRule {
        pattern_type: PatternType::InsulinResistance,
        name: "Insulin Resistance Pattern",
        indicators: &[
            indicator("glucose", Excessive, "Elevated fasting glucose"),
            indicator("insulin", Excessive, "Elevated fasting insulin"),
            indicator("triglycerides", Excessive, "Elevated triglycerides"),
        ],
        min_matches: 2,
        recommendations: &[
            "Reduce refined carbohydrates and seed oils in your diet",
            "Retest glucose, insulin and triglycerides in 3 months",
        ],
    },
    PatternRule {
        pattern_type: PatternType::ChronicInflammation,
        name: "Chronic Inflammation Pattern",
        indicators: &[
            indicator("crp", Excessive, "Elevated hs-CRP"),
            indicator("esr", Excessive, "Elevated ESR"),
            indicator("homocysteine", Excessive, "Elevated homocysteine"),
        ],
        min_matches: 2,
        recommendations: &[
            "Investigate sources of chronic inflammation with your physician",
            "Monitor inflammatory markers every 6-8 weeks",
        ],
    },
    PatternRule {
        pattern_type: PatternType::NutrientDeficiency,
        name: "Nutrient Deficiency Pattern",
        indicators: &[
            indicator("vitaminD", Deficient, "Low vitamin D"),
            indicator("b12", Deficient, "Low vitamin B12"),
            indicator("ferritin", Deficient, "Low ferritin"),
            indicator("magnesium", Deficient, "Low magnesium"),
            indicator("folate", Deficient, "Low folate"),
            indicator("zinc", Deficient, "Low zinc"),
        ],
        min_matches: 3,
        recommendations: &[
            "Review digestion and absorption with your practitioner",
            "Prioritise nutrient-dense foods such as liver, eggs and shellfish in your diet",
        ],
    },
    PatternRule {
        pattern_type: PatternType::StressHormone,
        name: "Stress Hormone Pattern",
        indicators: &[
            indicator("cortisol", Excessive, "Elevated morning cortisol"),
            indicator("glucose", Excessive, "Elevated fasting glucose"),
            indicator("freeT3", Deficient, "Low Free T3"),
        ],
        min_matches: 2,
        recommendations: &[
            "Reduce stress exposure and protect sleep as lifestyle priorities",
            "Urgent attention to blood sugar stability: avoid long fasts",
        ],
    },
];

impl PatternRule {
    fn evaluate(
        &self,
        priority: u8,
        analyses: &BTreeMap<String, BiomarkerAnalysis>,
    ) -> Option<MetabolicPattern> {
        let matched: Vec<&Indicator> = self
            .indicators
            .iter()
            .filter(|ind| {
                analyses
                    .get(ind.marker)
                    .is_some_and(|a| a.status == ind.status)
            })
            .collect();

        if matched.len() < self.min_matches {
            return None;
        }

        let possible = self.indicators.len();
        let severity = if matched.len() == possible {
            PatternSeverity::Severe
        } else {
            PatternSeverity::Moderate
        };

        Some(MetabolicPattern {
            pattern_type: self.pattern_type,
            name: self.name.to_string(),
            severity,
            confidence: matched.len() as f64 / possible as f64,
            indicators: matched.iter().map(|ind| ind.label.to_string()).collect(),
            recommendations: self
                .recommendations
                .iter()
                .map(|r| r.to_string())
                .collect(),
            priority,
        })
    }
}

/// Apply every pattern rule. Output is in rule declaration order.
pub fn detect_patterns(analyses: &BTreeMap<String, BiomarkerAnalysis>) -> Vec<MetabolicPattern> {
    PATTERN_RULES
        .iter()
        .zip(1u8..)
        .filter_map(|(rule, priority)| rule.evaluate(priority, analyses))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiomarkerData;
    use crate::scoring::evaluator::evaluate_all;
    use crate::scoring::reference::RangeCatalog;

    fn analyses_for(pairs: &[(&str, f64)]) -> BTreeMap<String, BiomarkerAnalysis> {
        let catalog = RangeCatalog::builtin().unwrap();
        let data: BiomarkerData = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        evaluate_all(&catalog, &data)
            .unwrap()
            .into_iter()
            .map(|a| (a.key.clone(), a))
            .collect()
    }

    #[test]
    fn hypothyroid_pattern_fires_on_full_match() {
        let analyses = analyses_for(&[("tsh", 4.5), ("freeT3", 2.0), ("reverseT3", 30.0)]);
        let patterns = detect_patterns(&analyses);
        let hypo = patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::Hypothyroid)
            .unwrap();
        assert!(hypo.confidence >= 2.0 / 3.0);
        assert_eq!(hypo.confidence, 1.0);
        assert_eq!(hypo.severity, PatternSeverity::Severe);
        assert_eq!(hypo.indicators.len(), 3);
    }

    #[test]
    fn partial_match_is_moderate() {
        let analyses = analyses_for(&[("tsh", 4.5), ("freeT3", 2.0), ("reverseT3", 15.0)]);
        let patterns = detect_patterns(&analyses);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].severity, PatternSeverity::Moderate);
        assert!((patterns[0].confidence - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(patterns[0].indicators, ["Elevated TSH", "Low Free T3"]);
    }

    #[test]
    fn single_indicator_does_not_fire() {
        let analyses = analyses_for(&[("tsh", 4.5)]);
        assert!(detect_patterns(&analyses).is_empty());
    }

    #[test]
    fn nutrient_pattern_needs_three_of_six() {
        let two = analyses_for(&[("vitaminD", 20.0), ("b12", 300.0)]);
        assert!(detect_patterns(&two).is_empty());

        let three = analyses_for(&[("vitaminD", 20.0), ("b12", 300.0), ("zinc", 60.0)]);
        let patterns = detect_patterns(&three);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern_type, PatternType::NutrientDeficiency);
        assert!((patterns[0].confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn wrong_direction_does_not_count() {
        // Low TSH and high Free T3 are the opposite picture
        let analyses = analyses_for(&[("tsh", 0.1), ("freeT3", 6.0), ("reverseT3", 30.0)]);
        assert!(detect_patterns(&analyses).is_empty());
    }

    #[test]
    fn output_follows_declaration_order() {
        let analyses = analyses_for(&[
            ("cortisol", 25.0),
            ("glucose", 110.0),
            ("insulin", 12.0),
            ("freeT3", 2.0),
            ("tsh", 4.0),
        ]);
        let patterns = detect_patterns(&analyses);
        let types: Vec<PatternType> = patterns.iter().map(|p| p.pattern_type).collect();
        assert_eq!(
            types,
            vec![
                PatternType::Hypothyroid,
                PatternType::InsulinResistance,
                PatternType::StressHormone,
            ]
        );
        assert_eq!(patterns[0].priority, 1);
        assert_eq!(patterns[2].priority, 5);
    }

    #[test]
    fn detection_is_idempotent() {
        let analyses = analyses_for(&[("tsh", 4.5), ("freeT3", 2.0), ("glucose", 120.0)]);
        assert_eq!(detect_patterns(&analyses), detect_patterns(&analyses));
    }
}
