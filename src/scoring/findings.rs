use std::collections::BTreeMap;

use crate::models::enums::FindingType;
use crate::models::{BiomarkerAnalysis, CriticalFinding};

/// How many of the highest-impact markers are considered for ranking.
const RANKING_WINDOW: usize = 10;
/// Maximum findings returned.
pub const MAX_FINDINGS: usize = 8;
/// Impact strictly above this is critical.
const CRITICAL_IMPACT: u8 = 60;
/// Impact strictly above this (and up to critical) is important.
const IMPORTANT_IMPACT: u8 = 30;

fn classify_finding(analysis: &BiomarkerAnalysis) -> Option<FindingType> {
    if analysis.is_optimal() {
        Some(FindingType::Strength)
    } else if analysis.impact > CRITICAL_IMPACT {
        Some(FindingType::Critical)
    } else if analysis.impact > IMPORTANT_IMPACT {
        Some(FindingType::Important)
    } else {
        None
    }
}

/// Rank markers by impact and classify the top of the list.
///
/// Ties keep key order (the sort is stable over an ordered map).
pub fn rank_findings(analyses: &BTreeMap<String, BiomarkerAnalysis>) -> Vec<CriticalFinding> {
    let mut ranked: Vec<&BiomarkerAnalysis> = analyses.values().collect();
    ranked.sort_by(|a, b| b.impact.cmp(&a.impact));

    ranked
        .into_iter()
        .take(RANKING_WINDOW)
        .filter_map(|a| classify_finding(a).map(|t| (t, a)))
        .take(MAX_FINDINGS)
        .enumerate()
        .map(|(idx, (finding_type, a))| CriticalFinding {
            finding_type,
            title: format!("{} {}", a.optimal_range.display_name, a.status.label()),
            impact: a.impact,
            severity: a.severity,
            biomarkers: vec![a.key.clone()],
            priority: idx + 1,
        })
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
    fn classifies_by_impact_tier() {
        let analyses = analyses_for(&[
            ("tsh", 4.5),       // critical, 90
            ("freeT3", 2.0),    // high, 70
            ("glucose", 105.0), // medium, 40
            ("insulin", 6.3),   // low, 15 -> dropped
            ("ferritin", 80.0), // optimal -> strength
        ]);
        let findings = rank_findings(&analyses);
        let summary: Vec<(FindingType, &str)> = findings
            .iter()
            .map(|f| (f.finding_type, f.biomarkers[0].as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (FindingType::Critical, "tsh"),
                (FindingType::Critical, "freeT3"),
                (FindingType::Important, "glucose"),
                (FindingType::Strength, "ferritin"),
            ]
        );
        assert_eq!(findings[0].title, "TSH High");
        assert_eq!(findings[1].title, "Free T3 Low");
        assert_eq!(findings[3].title, "Ferritin Optimal");
    }

    #[test]
    fn at_most_eight_with_contiguous_priorities() {
        let analyses = analyses_for(&[
            ("tsh", 4.5),
            ("freeT4", 0.3),
            ("freeT3", 1.0),
            ("reverseT3", 40.0),
            ("glucose", 150.0),
            ("insulin", 20.0),
            ("hba1c", 9.0),
            ("triglycerides", 300.0),
            ("crp", 5.0),
            ("esr", 40.0),
            ("homocysteine", 20.0),
        ]);
        let findings = rank_findings(&analyses);
        assert_eq!(findings.len(), MAX_FINDINGS);
        let priorities: Vec<usize> = findings.iter().map(|f| f.priority).collect();
        assert_eq!(priorities, (1..=MAX_FINDINGS).collect::<Vec<_>>());
        assert!(findings.windows(2).all(|w| w[0].impact >= w[1].impact));
    }

    #[test]
    fn ties_keep_key_order() {
        let analyses = analyses_for(&[("tsh", 4.5), ("crp", 5.0)]);
        let findings = rank_findings(&analyses);
        assert_eq!(findings[0].biomarkers, ["crp"]);
        assert_eq!(findings[1].biomarkers, ["tsh"]);
    }

    #[test]
    fn optimal_markers_outside_window_are_not_strengths() {
        let mut pairs: Vec<(&str, f64)> = vec![
            ("tsh", 4.5),
            ("freeT4", 0.3),
            ("freeT3", 1.0),
            ("reverseT3", 40.0),
            ("glucose", 150.0),
            ("insulin", 20.0),
            ("hba1c", 9.0),
            ("triglycerides", 300.0),
            ("crp", 5.0),
            ("esr", 40.0),
        ];
        pairs.push(("ferritin", 80.0));
        let findings = rank_findings(&analyses_for(&pairs));
        assert!(findings
            .iter()
            .all(|f| f.finding_type != FindingType::Strength));
    }

    #[test]
    fn empty_input_yields_no_findings() {
        assert!(rank_findings(&BTreeMap::new()).is_empty());
    }
}
