use crate::models::enums::HealthCategory;
use crate::models::AnalysisResults;
use crate::scoring::reference::RangeCatalog;

use super::types::InsightSlot;

/// Categories scoring below this get a targeted query.
pub const WEAK_CATEGORY_THRESHOLD: f64 = 80.0;

/// Markers that make up the hormone panel. Evaluated but not category-scored.
pub const HORMONE_PANEL: &[&str] = &["cortisol", "prolactin", "estradiol", "progesterone"];

/// A query bound to its output slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuery {
    pub slot: InsightSlot,
    pub text: String,
}

fn template(slot: InsightSlot) -> &'static str {
    match slot {
        InsightSlot::Thyroid => {
            "Bioenergetic perspective on supporting thyroid function, T4 to T3 conversion \
             and cellular metabolic rate"
        }
        InsightSlot::Metabolic => {
            "Bioenergetic approach to blood sugar regulation, insulin sensitivity \
             and efficient glucose oxidation"
        }
        InsightSlot::Nutritional => {
            "Bioenergetic view of nutrient deficiencies, mineral balance \
             and food-first repletion"
        }
        InsightSlot::Hormonal => {
            "Bioenergetic perspective on stress hormones, inflammation \
             and protective hormone balance"
        }
        InsightSlot::General => {
            "General bioenergetic principles for improving energy production \
             and metabolic health"
        }
    }
}

fn render(slot: InsightSlot, focus: &[&str]) -> String {
    if focus.is_empty() {
        template(slot).to_string()
    } else {
        format!("{}. Focus markers: {}.", template(slot), focus.join(", "))
    }
}

/// Out-of-range markers among `keys`, in the order given.
fn abnormal<'a, I>(results: &AnalysisResults, keys: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter(|k| results.biomarkers.get(*k).is_some_and(|a| !a.is_optimal()))
        .collect()
}

/// Build the queries for a baseline result, in slot order.
///
/// One query per weak category, a hormonal query when inflammation is weak or
/// any hormone-panel marker is out of range, and an unconditional general
/// query. At most five.
pub fn plan_queries(results: &AnalysisResults, catalog: &RangeCatalog) -> Vec<PlannedQuery> {
    let weak = |category: HealthCategory| {
        results.category_scores.get(category) < WEAK_CATEGORY_THRESHOLD
    };
    let focus_for = |category: HealthCategory| {
        abnormal(
            results,
            catalog.category_markers(category).iter().map(String::as_str),
        )
    };

    let mut planned = Vec::with_capacity(InsightSlot::ALL.len());

    for (category, slot) in [
        (HealthCategory::Thyroid, InsightSlot::Thyroid),
        (HealthCategory::Metabolic, InsightSlot::Metabolic),
        (HealthCategory::Nutrients, InsightSlot::Nutritional),
    ] {
        if weak(category) {
            planned.push(PlannedQuery {
                slot,
                text: render(slot, &focus_for(category)),
            });
        }
    }

    let hormones = abnormal(results, HORMONE_PANEL.iter().copied());
    if weak(HealthCategory::Inflammation) || !hormones.is_empty() {
        let mut focus = focus_for(HealthCategory::Inflammation);
        focus.extend(hormones);
        planned.push(PlannedQuery {
            slot: InsightSlot::Hormonal,
            text: render(InsightSlot::Hormonal, &focus),
        });
    }

    planned.push(PlannedQuery {
        slot: InsightSlot::General,
        text: render(InsightSlot::General, &[]),
    });

    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiomarkerData;
    use crate::scoring::engine::AnalysisEngine;
    use std::sync::Arc;

    fn plan(pairs: &[(&str, f64)]) -> Vec<PlannedQuery> {
        let catalog = Arc::new(RangeCatalog::builtin().unwrap());
        let data: BiomarkerData = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let results = AnalysisEngine::new(catalog.clone()).analyze(&data).unwrap();
        plan_queries(&results, &catalog)
    }

    fn slots(planned: &[PlannedQuery]) -> Vec<InsightSlot> {
        planned.iter().map(|q| q.slot).collect()
    }

    #[test]
    fn healthy_input_gets_only_general_query() {
        let planned = plan(&[("tsh", 1.0), ("glucose", 82.0)]);
        assert_eq!(slots(&planned), vec![InsightSlot::General]);
        assert!(!planned[0].text.contains("Focus markers"));
    }

    #[test]
    fn weak_thyroid_adds_thyroid_query_with_focus() {
        let planned = plan(&[("tsh", 4.5), ("freeT3", 2.0), ("freeT4", 1.2)]);
        assert_eq!(
            slots(&planned),
            vec![InsightSlot::Thyroid, InsightSlot::General]
        );
        assert!(planned[0].text.contains("Focus markers: tsh, freeT3."));
    }

    #[test]
    fn abnormal_hormone_triggers_hormonal_query() {
        let planned = plan(&[("cortisol", 25.0)]);
        assert_eq!(
            slots(&planned),
            vec![InsightSlot::Hormonal, InsightSlot::General]
        );
        assert!(planned[0].text.contains("cortisol"));
    }

    #[test]
    fn everything_weak_plans_five_queries_in_slot_order() {
        let planned = plan(&[
            ("tsh", 4.5),
            ("glucose", 150.0),
            ("crp", 5.0),
            ("vitaminD", 15.0),
        ]);
        assert_eq!(slots(&planned), InsightSlot::ALL.to_vec());
    }

    #[test]
    fn category_above_threshold_is_not_weak() {
        // insulin 6.3 => low severity, impact 15 => metabolic 85
        let planned = plan(&[("insulin", 6.3)]);
        assert_eq!(slots(&planned), vec![InsightSlot::General]);
    }
}
