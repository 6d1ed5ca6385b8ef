//! Recommendation bucketing.
//!
//! Bucketing is a keyword heuristic over free text, not a parser: the first
//! keyword group found in a string decides its bucket, checked in
//! `RecommendationBucket` declaration order.

use std::collections::{BTreeMap, HashSet};

use crate::models::enums::RecommendationBucket;
use crate::models::{BiomarkerAnalysis, MetabolicPattern, Recommendations};

/// Keyword groups in precedence order. Anything unmatched is short-term.
const BUCKET_KEYWORDS: &[(RecommendationBucket, &[&str])] = &[
    (RecommendationBucket::Immediate, &["immediate", "urgent"]),
    (RecommendationBucket::Lifestyle, &["lifestyle", "diet"]),
    (RecommendationBucket::Supplements, &["supplement", "vitamin"]),
    (RecommendationBucket::Monitoring, &["monitor", "retest"]),
];

/// Pick the bucket for one recommendation string (case-insensitive).
pub fn bucket_for(text: &str) -> RecommendationBucket {
    let lower = text.to_lowercase();
    BUCKET_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(bucket, _)| *bucket)
        .unwrap_or(RecommendationBucket::ShortTerm)
}

/// Exact-string dedup keeping first occurrence order.
pub fn dedup_preserving_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Union per-marker then per-pattern recommendations and bucket them.
pub fn synthesize(
    analyses: &BTreeMap<String, BiomarkerAnalysis>,
    patterns: &[MetabolicPattern],
) -> Recommendations {
    let all = analyses
        .values()
        .flat_map(|a| a.recommendations.iter())
        .chain(patterns.iter().flat_map(|p| p.recommendations.iter()))
        .cloned();

    let mut recommendations = Recommendations::default();
    for text in dedup_preserving_order(all) {
        recommendations.bucket_mut(bucket_for(&text)).push(text);
    }
    recommendations
}
