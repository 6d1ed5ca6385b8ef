//! Turning retrieval text into a structured insight.
//!
//! Contraindication and safety extraction is keyword matching over
//! sentences. It is a heuristic, not a clinical parser; structured fields on
//! the retrieval response should replace it once the service provides them.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{RayPeatInsight, RetrievalResponse};
use crate::scoring::recommendations::dedup_preserving_order;

pub const MAX_CONCEPTS: usize = 5;
pub const MAX_CONTRAINDICATIONS: usize = 3;
pub const MAX_SAFETY_ALERTS: usize = 3;
pub const MAX_SOURCES: usize = 3;
/// Explanation length cap, in characters.
pub const MAX_EXPLANATION_CHARS: usize = 1000;
/// Confidence used when the service does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

static CONTRAINDICATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(contraindicated|avoid|not recommended)").expect("valid regex")
});

static SAFETY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(caution|warning|monitor|supervision|medical attention)")
        .expect("valid regex")
});

/// Split text into trimmed, non-empty sentences, in order.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// First sentence of `text` matching `pattern`.
fn first_matching_sentence<'a>(text: &'a str, pattern: &Regex) -> Option<&'a str> {
    sentences(text).find(|s| pattern.is_match(s))
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Parse one retrieval response. `None` when the response carries no results.
pub fn parse_insight(query: &str, response: RetrievalResponse) -> Option<RayPeatInsight> {
    let results = response.results.filter(|r| !r.is_empty())?;

    let relevant_concepts: Vec<String> =
        dedup_preserving_order(results.iter().filter_map(|r| r.metadata.concept.clone()))
            .into_iter()
            .take(MAX_CONCEPTS)
            .collect();

    let source_documents: Vec<String> =
        dedup_preserving_order(results.iter().filter_map(|r| r.metadata.source.clone()))
            .into_iter()
            .take(MAX_SOURCES)
            .collect();

    let joined = results
        .iter()
        .map(|r| r.content.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let explanation = truncate_chars(&joined, MAX_EXPLANATION_CHARS);

    let contraindications: Vec<String> = results
        .iter()
        .filter_map(|r| first_matching_sentence(&r.content, &CONTRAINDICATION_PATTERN))
        .map(str::to_string)
        .take(MAX_CONTRAINDICATIONS)
        .collect();

    let safety_alerts: Vec<String> = results
        .iter()
        .filter_map(|r| first_matching_sentence(&r.content, &SAFETY_PATTERN))
        .map(str::to_string)
        .take(MAX_SAFETY_ALERTS)
        .collect();

    let confidence_score = response
        .confidence_score
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_CONFIDENCE);

    Some(RayPeatInsight {
        query: query.to_string(),
        relevant_concepts,
        explanation,
        contraindications,
        safety_alerts,
        confidence_score,
        source_documents,
    })
}
