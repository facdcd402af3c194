//! Combined quality scoring engine.
//!
//! Runs the structural, linguistic, and (when a prompt is available)
//! relevance scorers over a response and folds the dimension scores into
//! one weighted overall score plus a human-readable insight summary.
//!
//! Scoring is a pure function of its inputs: the same (response, prompt)
//! pair always produces the identical `QualityMetrics` value.

use serde::{Deserialize, Serialize};

use crate::linguistic::{self, LinguisticMetrics};
use crate::relevance::{self, RelevanceMetrics};
use crate::structural::{self, StructuralMetrics};
use crate::text::round_dp;

/// Relevance substitute when no prompt is available for comparison.
pub const COMPLETENESS_BASELINE: f64 = 0.7;

const STRUCTURE_WEIGHT: f64 = 0.3;
const LINGUISTIC_WEIGHT: f64 = 0.3;
const RELEVANCE_WEIGHT: f64 = 0.4;

/// Full quality metrics for one response.
///
/// `relevance` is `Some` exactly when a prompt was supplied; its score
/// feeds the weighted sum even when it is zero. Without a prompt the
/// [`COMPLETENESS_BASELINE`] fills the relevance slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub structural: StructuralMetrics,
    pub linguistic: LinguisticMetrics,
    pub relevance: Option<RelevanceMetrics>,
    /// Weighted overall score in [0, 1], rounded to 3 decimal places.
    pub overall_score: f64,
    pub insights: Vec<String>,
}

/// Score a response, optionally against the prompt that produced it.
///
/// An empty or whitespace-only response short-circuits to an all-zero
/// record with a single insight; the sub-scorers never run.
pub fn score(response: &str, prompt: Option<&str>) -> QualityMetrics {
    if response.trim().is_empty() {
        return empty_response_metrics(prompt.is_some());
    }

    let structural = structural::analyze(response);
    let linguistic = linguistic::analyze(response);
    let relevance = prompt.map(|p| relevance::analyze(p, response));

    let relevance_slot = relevance
        .as_ref()
        .map_or(COMPLETENESS_BASELINE, |r| r.relevance_score);

    let overall = structural.structure_score * STRUCTURE_WEIGHT
        + linguistic.linguistic_score * LINGUISTIC_WEIGHT
        + relevance_slot * RELEVANCE_WEIGHT;

    let insights = build_insights(&structural, &linguistic, relevance.as_ref(), overall);

    QualityMetrics {
        structural,
        linguistic,
        relevance,
        overall_score: round_dp(overall, 3),
        insights,
    }
}

fn empty_response_metrics(prompt_supplied: bool) -> QualityMetrics {
    QualityMetrics {
        structural: StructuralMetrics::default(),
        linguistic: LinguisticMetrics::default(),
        relevance: prompt_supplied.then(RelevanceMetrics::default),
        overall_score: 0.0,
        insights: vec!["Empty or invalid response".to_string()],
    }
}

fn build_insights(
    structural: &StructuralMetrics,
    linguistic: &LinguisticMetrics,
    relevance: Option<&RelevanceMetrics>,
    overall: f64,
) -> Vec<String> {
    let mut insights = Vec::new();

    let headline = if overall >= 0.8 {
        "Excellent response quality"
    } else if overall >= 0.6 {
        "Good response quality"
    } else if overall >= 0.4 {
        "Moderate response quality"
    } else {
        "Response needs improvement"
    };
    insights.push(headline.to_string());

    if let Some(rel) = relevance {
        if rel.keyword_coverage < 0.3 {
            insights.push("Low keyword coverage - may not address prompt".to_string());
        }
    }
    if linguistic.repetition.bigram_repetition > 0.15 {
        insights.push("High repetition detected".to_string());
    }
    if structural.avg_sentence_length > 30.0 {
        insights.push("Sentences are very long".to_string());
    }
    if linguistic.word_quality.hedge_word_density > 0.03 {
        insights.push("High uncertainty in language".to_string());
    }
    if structural.paragraph_count == 1 {
        insights.push("Consider adding paragraph breaks".to_string());
    }

    insights
}
