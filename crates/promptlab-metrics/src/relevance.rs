//! Relevance metrics: prompt-keyword presence in the response.
//!
//! Only meaningful when the prompt is available; the engine substitutes a
//! completeness baseline otherwise.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text::{self, round_dp};

/// Stop words excluded from keyword extraction.
pub const STOP_WORDS: [&str; 53] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "can", "this", "that", "these",
    "those", "i", "you", "he", "she", "it", "we", "they", "what", "which", "who", "when", "where",
    "why", "how",
];

/// How many leading response words count as "early" for keyword presence.
const EARLY_WINDOW: usize = 100;

/// One prompt keyword found in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub count: usize,
}

/// Relevance metrics for one (prompt, response) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceMetrics {
    /// Keywords extracted from the prompt, first-occurrence order.
    pub prompt_keywords: Vec<String>,
    /// Keywords that appear in the response, with occurrence counts.
    pub keyword_matches: Vec<KeywordMatch>,
    /// Fraction of prompt keywords present in the response.
    pub keyword_coverage: f64,
    /// Fraction of prompt keywords present in the first 100 filtered words.
    pub early_keyword_presence: f64,
    /// Total keyword mentions over total filtered response words.
    pub keyword_density: f64,
    pub total_keyword_mentions: usize,
    /// Accumulated relevance score in [0, 1].
    pub relevance_score: f64,
}

/// Extract keywords: lowercase word tokens, stop words and tokens of
/// length <= 2 dropped, de-duplicated preserving first occurrence.
pub fn extract_keywords(prompt: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    filtered_words(prompt)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Compute relevance metrics for a response against its prompt.
pub fn analyze(prompt: &str, response: &str) -> RelevanceMetrics {
    let prompt_keywords = extract_keywords(prompt);
    let response_words: Vec<String> = filtered_words(response).collect();

    let keyword_matches: Vec<KeywordMatch> = prompt_keywords
        .iter()
        .map(|keyword| KeywordMatch {
            keyword: keyword.clone(),
            count: response_words.iter().filter(|w| *w == keyword).count(),
        })
        .filter(|m| m.count > 0)
        .collect();

    let keyword_coverage = if prompt_keywords.is_empty() {
        0.0
    } else {
        keyword_matches.len() as f64 / prompt_keywords.len() as f64
    };

    let early_words: HashSet<&str> = response_words
        .iter()
        .take(EARLY_WINDOW)
        .map(String::as_str)
        .collect();
    let early_hits = prompt_keywords
        .iter()
        .filter(|k| early_words.contains(k.as_str()))
        .count();
    let early_keyword_presence = if prompt_keywords.is_empty() {
        0.0
    } else {
        early_hits as f64 / prompt_keywords.len() as f64
    };

    let total_keyword_mentions: usize = keyword_matches.iter().map(|m| m.count).sum();
    let keyword_density = if response_words.is_empty() {
        0.0
    } else {
        total_keyword_mentions as f64 / response_words.len() as f64
    };

    let mut relevance_score = 0.0;
    relevance_score += if keyword_coverage > 0.5 {
        0.3
    } else {
        keyword_coverage * 0.6
    };
    relevance_score += if early_keyword_presence > 0.3 {
        0.3
    } else {
        early_keyword_presence
    };
    if keyword_density > 0.02 && keyword_density < 0.15 {
        relevance_score += 0.2;
    }
    if total_keyword_mentions > 0 {
        relevance_score += 0.2;
    }

    RelevanceMetrics {
        prompt_keywords,
        keyword_matches,
        keyword_coverage: round_dp(keyword_coverage, 2),
        early_keyword_presence: round_dp(early_keyword_presence, 2),
        keyword_density: round_dp(keyword_density, 4),
        total_keyword_mentions,
        relevance_score: round_dp(relevance_score, 2),
    }
}

fn filtered_words(input: &str) -> impl Iterator<Item = String> + '_ {
    text::words(input)
        .into_iter()
        .map(|w| w.to_ascii_lowercase())
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(&w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_filters_and_dedups() {
        let kws = extract_keywords("How does the garbage collector work in the garbage collector?");
        assert_eq!(kws, vec!["garbage", "collector", "work"]);
    }

    #[test]
    fn test_full_coverage_scores_top_tiers() {
        let m = analyze(
            "photosynthesis energy",
            "Photosynthesis converts light into chemical energy. Photosynthesis stores that energy in sugar molecules for later use by the plant cells.",
        );
        assert_eq!(m.keyword_coverage, 1.0);
        assert!(m.early_keyword_presence > 0.3);
        assert!(m.total_keyword_mentions > 0);
        assert!(m.relevance_score >= 0.8);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let m = analyze("Explain quantum entanglement", "Bananas ripen faster inside paper bags.");
        assert_eq!(m.keyword_coverage, 0.0);
        assert_eq!(m.total_keyword_mentions, 0);
        assert_eq!(m.relevance_score, 0.0);
        assert!(m.keyword_matches.is_empty());
    }

    #[test]
    fn test_partial_coverage_scales_linearly() {
        let m = analyze(
            "relational databases document stores",
            "Relational systems enforce schemas. Nothing else matches here today.",
        );
        // 1 of 4 keywords ("relational") present.
        assert_eq!(m.keyword_coverage, 0.25);
        // Coverage tier scales as 0.25 * 0.6 instead of the full 0.3.
        assert!(m.relevance_score > 0.0);
        assert!(m.relevance_score <= 0.8);
    }

    #[test]
    fn test_prompt_with_only_stop_words_yields_zero() {
        let m = analyze("it is what it is", "Any response at all.");
        assert!(m.prompt_keywords.is_empty());
        assert_eq!(m.keyword_coverage, 0.0);
        assert_eq!(m.relevance_score, 0.0);
    }

    #[test]
    fn test_density_window_award() {
        // 1 mention in 30 filtered words -> density ~0.033, inside (0.02, 0.15).
        let filler = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike november oscar papa quebec romeo sierra tango uniform victor whiskey xray yankee zulu red green blue".split(' ').collect::<Vec<_>>().join(" ");
        let response = format!("gravity matters. {filler}.");
        let m = analyze("Describe gravity", &response);
        assert!(m.keyword_density > 0.02 && m.keyword_density < 0.15);
        assert!(m.relevance_score >= 0.4);
    }
}
