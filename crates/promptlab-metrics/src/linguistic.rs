//! Linguistic metrics: vocabulary diversity, readability, n-gram
//! repetition, and hedge/filler word usage.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text::{self, round_dp};

/// Uncertainty indicators.
pub const HEDGE_WORDS: [&str; 12] = [
    "maybe",
    "perhaps",
    "possibly",
    "probably",
    "might",
    "could",
    "may",
    "seem",
    "appear",
    "likely",
    "unlikely",
    "potentially",
];

/// Low-content intensifiers.
pub const FILLER_WORDS: [&str; 6] = ["very", "really", "quite", "just", "actually", "basically"];

/// Type-token ratio inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyMetrics {
    pub unique_words: usize,
    pub total_words: usize,
    pub type_token_ratio: f64,
}

/// Flesch Reading Ease and derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityMetrics {
    pub flesch_reading_ease: f64,
    pub interpretation: String,
    pub avg_syllables_per_word: f64,
    /// Fraction of words needing three or more syllables.
    pub complex_word_ratio: f64,
}

impl Default for ReadabilityMetrics {
    fn default() -> Self {
        Self {
            flesch_reading_ease: 0.0,
            interpretation: interpret_flesch(0.0).to_string(),
            avg_syllables_per_word: 0.0,
            complex_word_ratio: 0.0,
        }
    }
}

/// N-gram repetition rates: `1 - distinct / total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepetitionMetrics {
    pub bigram_repetition: f64,
    pub trigram_repetition: f64,
}

/// Hedge and filler word usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordQualityMetrics {
    pub hedge_word_count: usize,
    pub hedge_word_density: f64,
    pub filler_word_count: usize,
    pub filler_word_density: f64,
}

/// Linguistic metrics for one response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinguisticMetrics {
    pub vocabulary: VocabularyMetrics,
    pub readability: ReadabilityMetrics,
    pub repetition: RepetitionMetrics,
    pub word_quality: WordQualityMetrics,
    /// Accumulated linguistic quality score in [0, 1].
    pub linguistic_score: f64,
}

/// Map a Flesch Reading Ease score to its standard interpretation.
pub fn interpret_flesch(score: f64) -> &'static str {
    if score >= 90.0 {
        "Very Easy"
    } else if score >= 80.0 {
        "Easy"
    } else if score >= 70.0 {
        "Fairly Easy"
    } else if score >= 60.0 {
        "Standard"
    } else if score >= 50.0 {
        "Fairly Difficult"
    } else if score >= 30.0 {
        "Difficult"
    } else {
        "Very Difficult"
    }
}

/// Compute linguistic metrics for a response.
pub fn analyze(response: &str) -> LinguisticMetrics {
    let words: Vec<String> = text::words(response)
        .into_iter()
        .map(|w| w.to_ascii_lowercase())
        .collect();
    let total_words = words.len();
    let sentence_count = text::sentences(response).len();

    let unique_words = words.iter().collect::<HashSet<_>>().len();
    let type_token_ratio = ratio(unique_words, total_words);

    let syllables: Vec<usize> = words.iter().map(|w| text::syllable_estimate(w)).collect();
    let total_syllables: usize = syllables.iter().sum();

    let flesch_reading_ease = if total_words > 0 && sentence_count > 0 {
        206.835
            - 1.015 * (total_words as f64 / sentence_count as f64)
            - 84.6 * (total_syllables as f64 / total_words as f64)
    } else {
        0.0
    };

    let complex_words = syllables.iter().filter(|&&s| s >= 3).count();

    let bigram_repetition = ngram_repetition(&words, 2);
    let trigram_repetition = ngram_repetition(&words, 3);

    let hedge_word_count = count_from_list(&words, &HEDGE_WORDS);
    let filler_word_count = count_from_list(&words, &FILLER_WORDS);
    let hedge_word_density = ratio(hedge_word_count, total_words);
    let filler_word_density = ratio(filler_word_count, total_words);

    let mut linguistic_score = 0.0;
    if type_token_ratio > 0.4 {
        linguistic_score += 0.25;
    } else if type_token_ratio > 0.3 {
        linguistic_score += 0.15;
    }
    if (30.0..=70.0).contains(&flesch_reading_ease) {
        linguistic_score += 0.25;
    }
    if bigram_repetition < 0.1 {
        linguistic_score += 0.25;
    }
    if hedge_word_density < 0.02 {
        linguistic_score += 0.25;
    }

    LinguisticMetrics {
        vocabulary: VocabularyMetrics {
            unique_words,
            total_words,
            type_token_ratio: round_dp(type_token_ratio, 3),
        },
        readability: ReadabilityMetrics {
            flesch_reading_ease: round_dp(flesch_reading_ease, 2),
            interpretation: interpret_flesch(flesch_reading_ease).to_string(),
            avg_syllables_per_word: round_dp(
                ratio(total_syllables, total_words),
                2,
            ),
            complex_word_ratio: round_dp(ratio(complex_words, total_words), 3),
        },
        repetition: RepetitionMetrics {
            bigram_repetition: round_dp(bigram_repetition, 3),
            trigram_repetition: round_dp(trigram_repetition, 3),
        },
        word_quality: WordQualityMetrics {
            hedge_word_count,
            hedge_word_density: round_dp(hedge_word_density, 4),
            filler_word_count,
            filler_word_density: round_dp(filler_word_density, 4),
        },
        linguistic_score: round_dp(linguistic_score, 2),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn ngram_repetition(words: &[String], n: usize) -> f64 {
    if words.len() < n {
        return 0.0;
    }
    let total = words.len() - n + 1;
    let distinct = words.windows(n).collect::<HashSet<_>>().len();
    1.0 - distinct as f64 / total as f64
}

fn count_from_list(words: &[String], list: &[&str]) -> usize {
    words.iter().filter(|w| list.contains(&w.as_str())).count()
}
