//! Structural metrics: counts, sentence-length distribution, formatting
//! markers, and discourse heuristics (introduction / conclusion /
//! transition words).

use serde::{Deserialize, Serialize};

use crate::text::{self, round_dp};

/// Transition words and phrases counted as coherence indicators.
pub const TRANSITION_TERMS: [&str; 14] = [
    "however",
    "therefore",
    "moreover",
    "furthermore",
    "additionally",
    "consequently",
    "nevertheless",
    "meanwhile",
    "similarly",
    "likewise",
    "in contrast",
    "on the other hand",
    "for example",
    "for instance",
];

/// Markdown-ish formatting markers detected in the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattingMetrics {
    pub has_code_blocks: bool,
    pub code_block_count: usize,
    pub has_bullet_points: bool,
    pub bullet_point_count: usize,
    pub has_numbered_list: bool,
    pub numbered_list_count: usize,
    pub has_headers: bool,
    pub header_count: usize,
}

/// Discourse-level structure indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscourseMetrics {
    /// First paragraph is longer than 10 words.
    pub has_introduction: bool,
    /// More than one paragraph and the last is longer than 10 words.
    pub has_conclusion: bool,
    pub transition_word_count: usize,
    /// Transition words per sentence.
    pub transition_word_density: f64,
}

/// Structural metrics for one response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub char_count: usize,
    pub avg_sentence_length: f64,
    pub sentence_length_variance: f64,
    pub avg_paragraph_length: f64,
    pub formatting: FormattingMetrics,
    pub discourse: DiscourseMetrics,
    /// Accumulated structure quality score in [0, 1].
    pub structure_score: f64,
}

/// Compute structural metrics for a response.
pub fn analyze(response: &str) -> StructuralMetrics {
    let sentences = text::sentences(response);
    let words = text::words(response);
    let paragraphs = text::paragraphs(response);

    let word_count = words.len();
    let sentence_count = sentences.len();
    let paragraph_count = paragraphs.len();
    let char_count = response.chars().count();

    let sentence_lengths: Vec<f64> = sentences.iter().map(|s| text::words(s).len() as f64).collect();
    let avg_sentence_length = if sentence_count > 0 {
        sentence_lengths.iter().sum::<f64>() / sentence_count as f64
    } else {
        0.0
    };
    let sentence_length_variance = text::variance(&sentence_lengths);

    let paragraph_lengths: Vec<usize> = paragraphs.iter().map(|p| text::words(p).len()).collect();
    let avg_paragraph_length = if paragraph_count > 0 {
        paragraph_lengths.iter().sum::<usize>() as f64 / paragraph_count as f64
    } else {
        0.0
    };

    let formatting = detect_formatting(response);

    let has_introduction = paragraph_lengths.first().map_or(false, |&len| len > 10);
    let has_conclusion = paragraph_count > 1 && paragraph_lengths.last().map_or(false, |&len| len > 10);

    let lowered = response.to_lowercase();
    let transition_word_count: usize = TRANSITION_TERMS
        .iter()
        .map(|term| text::count_term(&lowered, term))
        .sum();
    let transition_word_density = if sentence_count > 0 {
        transition_word_count as f64 / sentence_count as f64
    } else {
        0.0
    };

    let mut structure_score = 0.0;
    if paragraph_count > 1 {
        structure_score += 0.2;
    }
    if (10.0..=25.0).contains(&avg_sentence_length) {
        structure_score += 0.2;
    }
    if sentence_length_variance > 10.0 {
        structure_score += 0.2;
    }
    if transition_word_density > 0.05 {
        structure_score += 0.2;
    }
    if has_introduction && has_conclusion {
        structure_score += 0.2;
    }

    StructuralMetrics {
        word_count,
        sentence_count,
        paragraph_count,
        char_count,
        avg_sentence_length: round_dp(avg_sentence_length, 2),
        sentence_length_variance: round_dp(sentence_length_variance, 2),
        avg_paragraph_length: round_dp(avg_paragraph_length, 2),
        formatting,
        discourse: DiscourseMetrics {
            has_introduction,
            has_conclusion,
            transition_word_count,
            transition_word_density: round_dp(transition_word_density, 3),
        },
        structure_score: round_dp(structure_score, 2),
    }
}

fn detect_formatting(response: &str) -> FormattingMetrics {
    let fence_count = response.matches("```").count();
    let code_block_count = fence_count / 2;

    let mut bullet_point_count = 0usize;
    let mut numbered_list_count = 0usize;
    let mut header_count = 0usize;

    for line in response.lines() {
        let trimmed = line.trim_start();

        let mut chars = trimmed.chars();
        if let Some(marker) = chars.next() {
            if matches!(marker, '-' | '*' | '•') && chars.next().map_or(false, char::is_whitespace) {
                bullet_point_count += 1;
            }
        }

        let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 {
            let rest = &trimmed[digits..];
            if rest.starts_with('.') && rest[1..].starts_with(char::is_whitespace) {
                numbered_list_count += 1;
            }
        }

        // Headers must start at column zero.
        let hashes = line.chars().take_while(|c| *c == '#').count();
        if (1..=6).contains(&hashes) && line[hashes..].starts_with(char::is_whitespace) {
            header_count += 1;
        }
    }

    FormattingMetrics {
        has_code_blocks: code_block_count > 0,
        code_block_count,
        has_bullet_points: bullet_point_count > 0,
        bullet_point_count,
        has_numbered_list: numbered_list_count > 0,
        numbered_list_count,
        has_headers: header_count > 0,
        header_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_averages() {
        let m = analyze("One two three four. Five six.\n\nSeven eight nine.");
        assert_eq!(m.word_count, 9);
        assert_eq!(m.sentence_count, 3);
        assert_eq!(m.paragraph_count, 2);
        assert_eq!(m.avg_sentence_length, 3.0);
    }

    #[test]
    fn test_formatting_detection() {
        let text = "# Title\n\n- first\n- second\n* third\n\n1. one\n2. two\n\n```\ncode\n```\n";
        let m = analyze(text);
        assert!(m.formatting.has_headers);
        assert_eq!(m.formatting.header_count, 1);
        assert_eq!(m.formatting.bullet_point_count, 3);
        assert_eq!(m.formatting.numbered_list_count, 2);
        assert!(m.formatting.has_code_blocks);
        assert_eq!(m.formatting.code_block_count, 1);
    }

    #[test]
    fn test_headers_must_start_at_column_zero() {
        let m = analyze("  # indented is not a header\n");
        assert!(!m.formatting.has_headers);
    }

    #[test]
    fn test_intro_and_conclusion_require_long_paragraphs() {
        let long = "word ".repeat(12);
        let both = format!("{long}.\n\n{long}.");
        let m = analyze(&both);
        assert!(m.discourse.has_introduction);
        assert!(m.discourse.has_conclusion);

        let single = analyze(&format!("{long}."));
        assert!(single.discourse.has_introduction);
        assert!(!single.discourse.has_conclusion);
    }

    #[test]
    fn test_transition_word_density() {
        let m = analyze("However, it works. Therefore, we ship. Moreover, it is fast.");
        assert_eq!(m.discourse.transition_word_count, 3);
        assert_eq!(m.discourse.transition_word_density, 1.0);
    }

    #[test]
    fn test_structure_score_accumulates_in_steps_of_point_two() {
        let m = analyze("Tiny.");
        assert_eq!(m.structure_score, 0.0);

        // Two >10-word paragraphs with varied sentence lengths and transitions.
        let p1 = "This opening paragraph has more than ten words to count as an introduction. However, short.";
        let p2 = "The closing paragraph also carries well over ten words so it qualifies as a conclusion here.";
        let m = analyze(&format!("{p1}\n\n{p2}"));
        assert!(m.structure_score >= 0.6);
        assert!(m.structure_score <= 1.0);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let m = analyze("");
        assert_eq!(m, StructuralMetrics::default());
    }
}
