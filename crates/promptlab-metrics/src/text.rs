//! Shared text-analysis primitives.
//!
//! Tokenizers and estimators used by every scoring dimension:
//! - sentence / word / paragraph tokenization
//! - heuristic syllable estimation
//! - population variance

/// A character that terminates a sentence.
fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// A word character: ASCII alphanumeric or underscore.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize text into sentences.
///
/// A sentence is a maximal run of non-terminator characters followed by
/// one or more terminators (`.`, `!`, `?`). Trailing text without a
/// terminator is not a sentence.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut start: Option<usize> = None;

    while let Some((i, c)) = chars.next() {
        if is_terminator(c) {
            if let Some(s) = start.take() {
                let mut end = i + c.len_utf8();
                while let Some(&(j, next)) = chars.peek() {
                    if is_terminator(next) {
                        end = j + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push(&text[s..end]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    out
}

/// Tokenize text into words: maximal runs of word characters.
pub fn words(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if is_word_char(c) {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            out.push(&text[s..i]);
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }

    out
}

/// Split text into paragraphs on blank-line boundaries.
///
/// A blank line (empty or whitespace-only) separates paragraphs; empty
/// segments are discarded. A paragraph keeps its internal line breaks.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0usize;
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                out.push(text[s..end].trim_end_matches(['\n', '\r']));
            }
        } else {
            if start.is_none() {
                start = Some(line_start);
            }
            end = offset;
        }
    }
    if let Some(s) = start {
        out.push(text[s..end].trim_end_matches(['\n', '\r']));
    }

    out
}

/// Estimate the syllable count of a single word.
///
/// Words of three characters or fewer count as one syllable. Longer words
/// drop a trailing silent `e` / `ed` / consonant+`es`, drop a leading `y`,
/// and count maximal vowel-cluster runs (`a e i o u y`), minimum one.
pub fn syllable_estimate(word: &str) -> usize {
    let lowered = word.to_ascii_lowercase();
    if lowered.chars().count() <= 3 {
        return 1;
    }

    let stripped = strip_silent_suffix(&lowered);
    let stem = stripped.strip_prefix('y').unwrap_or(stripped);

    let mut runs = 0usize;
    let mut in_run = false;
    for c in stem.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_run {
            runs += 1;
        }
        in_run = vowel;
    }

    runs.max(1)
}

/// Drop a silent ending: consonant+`es`, `ed`, or consonant+`e`.
///
/// `l` is treated as a vowel-like consonant here so `-le` endings keep
/// their syllable ("able", "little").
fn strip_silent_suffix(word: &str) -> &str {
    let b = word.as_bytes();
    let n = b.len();
    let keeps_syllable = |c: u8| matches!(c, b'l' | b'a' | b'e' | b'i' | b'o' | b'u' | b'y');

    if n >= 3 && &b[n - 2..] == b"es" && !keeps_syllable(b[n - 3]) {
        return &word[..n - 3];
    }
    if n >= 2 && &b[n - 2..] == b"ed" {
        return &word[..n - 2];
    }
    if n >= 2 && b[n - 1] == b'e' && !keeps_syllable(b[n - 2]) {
        return &word[..n - 2];
    }
    word
}

/// Population variance of a sample, 0 for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Round to a fixed number of decimal places for stored metric fields.
pub(crate) fn round_dp(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Count whole-word occurrences of `term` in `haystack`.
///
/// `term` may contain spaces (multiword phrase); both sides of each match
/// must sit on a non-word-character boundary. Caller lowercases both.
pub(crate) fn count_term(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    let mut count = 0usize;
    let mut from = 0usize;

    while let Some(pos) = haystack[from..].find(term) {
        let abs = from + pos;
        let end = abs + term.len();
        let before_ok = haystack[..abs].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            count += 1;
        }
        from = abs + 1;
    }

    count
}
