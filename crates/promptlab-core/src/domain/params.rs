//! Decoding-parameter ranges and concrete combinations.

use serde::{Deserialize, Serialize};

/// Temperature used when a combination does not carry one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Nucleus-sampling probability used when a combination does not carry one.
pub const DEFAULT_TOP_P: f64 = 0.95;
/// Top-k cutoff sent to the provider when the combination omits it.
pub const DEFAULT_TOP_K: u32 = 40;
/// Output-token cap sent to the provider when the combination omits it.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Inclusive domain bounds for temperature.
pub const TEMPERATURE_BOUNDS: (f64, f64) = (0.0, 2.0);
/// Inclusive domain bounds for nucleus probability.
pub const TOP_P_BOUNDS: (f64, f64) = (0.0, 1.0);

/// Ranges of admissible values for each decoding parameter.
///
/// Fields are optional at the input boundary only: executing a sweep
/// requires all four to be present and non-empty (see
/// [`crate::sweep::expand_combinations`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterRanges {
    #[serde(default)]
    pub temperature: Option<Vec<f64>>,

    #[serde(default)]
    pub top_p: Option<Vec<f64>>,

    #[serde(default)]
    pub top_k: Option<Vec<u32>>,

    #[serde(default)]
    pub max_output_tokens: Option<Vec<u32>>,
}

/// One concrete assignment of all four decoding parameters.
///
/// Produced by sweep expansion and never mutated afterwards. `top_k` and
/// `max_output_tokens` may be absent, in which case the backend applies
/// [`DEFAULT_TOP_K`] / [`DEFAULT_MAX_OUTPUT_TOKENS`] when building the
/// provider request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterCombination {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: Option<u32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for ParameterCombination {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: None,
            max_output_tokens: None,
        }
    }
}

impl ParameterCombination {
    /// Top-k with the documented default applied.
    pub fn top_k_or_default(&self) -> u32 {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    /// Max output tokens with the documented default applied.
    pub fn max_output_tokens_or_default(&self) -> u32 {
        self.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_defaults() {
        let combo = ParameterCombination::default();
        assert_eq!(combo.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(combo.top_p, DEFAULT_TOP_P);
        assert_eq!(combo.top_k_or_default(), DEFAULT_TOP_K);
        assert_eq!(combo.max_output_tokens_or_default(), DEFAULT_MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn test_ranges_serde_roundtrip_with_absent_fields() {
        let json = r#"{"temperature":[0.2,0.7]}"#;
        let ranges: ParameterRanges = serde_json::from_str(json).expect("deserialize");
        assert_eq!(ranges.temperature, Some(vec![0.2, 0.7]));
        assert!(ranges.top_p.is_none());
        assert!(ranges.top_k.is_none());
        assert!(ranges.max_output_tokens.is_none());
    }

    #[test]
    fn test_combination_serde_roundtrip() {
        let combo = ParameterCombination {
            temperature: 0.4,
            top_p: 0.9,
            top_k: Some(20),
            max_output_tokens: None,
        };
        let json = serde_json::to_string(&combo).expect("serialize");
        let back: ParameterCombination = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(combo, back);
    }
}
