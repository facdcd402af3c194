//! Cartesian expansion of parameter ranges into sweep combinations.

use crate::domain::{
    ParameterCombination, ParameterRanges, ValidationError, TEMPERATURE_BOUNDS, TOP_P_BOUNDS,
};

/// Expand four parameter ranges into every combination.
///
/// All four ranges are mandatory and must be non-empty; values are checked
/// against their documented domains. Output order is deterministic:
/// temperature is the outermost loop, then top_p, top_k, and
/// max_output_tokens, so identical inputs always yield the identical
/// sequence. The combination count is the product of the range lengths.
pub fn expand_combinations(
    ranges: &ParameterRanges,
) -> Result<Vec<ParameterCombination>, ValidationError> {
    let temperature = required(&ranges.temperature, "temperature")?;
    let top_p = required(&ranges.top_p, "top_p")?;
    let top_k = required(&ranges.top_k, "top_k")?;
    let max_output_tokens = required(&ranges.max_output_tokens, "max_output_tokens")?;

    for &t in temperature {
        if !(TEMPERATURE_BOUNDS.0..=TEMPERATURE_BOUNDS.1).contains(&t) {
            return Err(out_of_domain("temperature", t));
        }
    }
    for &p in top_p {
        if !(TOP_P_BOUNDS.0..=TOP_P_BOUNDS.1).contains(&p) {
            return Err(out_of_domain("top_p", p));
        }
    }
    for &k in top_k {
        if k == 0 {
            return Err(out_of_domain("top_k", k));
        }
    }
    for &m in max_output_tokens {
        if m == 0 {
            return Err(out_of_domain("max_output_tokens", m));
        }
    }

    let mut combinations =
        Vec::with_capacity(temperature.len() * top_p.len() * top_k.len() * max_output_tokens.len());

    for &t in temperature {
        for &p in top_p {
            for &k in top_k {
                for &m in max_output_tokens {
                    combinations.push(ParameterCombination {
                        temperature: t,
                        top_p: p,
                        top_k: Some(k),
                        max_output_tokens: Some(m),
                    });
                }
            }
        }
    }

    Ok(combinations)
}

fn required<'a, T>(
    range: &'a Option<Vec<T>>,
    field: &'static str,
) -> Result<&'a [T], ValidationError> {
    match range {
        None => Err(ValidationError::MissingRange { field }),
        Some(values) if values.is_empty() => Err(ValidationError::EmptyRange { field }),
        Some(values) => Ok(values),
    }
}

fn out_of_domain(field: &'static str, value: impl ToString) -> ValidationError {
    ValidationError::OutOfDomain {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_ranges() -> ParameterRanges {
        ParameterRanges {
            temperature: Some(vec![0.1, 0.7]),
            top_p: Some(vec![0.9, 0.95]),
            top_k: Some(vec![20, 40]),
            max_output_tokens: Some(vec![512]),
        }
    }

    #[test]
    fn test_count_is_product_of_lengths() {
        let combos = expand_combinations(&full_ranges()).expect("expand");
        assert_eq!(combos.len(), 2 * 2 * 2);
    }

    #[test]
    fn test_nested_iteration_order() {
        let combos = expand_combinations(&full_ranges()).expect("expand");
        // temperature outermost: first half all 0.1
        assert!(combos[..4].iter().all(|c| c.temperature == 0.1));
        assert!(combos[4..].iter().all(|c| c.temperature == 0.7));
        // top_k innermost but one: alternates within each top_p block
        assert_eq!(combos[0].top_k, Some(20));
        assert_eq!(combos[1].top_k, Some(40));
        assert_eq!(combos[0].top_p, combos[1].top_p);
    }

    #[test]
    fn test_missing_range_rejected() {
        let mut ranges = full_ranges();
        ranges.top_k = None;
        assert!(matches!(
            expand_combinations(&ranges),
            Err(ValidationError::MissingRange { field: "top_k" })
        ));
    }

    #[test]
    fn test_empty_range_rejected() {
        let mut ranges = full_ranges();
        ranges.max_output_tokens = Some(vec![]);
        assert!(matches!(
            expand_combinations(&ranges),
            Err(ValidationError::EmptyRange {
                field: "max_output_tokens"
            })
        ));
    }

    #[test]
    fn test_out_of_domain_rejected() {
        let mut ranges = full_ranges();
        ranges.temperature = Some(vec![2.5]);
        assert!(matches!(
            expand_combinations(&ranges),
            Err(ValidationError::OutOfDomain {
                field: "temperature",
                ..
            })
        ));

        let mut ranges = full_ranges();
        ranges.top_p = Some(vec![-0.1]);
        assert!(expand_combinations(&ranges).is_err());

        let mut ranges = full_ranges();
        ranges.top_k = Some(vec![0]);
        assert!(expand_combinations(&ranges).is_err());
    }

    #[test]
    fn test_expansion_is_reproducible() {
        let a = expand_combinations(&full_ranges()).expect("expand");
        let b = expand_combinations(&full_ranges()).expect("expand");
        assert_eq!(a, b);
    }
}
