//! Field normalizers for free-text profile attributes.
//!
//! Every parser in this module maps a raw string to a single `f64`, using
//! NaN as the "unknown" sentinel. Parsing never errors: anything that cannot
//! be understood degrades to NaN and is recovered later by imputation.
//!
//! # Examples
//!
//! ```
//! use viabilidad::normalize::{parse_money, parse_employee_range};
//!
//! assert_eq!(parse_money("$1M to $10M"), 5_500_000.0);
//! assert_eq!(parse_employee_range("11-50"), 30.5);
//! assert!(parse_money("unknown").is_nan());
//! ```

/// Returns true if the trimmed, lowercased value is a known placeholder for
/// a missing field.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "unknown" | "nan" | "none" | "" | "\u{2014}" | "\u{2013}" | "-"
    )
}

/// Detects a magnitude suffix (`k`/`m`/`b`) in a cleaned money string and
/// strips every occurrence of the detected letter.
fn detect_magnitude(s: &str) -> (String, f64) {
    if s.contains('k') {
        (s.replace('k', "").trim().to_string(), 1e3)
    } else if s.contains('m') {
        (s.replace('m', "").trim().to_string(), 1e6)
    } else if s.contains('b') {
        (s.replace('b', "").trim().to_string(), 1e9)
    } else {
        (s.trim().to_string(), 1.0)
    }
}

/// Parses a free-text monetary amount or range into a single value.
///
/// Used for both revenue and total funding. Handles:
///
/// - placeholders (`"unknown"`, `"-"`, ...) → NaN
/// - `"$1M to $10M"` → midpoint, each side of the range carrying its own
///   magnitude suffix
/// - `"Less than $1M"` → half the scaled value, with fixed fallbacks
///   (500 / 500,000 / 500,000,000 by detected magnitude) when the residual
///   fails to parse
/// - `"$250K"` / bare numbers → the scaled value itself
/// - anything else → NaN
#[must_use]
pub fn parse_money(raw: &str) -> f64 {
    let value = raw.trim().to_lowercase();
    if is_placeholder(&value) {
        return f64::NAN;
    }
    let cleaned = value.replace(['$', ','], "");
    let (residual, multiplier) = detect_magnitude(&cleaned);

    if residual.contains("to") {
        let parts: Vec<&str> = residual.split("to").collect();
        if parts.len() != 2 {
            return f64::NAN;
        }
        let low = parts[0].trim();
        let (high, high_multiplier) = detect_magnitude(parts[1].trim());
        match (low.parse::<f64>(), high.parse::<f64>()) {
            (Ok(lo), Ok(hi)) => {
                // The left side inherits the outer magnitude; the right side
                // keeps it only when it carries no suffix of its own.
                let hi_mult = if high_multiplier == 1.0 {
                    multiplier
                } else {
                    high_multiplier
                };
                return (lo * multiplier + hi * hi_mult) / 2.0;
            }
            _ => return f64::NAN,
        }
    }

    if residual.contains("less than") {
        let rest = residual.replace("less than", "");
        let (num, rest_multiplier) = detect_magnitude(rest.trim());
        let mult = if rest_multiplier == 1.0 {
            multiplier
        } else {
            rest_multiplier
        };
        return match num.parse::<f64>() {
            Ok(v) => v * mult * 0.5,
            Err(_) => {
                if multiplier == 1e6 {
                    500_000.0
                } else if multiplier == 1e9 {
                    500_000_000.0
                } else {
                    500.0
                }
            }
        };
    }

    residual
        .parse::<f64>()
        .map_or(f64::NAN, |v| v * multiplier)
}

/// Parses an employee-count range into its midpoint.
///
/// `"11-50"` → 30.5, `"1000+"` → 1000.0, `"42"` → 42.0, else NaN.
#[must_use]
pub fn parse_employee_range(raw: &str) -> f64 {
    let value = raw.trim().to_lowercase();
    if is_placeholder(&value) {
        return f64::NAN;
    }
    if value.contains('-') {
        let parts: Vec<&str> = value.split('-').collect();
        if parts.len() != 2 {
            return f64::NAN;
        }
        return match (parts[0].trim().parse::<f64>(), parts[1].trim().parse::<f64>()) {
            (Ok(lo), Ok(hi)) => (lo + hi) / 2.0,
            _ => f64::NAN,
        };
    }
    if value.contains('+') {
        return value.replace('+', "").trim().parse().unwrap_or(f64::NAN);
    }
    value.parse().unwrap_or(f64::NAN)
}

/// Converts a founding year into years of activity.
///
/// Future years are unknowable, so they map to NaN rather than a negative
/// tenure.
#[must_use]
pub fn years_active(founded_year: f64, current_year: f64) -> f64 {
    if founded_year.is_nan() || founded_year > current_year {
        f64::NAN
    } else {
        current_year - founded_year
    }
}

/// Maps a qualitative growth-confidence label to a scalar.
///
/// `low` → 0.3, `medium` → 0.5, `high` → 0.7, case-insensitive. Every other
/// value (including "unknown") defaults to 0.5, which makes "unknown" and
/// "medium" numerically indistinguishable downstream.
#[must_use]
pub fn confidence_score(raw: &str) -> f64 {
    match raw.trim().to_lowercase().as_str() {
        "low" => 0.3,
        "high" => 0.7,
        _ => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        for p in ["unknown", "NONE", "", "\u{2014}", "\u{2013}", "-", "nan"] {
            assert!(parse_money(p).is_nan(), "{p:?} should be unknown");
            assert!(parse_employee_range(p).is_nan(), "{p:?} should be unknown");
        }
    }

    #[test]
    fn test_money_range_midpoint() {
        assert_eq!(parse_money("$1M to $10M"), 5_500_000.0);
        assert_eq!(parse_money("$100K to $500K"), 300_000.0);
    }

    #[test]
    fn test_money_range_mixed_magnitudes() {
        // Left side inherits the first detected suffix, right side its own.
        assert_eq!(parse_money("$500K to $1M"), (500e3 + 1e6) / 2.0);
        assert_eq!(parse_money("$1B to $10B"), 5_500_000_000.0);
    }

    #[test]
    fn test_money_less_than() {
        assert_eq!(parse_money("Less than $1M"), 500_000.0);
        assert_eq!(parse_money("less than $500K"), 250_000.0);
    }

    #[test]
    fn test_money_less_than_fallbacks() {
        // Residual fails to parse: the fallback tracks the detected suffix.
        assert_eq!(parse_money("less than m?"), 500_000.0);
        assert_eq!(parse_money("less than b?"), 500_000_000.0);
        assert_eq!(parse_money("less than ?"), 500.0);
    }

    #[test]
    fn test_money_single_values() {
        assert_eq!(parse_money("$250K"), 250_000.0);
        assert_eq!(parse_money("$3,500,000"), 3_500_000.0);
        assert_eq!(parse_money("1200"), 1200.0);
    }

    #[test]
    fn test_money_garbage() {
        assert!(parse_money("call us").is_nan());
        assert!(parse_money("1 to 2 to 3").is_nan());
    }

    #[test]
    fn test_employee_midpoint() {
        assert_eq!(parse_employee_range("11-50"), 30.5);
        assert_eq!(parse_employee_range("1-10"), 5.5);
    }

    #[test]
    fn test_employee_plus_and_bare() {
        assert_eq!(parse_employee_range("1000+"), 1000.0);
        assert_eq!(parse_employee_range("7"), 7.0);
    }

    #[test]
    fn test_employee_garbage() {
        assert!(parse_employee_range("a-b").is_nan());
        assert!(parse_employee_range("lots").is_nan());
    }

    #[test]
    fn test_years_active() {
        assert_eq!(years_active(2020.0, 2025.0), 5.0);
        assert_eq!(years_active(2025.0, 2025.0), 0.0);
        assert!(years_active(2030.0, 2025.0).is_nan());
        assert!(years_active(f64::NAN, 2025.0).is_nan());
    }

    #[test]
    fn test_confidence_mapping() {
        assert_eq!(confidence_score("Low"), 0.3);
        assert_eq!(confidence_score("MEDIUM"), 0.5);
        assert_eq!(confidence_score("high"), 0.7);
        // Unknown collapses onto medium by design.
        assert_eq!(confidence_score("unknown"), 0.5);
        assert_eq!(confidence_score(""), 0.5);
    }

    #[test]
    fn test_idempotent() {
        let a = parse_money("$1M to $10M");
        let b = parse_money("$1M to $10M");
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
