//! Significant-figure rounding
//!
//! Sampled coefficients carry floating-point noise from the interpolation.
//! Rounding every value through here before it is used as a cache key or
//! reported keeps candidate identity stable across runs.

use crate::{Error, Result};

/// Default number of significant figures.
pub const DEFAULT_SIGFIGS: usize = 6;

/// Round `value` to `sigfigs` significant decimal digits.
///
/// Rounding is done by decimal formatting, so an exact tie resolves the same
/// way the formatter resolves it (half to even). A request for zero figures
/// is treated as one. Non-finite values are returned unchanged, and both
/// zeros come back as `+0.0` so a rounded value has one textual form.
///
/// # Example
///
/// ```rust
/// use downforce::aero::round_sigfigs;
///
/// assert_eq!(round_sigfigs(123_456.789, 6), 123_457.0);
/// assert_eq!(round_sigfigs(0.000_123_456_7, 3), 0.000_123);
/// ```
#[must_use]
pub fn round_sigfigs(value: f64, sigfigs: usize) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    if !value.is_finite() {
        return value;
    }
    let precision = sigfigs.max(1) - 1;
    format!("{value:.precision$e}").parse().unwrap_or(value)
}

/// Parse a numeric field and round it to `sigfigs` significant figures.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `text` is not a number.
pub fn parse_sigfigs(text: &str, sigfigs: usize) -> Result<f64> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| Error::InvalidInput(format!("'{trimmed}' is not a number")))?;
    Ok(round_sigfigs(value, sigfigs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_large_value() {
        assert_eq!(round_sigfigs(123_456.789, 6), 123_457.0);
    }

    #[test]
    fn test_round_small_value() {
        assert_eq!(round_sigfigs(0.000_123_456_7, 3), 0.000_123);
    }

    #[test]
    fn test_round_negative_value() {
        assert_eq!(round_sigfigs(-0.648_436_123, 4), -0.6484);
    }

    #[test]
    fn test_round_collapses_noise() {
        let noisy = -4.0 + 4.0 * f64::EPSILON;
        assert_eq!(round_sigfigs(noisy, 6), -4.0);
    }

    #[test]
    fn test_round_zero_sigfigs_behaves_as_one() {
        assert_eq!(round_sigfigs(0.0567, 0), 0.06);
    }

    #[test]
    fn test_round_passes_through_special_values() {
        assert_eq!(round_sigfigs(0.0, 6), 0.0);
        assert!(round_sigfigs(f64::NAN, 6).is_nan());
        assert_eq!(round_sigfigs(f64::INFINITY, 6), f64::INFINITY);
    }

    #[test]
    fn test_round_negative_zero_is_positive_zero() {
        let rounded = round_sigfigs(-0.0, 6);
        assert!(rounded.is_sign_positive());
        assert_eq!(rounded.to_string(), "0");
    }

    #[test]
    fn test_parse_numeric_text() {
        assert_eq!(parse_sigfigs(" 83.1234567 ", 6).unwrap(), 83.1235);
    }

    #[test]
    fn test_parse_rejects_text() {
        let err = parse_sigfigs("fast", 6).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("fast")));
    }
}
