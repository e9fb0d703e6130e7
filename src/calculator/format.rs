//! Result rounding and display formatting.

use super::error::CalcError;
use super::number::{number_to_text, to_exponential, to_fixed};

/// Widest result or operand the display shows before falling back.
pub const DISPLAY_WIDTH: usize = 9;

/// Largest magnitude shown in plain notation.
const PLAIN_LIMIT: f64 = 999_999_999.0;

const ROUNDING_SCALE: f64 = 1e8;
const SCIENTIFIC_FRACTION_DIGITS: usize = 3;
const TRUNCATED_FRACTION_DIGITS: usize = 6;

/// A computed value together with the text the operand buffer shows for it.
///
/// `text` may be a lossy scientific rendering; `value` stays exact and is
/// what later arithmetic reads.
#[derive(Clone, Debug, PartialEq)]
pub struct Computed {
    pub value: f64,
    pub text: String,
}

impl Computed {
    /// Wrap an unrounded value (unary function results).
    pub fn raw(value: f64) -> Self {
        Self {
            value,
            text: number_to_text(value),
        }
    }
}

/// Post-process a binary operation's result.
///
/// Rounds to 8 decimal places, then, if the text is wider than the display,
/// either switches to scientific notation (large magnitudes) or drops to 6
/// decimal places. Fails with `Overflow` when the value is too large to
/// scale for rounding.
pub fn finish_result(value: f64) -> Result<Computed, CalcError> {
    let rounded = round_to_scale(value).ok_or(CalcError::Overflow)?;
    let text = number_to_text(rounded);

    if text.len() <= DISPLAY_WIDTH {
        return Ok(Computed {
            value: rounded,
            text,
        });
    }

    let computed = if rounded.abs() > PLAIN_LIMIT {
        Computed {
            value: rounded,
            text: to_exponential(rounded, SCIENTIFIC_FRACTION_DIGITS),
        }
    } else {
        Computed::raw(to_fixed(rounded, TRUNCATED_FRACTION_DIGITS))
    };
    Ok(computed)
}

/// Format an operand string for the display.
pub fn display_text(operand: &str) -> String {
    if operand.contains('e') {
        return operand.to_string();
    }

    let integer_part = operand.split('.').next().unwrap_or(operand);
    if integer_part.len() > DISPLAY_WIDTH
        && let Ok(value) = operand.parse::<f64>()
    {
        return to_exponential(value, SCIENTIFIC_FRACTION_DIGITS);
    }

    operand.to_string()
}

/// `None` when scaling by 10^8 leaves the finite range.
fn round_to_scale(value: f64) -> Option<f64> {
    let scaled = (value + f64::EPSILON) * ROUNDING_SCALE;
    scaled
        .is_finite()
        .then(|| round_half_up(scaled) / ROUNDING_SCALE)
}

/// Round to the nearest integer, ties toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floating_artifacts_are_rounded() {
        let result = finish_result(0.1 + 0.2).unwrap();
        assert_eq!(result.text, "0.3");
        assert_eq!(result.value, 0.3);
    }

    #[test]
    fn test_large_results_switch_to_scientific() {
        let result = finish_result(999_999_999.0 + 1.0).unwrap();
        assert_eq!(result.text, "1.000e+9");
        assert_eq!(result.value, 1e9);

        let result = finish_result(-123_456_789_012.0).unwrap();
        assert_eq!(result.text, "-1.235e+11");
    }

    #[test]
    fn test_long_fractions_truncate_to_six_places() {
        let result = finish_result(1.0 / 3.0).unwrap();
        assert_eq!(result.text, "0.333333");
        assert_eq!(result.value, 0.333333);

        let result = finish_result(2.0 / 3.0).unwrap();
        assert_eq!(result.text, "0.666667");
    }

    #[test]
    fn test_short_results_untouched() {
        assert_eq!(finish_result(20.0).unwrap().text, "20");
        assert_eq!(finish_result(-7.5).unwrap().text, "-7.5");
        assert_eq!(finish_result(999_999_999.0).unwrap().text, "999999999");
    }

    #[test]
    fn test_unscalable_results_overflow() {
        assert_eq!(finish_result(1e301), Err(CalcError::Overflow));
        assert_eq!(finish_result(-1e305), Err(CalcError::Overflow));

        let result = finish_result(1e300).unwrap();
        assert_eq!(result.text, "1.000e+300");
    }

    #[test]
    fn test_rounding_ties_go_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text("123"), "123");
        assert_eq!(display_text("0."), "0.");
        assert_eq!(display_text("1.000e+9"), "1.000e+9");
        assert_eq!(display_text("9999999800000001"), "1.000e+16");
        assert_eq!(display_text("0.3333333333333333"), "0.3333333333333333");
    }
}
