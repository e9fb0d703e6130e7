//! The operand under active entry.
//!
//! Digits are kept as text until an evaluation boundary so that leading
//! zero suppression, the single decimal point and the entry length cap
//! behave exactly as typed.

use super::error::CalcError;
use super::format::Computed;

#[derive(Clone, Debug, PartialEq)]
pub struct OperandBuffer {
    text: String,
    /// Exact value of a loaded result whose text may be lossy.
    pinned: Option<f64>,
    max_len: usize,
}

impl OperandBuffer {
    pub fn new(max_len: usize) -> Self {
        Self {
            text: "0".to_string(),
            pinned: None,
            max_len,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_zero(&self) -> bool {
        self.text == "0"
    }

    /// Reset to the identity operand `"0"`.
    pub fn reset(&mut self) {
        self.replace_text("0".to_string());
    }

    /// Start a fresh operand with a single digit.
    pub fn start_with_digit(&mut self, digit: char) {
        self.replace_text(digit.to_string());
    }

    /// Append a digit, replacing a lone `"0"`.
    ///
    /// Returns `false` when the entry is already at its length cap and the
    /// digit was dropped.
    pub fn push_digit(&mut self, digit: char) -> bool {
        if self.is_zero() {
            self.replace_text(digit.to_string());
            return true;
        }
        if self.text.len() >= self.max_len {
            return false;
        }
        self.pinned = None;
        self.text.push(digit);
        true
    }

    /// Start a fresh operand as `"0."`.
    pub fn start_decimal(&mut self) {
        self.replace_text("0.".to_string());
    }

    /// Append a decimal point unless one is already present.
    pub fn push_decimal_point(&mut self) -> bool {
        if self.text.contains('.') {
            return false;
        }
        self.pinned = None;
        self.text.push('.');
        true
    }

    /// Remove the last character, falling back to `"0"`.
    pub fn pop(&mut self) {
        if self.is_zero() {
            return;
        }
        if self.text.chars().count() > 1 {
            self.pinned = None;
            self.text.pop();
        } else {
            self.reset();
        }
    }

    /// Flip the leading minus sign on the text.
    ///
    /// The identity operand `"0"` has no sign and is left alone.
    pub fn toggle_sign(&mut self) -> bool {
        if self.is_zero() {
            return false;
        }
        self.text = match self.text.strip_prefix('-') {
            Some(unsigned) => unsigned.to_string(),
            None => format!("-{}", self.text),
        };
        self.pinned = self.pinned.map(|value| -value);
        true
    }

    /// Replace the operand with a computed value.
    pub fn load(&mut self, computed: &Computed) {
        self.text = computed.text.clone();
        self.pinned = Some(computed.value);
    }

    /// The numeric value of the operand.
    pub fn value(&self) -> Result<f64, CalcError> {
        match self.pinned {
            Some(value) => Ok(value),
            None => parse_operand(&self.text),
        }
    }

    fn replace_text(&mut self, text: String) {
        self.text = text;
        self.pinned = None;
    }
}

/// Parse the leading number of operand text.
///
/// Trailing text that does not continue the number is ignored, so a
/// scientific result cut short by delete (`1.000e+`) still reads as its
/// mantissa. Text with no leading digits, or a non-finite value, is
/// rejected.
pub fn parse_operand(text: &str) -> Result<f64, CalcError> {
    let invalid = || CalcError::InvalidOperand(text.to_string());
    let prefix = numeric_prefix(text).ok_or_else(invalid)?;
    prefix
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(invalid)
}

/// The longest prefix of the form `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut mantissa_digits = digits_from(end);
    end += mantissa_digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    Some(&text[..end])
}
