//! Number-to-text conversions used by the result formatter.
//!
//! `number_to_text` produces the shortest string that round-trips to the
//! same `f64`, switching to exponent form outside `[1e-7, 1e21)`.
//! `to_exponential` and `to_fixed` round the *exact* binary value, with
//! ties going away from zero, so a value like `1000500000` becomes
//! `1.001e+9` rather than the half-to-even `1.000e+9`.

/// Enough digits to hold the full decimal expansion of any finite `f64`.
const EXACT_PRECISION: usize = 800;

/// Render a number the way the display stores it.
pub fn number_to_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, exponent) = split_scientific(&format!("{:e}", value.abs()));
    let digits = digits_to_string(&digits);
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let (first, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{}.{}", first, rest)
        };
        format!("{}{}", mantissa, exponent_suffix(n - 1))
    };

    format!("{}{}", sign, body)
}

/// Scientific notation with exactly `fraction_digits` digits after the point,
/// e.g. `to_exponential(1e9, 3) == "1.000e+9"`.
pub fn to_exponential(value: f64, fraction_digits: usize) -> String {
    if !value.is_finite() {
        return number_to_text(value);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, exponent) = exact_digits(value.abs());
    let (rounded, exponent) = round_half_up(&digits, exponent, fraction_digits + 1);
    let rounded = digits_to_string(&rounded);
    let (first, rest) = rounded.split_at(1);

    if rest.is_empty() {
        format!("{}{}{}", sign, first, exponent_suffix(exponent))
    } else {
        format!("{}{}.{}{}", sign, first, rest, exponent_suffix(exponent))
    }
}

/// Round to `fraction_digits` decimal places and return the value the
/// rounded decimal string denotes.
pub fn to_fixed(value: f64, fraction_digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    let (digits, exponent) = exact_digits(value.abs());
    let keep = exponent + 1 + fraction_digits as i32;
    if keep < 0 {
        return sign * 0.0;
    }

    let (rounded, exponent) = round_half_up(&digits, exponent, keep as usize);
    if rounded.is_empty() {
        return sign * 0.0;
    }

    let scale = exponent - (rounded.len() as i32 - 1);
    let text = format!("{}e{}", digits_to_string(&rounded), scale);
    sign * text.parse::<f64>().unwrap_or(0.0)
}

/// Full decimal expansion of a non-negative finite value as
/// `(d0 d1 d2 ..., e)` meaning `d0.d1d2... × 10^e`.
fn exact_digits(value: f64) -> (Vec<u8>, i32) {
    split_scientific(&format!("{:.*e}", EXACT_PRECISION, value))
}

fn split_scientific(text: &str) -> (Vec<u8>, i32) {
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text, "0"));
    let digits = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    (digits, exponent.parse().unwrap_or(0))
}

/// Keep `keep` significant digits, rounding half away from zero.
///
/// Returns an empty digit list when `keep == 0` and the value rounds down.
fn round_half_up(digits: &[u8], exponent: i32, keep: usize) -> (Vec<u8>, i32) {
    let mut kept: Vec<u8> = digits.iter().take(keep).copied().collect();
    kept.resize(keep, 0);

    if digits.get(keep).is_none_or(|&d| d < 5) {
        return (kept, exponent);
    }

    for slot in kept.iter_mut().rev() {
        if *slot == 9 {
            *slot = 0;
        } else {
            *slot += 1;
            return (kept, exponent);
        }
    }

    // Every kept digit carried over: 9.99 -> 10.0
    kept.insert(0, 1);
    kept.truncate(keep.max(1));
    (kept, exponent + 1)
}

fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

fn exponent_suffix(exponent: i32) -> String {
    if exponent < 0 {
        format!("e-{}", -exponent)
    } else {
        format!("e+{}", exponent)
    }
}
