//! Numeric parsing and formatting.

use crate::locale::NumberLocale;

/// Largest number of fractional digits rendered by any formatter.
pub const MAX_DIGITS: usize = 14;

/// Magnitudes below this render as `0`.
const ZERO_EPSILON: f64 = 1e-15;

/// Integral values up to this magnitude skip fixed-point rendering.
const PLAIN_INTEGER_LIMIT: f64 = 1e9;

/// Parses a number in system or local notation.
///
/// Accepts an optional sign, digits, a single decimal separator (`.` or `,`
/// independent of the locale), an optional exponent, and the literals
/// `Infinity`/`-Infinity`. Grouping separators are not accepted, so strings
/// such as version numbers (`1.2.3`) or dates are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "" | "NaN" => return None,
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let mut normalized = String::with_capacity(text.len());
    let mut seen_digit = false;
    let mut seen_separator = false;
    let mut seen_exponent = false;
    let mut previous: Option<char> = None;
    for (index, c) in text.char_indices() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                normalized.push(c);
            }
            '+' | '-' if index == 0 || matches!(previous, Some('e' | 'E')) => normalized.push(c),
            '.' | ',' if !seen_separator && !seen_exponent => {
                seen_separator = true;
                normalized.push('.');
            }
            'e' | 'E' if seen_digit && !seen_exponent => {
                seen_exponent = true;
                normalized.push('e');
            }
            _ => return None,
        }
        previous = Some(c);
    }
    if !seen_digit {
        return None;
    }
    normalized.parse::<f64>().ok()
}

/// Parses a number that may carry a trailing `%` (divided by 100).
pub fn parse_number_ext(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.strip_suffix('%') {
        Some(stripped) => parse_number(stripped).map(|value| value / 100.0),
        None => parse_number(text),
    }
}

/// Formats `value` with at most `digits` fractional digits in local notation.
///
/// Trailing zeros (and a dangling decimal separator) are removed, integral
/// values are printed without a fractional part and without grouping.
pub fn format_number(value: f64, digits: usize, locale: &NumberLocale) -> String {
    format_with_separator(value, digits.min(MAX_DIGITS), locale.decimal_separator)
}

/// Formats `value` with the maximum supported precision in local notation.
pub fn format_number_max(value: f64, locale: &NumberLocale) -> String {
    format_with_separator(value, MAX_DIGITS, locale.decimal_separator)
}

/// Formats `value` with the maximum supported precision in system notation.
pub fn format_system_number(value: f64) -> String {
    format_with_separator(value, MAX_DIGITS, '.')
}

/// Formats a fraction as a percentage (`0.25` → `25%`).
pub fn format_percent(value: f64, digits: usize, locale: &NumberLocale) -> String {
    let mut out = format_number(value * 100.0, digits, locale);
    out.push('%');
    out
}

/// Formats an integer with grouping separators every three digits.
pub fn format_long(value: i64, locale: &NumberLocale) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    let len = digits.len();
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(locale.grouping_separator);
        }
        out.push(c);
    }
    out
}

/// Re-renders a system-notation number in local notation.
///
/// A trailing `%` is preserved. Text that is not a number is returned as is.
pub fn system_to_local(text: &str, locale: &NumberLocale) -> String {
    let (body, percent) = match text.strip_suffix('%') {
        Some(stripped) => (stripped, true),
        None => (text, false),
    };
    let Some(value) = parse_number(body) else {
        return text.to_string();
    };
    let mut out = format_number_max(value, locale);
    if percent {
        out.push('%');
    }
    out
}

fn format_with_separator(value: f64, digits: usize, separator: char) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.abs() < ZERO_EPSILON {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() <= PLAIN_INTEGER_LIMIT {
        return format!("{}", value as i64);
    }

    let negative = value < 0.0;
    let magnitude = value.abs();
    let body = if (magnitude.floor() - magnitude).abs() < ZERO_EPSILON && magnitude < 2e9 {
        format!("{}", magnitude.floor() as i64)
    } else {
        fixed_point(magnitude, digits, separator)
    };
    if negative && body != "0" {
        format!("-{body}")
    } else {
        body
    }
}

/// Renders a non-negative finite value with at most `digits` fractional
/// digits, rounding half up on the shortest round-trip decimal form.
fn fixed_point(magnitude: f64, digits: usize, separator: char) -> String {
    let shortest = format!("{magnitude}");
    let (integer, fraction) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));
    let mut integer: Vec<u8> = integer.bytes().map(|b| b - b'0').collect();
    let mut fraction_digits: Vec<u8> = fraction.bytes().take(digits).map(|b| b - b'0').collect();

    let round_up = fraction.as_bytes().get(digits).is_some_and(|&b| b >= b'5');
    if round_up {
        let mut carry = true;
        for digit in fraction_digits.iter_mut().rev().chain(integer.iter_mut().rev()) {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            integer.insert(0, 1);
        }
    }

    while fraction_digits.last() == Some(&0) {
        fraction_digits.pop();
    }

    let mut out: String = integer.iter().map(|d| char::from(b'0' + d)).collect();
    if !fraction_digits.is_empty() {
        out.push(separator);
        out.extend(fraction_digits.iter().map(|d| char::from(b'0' + d)));
    }
    out
}
