//! Time values expressed in seconds, rendered as `HH:MM:SS`.

use crate::locale::NumberLocale;
use crate::number::parse_number;

/// Multipliers for the colon-separated components, right to left.
const TIME_UNITS: [i64; 4] = [1, 60, 3_600, 86_400];

/// Formats whole seconds as `HH:MM:SS`. Hours are not wrapped into days.
pub fn format_time(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        seconds / 3_600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// Formats seconds as `HH:MM:SS` plus up to `digits` fractional digits.
///
/// Trailing zeros of the fraction are dropped; a fraction that rounds up to
/// a full second is carried into the seconds field.
pub fn format_exact_time(seconds: f64, digits: usize, separator: char) -> String {
    if !seconds.is_finite() {
        return crate::number::format_system_number(seconds);
    }
    let body = exact_time_magnitude(seconds.abs(), digits, separator);
    // no sign on a value that rounds to zero
    if seconds < 0.0 && body.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        format!("-{body}")
    } else {
        body
    }
}

fn exact_time_magnitude(magnitude: f64, digits: usize, separator: char) -> String {
    let whole = magnitude.floor();
    let fraction = magnitude - whole;

    if digits == 0 {
        return format_time(magnitude.round() as i64);
    }

    let scaled = (fraction * 10f64.powi(digits as i32)).round() as u64;
    if scaled == 0 {
        return format_time(whole as i64);
    }
    let rendered = format!("{scaled:0digits$}");
    if rendered.len() > digits {
        return format_time(whole as i64 + 1);
    }
    let rendered = rendered.trim_end_matches('0');
    if rendered.is_empty() {
        format_time(whole as i64)
    } else {
        format!("{}{separator}{rendered}", format_time(whole as i64))
    }
}

/// Exact time in local notation with one fractional digit.
pub fn format_exact_local_time(seconds: f64, locale: &NumberLocale) -> String {
    format_exact_time(seconds, 1, locale.decimal_separator)
}

/// Exact time in system notation with three fractional digits.
pub fn format_exact_system_time(seconds: f64) -> String {
    format_exact_time(seconds, 3, '.')
}

/// Parses `S`, `M:S`, `H:M:S` or `D:H:M:S` into whole seconds.
///
/// Empty components count as zero; every other component must be a
/// non-negative integer.
pub fn parse_time(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > TIME_UNITS.len() {
        return None;
    }

    let mut total = 0i64;
    for (index, part) in parts.iter().enumerate() {
        let part = part.trim();
        let value = if part.is_empty() {
            0
        } else {
            if !part.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            part.parse::<i64>().ok()?
        };
        let unit = TIME_UNITS[parts.len() - 1 - index];
        total = total.checked_add(value.checked_mul(unit)?)?;
    }
    Some(total)
}

/// Parses a signed time value with an optional fractional seconds part
/// (`-01:02:03,5`, `00:00:12.25`).
pub fn parse_exact_time(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if text.is_empty() {
        return None;
    }

    let (whole, fraction) = match text.find(['.', ',']) {
        Some(index) => {
            let digits = &text[index + 1..];
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            (&text[..index], parse_number(&format!("0.{digits}"))?)
        }
        None => (text, 0.0),
    };

    let seconds = parse_time(whole)? as f64 + fraction;
    Some(if negative { -seconds } else { seconds })
}
