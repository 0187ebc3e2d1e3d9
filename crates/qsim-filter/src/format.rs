//! Output format state and value formatting.

use qsim_format::{
    NumberLocale, format_exact_local_time, format_exact_system_time, format_number,
    format_system_number, parse_exact_time, parse_number_ext,
};
use qsim_stats::Distribution;

/// Paths whose values are shown verbatim (version strings, dates, names).
///
/// Each entry is a comma-separated list of tags from the document element
/// down; `*` matches any tag.
pub const DEFAULT_DO_NOT_FORMAT: [&str; 6] = [
    "Statistics,Model,ModelVersion",
    "Statistics,Model,ModelName",
    "Statistics,Model,ModelDescription",
    "Statistics,Simulation,RunDate",
    "Statistics,Simulation,RunOS",
    "Statistics,Simulation,RunUser",
];

/// Separator between the values of a re-rendered distribution.
const DISTRIBUTION_SEPARATOR: &str = ";";

/// Format flags threaded through one pass over a filter list.
///
/// Starts as number, fraction, local notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterFormat {
    /// Render values as times instead of numbers.
    pub time: bool,
    /// Render values as percentages instead of fractions.
    pub percent: bool,
    /// Render values in system instead of local notation.
    pub system: bool,
}

impl FilterFormat {
    pub fn set_system(&mut self) {
        self.system = true;
    }

    pub fn set_local(&mut self) {
        self.system = false;
    }

    pub fn set_fraction(&mut self) {
        self.percent = false;
        self.time = false;
    }

    pub fn set_percent(&mut self) {
        self.percent = true;
        self.time = false;
    }

    pub fn set_time(&mut self) {
        self.time = true;
    }

    pub fn set_number(&mut self) {
        self.time = false;
    }
}

/// Settings that shape how values are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub locale: NumberLocale,
    /// Fractional digits for plain numbers in local notation.
    pub number_digits: usize,
    /// Fractional digits for percentages in local notation.
    pub percent_digits: usize,
    /// Paths (see [`DEFAULT_DO_NOT_FORMAT`]) whose values are never reformatted.
    pub do_not_format: Vec<Vec<String>>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            locale: NumberLocale::default(),
            number_digits: 1,
            percent_digits: 1,
            do_not_format: DEFAULT_DO_NOT_FORMAT
                .iter()
                .map(|entry| split_path(entry))
                .collect(),
        }
    }
}

impl FormatOptions {
    /// Whether the value found at `path` must be shown verbatim.
    pub fn is_protected(&self, path: &[String]) -> bool {
        !path.is_empty()
            && self.do_not_format.iter().any(|entry| {
                entry.len() == path.len()
                    && entry
                        .iter()
                        .zip(path)
                        .all(|(pattern, tag)| pattern == "*" || pattern.eq_ignore_ascii_case(tag))
            })
    }
}

/// Splits a comma-separated do-not-format entry into tags.
pub fn split_path(entry: &str) -> Vec<String> {
    entry
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Formats a raw value found at `path`.
///
/// Protected paths and values that are neither numbers, times nor
/// distributions are returned unchanged.
pub fn format_value(
    raw: &str,
    path: &[String],
    format: &FilterFormat,
    options: &FormatOptions,
) -> String {
    if options.is_protected(path) {
        return raw.to_string();
    }

    if Distribution::is_distribution(raw) {
        return match Distribution::parse(raw) {
            Some(dist) if format.system => dist.to_system_string(DISTRIBUTION_SEPARATOR),
            Some(dist) => dist.to_local_string(DISTRIBUTION_SEPARATOR, &options.locale),
            None => raw.to_string(),
        };
    }

    let value = if raw.contains(':') {
        parse_exact_time(raw)
    } else {
        parse_number_ext(raw)
    };
    match value {
        Some(value) => format_number_value(value, format, options),
        None => raw.to_string(),
    }
}

/// Formats a number according to the current flags.
pub fn format_number_value(value: f64, format: &FilterFormat, options: &FormatOptions) -> String {
    if format.time {
        return if format.system {
            format_exact_system_time(value)
        } else {
            format_exact_local_time(value, &options.locale)
        };
    }

    let (value, suffix, digits) = if format.percent {
        (value * 100.0, "%", options.percent_digits)
    } else {
        (value, "", options.number_digits)
    };
    let mut out = if format.system {
        format_system_number(value)
    } else {
        format_number(value, digits, &options.locale)
    };
    out.push_str(suffix);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|tag| (*tag).to_string()).collect()
    }

    #[test]
    fn negative_time_rounding_to_zero_is_unsigned() {
        let mut format = FilterFormat::default();
        format.set_time();
        let options = FormatOptions::default();
        assert_eq!(format_number_value(-0.04, &format, &options), "00:00:00");
        assert_eq!(format_number_value(-90.0, &format, &options), "-00:01:30");
    }

    #[test]
    fn toggles_follow_last_instruction() {
        let mut format = FilterFormat::default();
        format.set_time();
        format.set_percent();
        assert!(format.percent && !format.time);
        format.set_time();
        format.set_fraction();
        assert!(!format.percent && !format.time);
        format.set_system();
        format.set_local();
        assert!(!format.system);
    }

    #[test]
    fn protected_paths_match_case_insensitively() {
        let options = FormatOptions::default();
        assert!(options.is_protected(&path(&["statistics", "MODEL", "ModelVersion"])));
        assert!(!options.is_protected(&path(&["Statistics", "Model"])));
        assert!(!options.is_protected(&[]));

        let wildcard = FormatOptions {
            do_not_format: vec![split_path("Statistics, *, Name")],
            ..FormatOptions::default()
        };
        assert!(wildcard.is_protected(&path(&["Statistics", "Station", "Name"])));
    }

    #[test]
    fn number_formatting_by_flags() {
        let options = FormatOptions {
            locale: NumberLocale::german(),
            number_digits: 2,
            percent_digits: 1,
            ..FormatOptions::default()
        };
        let mut format = FilterFormat::default();
        assert_eq!(format_number_value(0.8125, &format, &options), "0,81");
        format.set_percent();
        assert_eq!(format_number_value(0.8125, &format, &options), "81,3%");
        format.set_system();
        assert_eq!(format_number_value(0.8125, &format, &options), "81.25%");
        format.set_time();
        assert_eq!(format_number_value(3_725.25, &format, &options), "01:02:05.25");
        format.set_local();
        assert_eq!(format_number_value(3_725.25, &format, &options), "01:02:05,3");
    }

    #[test]
    fn raw_values_pass_through() {
        let options = FormatOptions::default();
        let format = FilterFormat::default();
        assert_eq!(format_value("5.2.0", &[], &format, &options), "5.2.0");
        assert_eq!(format_value("Call center", &[], &format, &options), "Call center");
        assert_eq!(
            format_value("12.25", &path(&["Statistics", "Model", "ModelVersion"]), &format, &options),
            "12.25"
        );
    }

    #[test]
    fn distributions_and_times() {
        let options = FormatOptions {
            locale: NumberLocale::german(),
            ..FormatOptions::default()
        };
        let mut format = FilterFormat::default();
        assert_eq!(format_value("0.5;1.25", &[], &format, &options), "0,5;1,25");
        assert_eq!(format_value("0:01:30", &[], &format, &options), "90");
        format.set_system();
        assert_eq!(format_value("0.5;1.25", &[], &format, &options), "0.5;1.25");
        assert_eq!(format_value("1;a", &[], &format, &options), "1;a");
    }
}
