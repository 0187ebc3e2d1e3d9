//! Empirical distributions stored as `;`-separated density lists.

use qsim_format::{NumberLocale, format_number_max, format_system_number, parse_number};

/// Separator used by the results file between density values.
pub const DENSITY_SEPARATOR: char = ';';

/// Density values indexed by their argument (`0, 1, 2, ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    density: Vec<f64>,
}

impl Distribution {
    pub fn new(density: Vec<f64>) -> Self {
        Self { density }
    }

    /// Parses a density list such as `0;3;5,5;1`.
    ///
    /// A trailing separator is tolerated. Returns `None` when any entry is
    /// not a number.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Some(Self::default());
        }
        let text = text.strip_suffix(DENSITY_SEPARATOR).unwrap_or(text);
        text.split(DENSITY_SEPARATOR)
            .map(parse_number)
            .collect::<Option<Vec<f64>>>()
            .map(Self::new)
    }

    /// Whether `text` looks like a distribution rather than a single value.
    pub fn is_distribution(text: &str) -> bool {
        text.contains(DENSITY_SEPARATOR)
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn sum(&self) -> f64 {
        self.density.iter().sum()
    }

    /// Mean of the argument weighted by density.
    pub fn mean(&self) -> f64 {
        self.moment(1)
    }

    pub fn standard_deviation(&self) -> f64 {
        let mean = self.mean();
        (self.moment(2) - mean * mean).max(0.0).sqrt()
    }

    /// Coefficient of variation; `0` when either the mean or the standard
    /// deviation is zero.
    pub fn cv(&self) -> f64 {
        let sd = self.standard_deviation();
        if sd == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        if mean == 0.0 {
            return 0.0;
        }
        sd / mean.abs()
    }

    /// Renders in system notation joined by `separator`.
    pub fn to_system_string(&self, separator: &str) -> String {
        self.density
            .iter()
            .map(|&value| format_system_number(value))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Renders in local notation joined by `separator`.
    pub fn to_local_string(&self, separator: &str, locale: &NumberLocale) -> String {
        self.density
            .iter()
            .map(|&value| format_number_max(value, locale))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn moment(&self, power: i32) -> f64 {
        let total = self.sum();
        if self.density.is_empty() || total == 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .density
            .iter()
            .enumerate()
            .map(|(index, &weight)| weight * (index as f64).powi(power))
            .sum();
        weighted / total
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_are_index_weighted() {
        let dist = Distribution::parse("0;1;2;1").unwrap();
        assert_eq!(dist.sum(), 4.0);
        assert_eq!(dist.mean(), 2.0);
        assert!((dist.standard_deviation() - 0.5f64.sqrt()).abs() < 1e-12);
        assert!((dist.cv() - 0.5f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_distributions() {
        let empty = Distribution::parse("").unwrap();
        assert_eq!(empty.mean(), 0.0);
        assert_eq!(empty.cv(), 0.0);
        let point = Distribution::parse("5;").unwrap();
        assert_eq!(point.density(), &[5.0]);
        assert_eq!(point.standard_deviation(), 0.0);
        assert!(Distribution::parse("1;x;2").is_none());
    }

    #[test]
    fn renders_in_both_notations() {
        let dist = Distribution::parse("0.5;1,25;3").unwrap();
        assert_eq!(dist.to_system_string(";"), "0.5;1.25;3");
        assert_eq!(dist.to_local_string(";", &NumberLocale::german()), "0,5;1,25;3");
    }
}
