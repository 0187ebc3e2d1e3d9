//! A single filter instruction.

use std::fmt;

use qsim_expr::{Expression, StatisticsContext};
use qsim_stats::StatisticsSource;

use crate::format::{FilterFormat, FormatOptions, format_number_value, format_value};
use crate::mode::FilterMode;

/// One instruction of a filter list.
///
/// The text payload only matters for [`FilterMode::has_text`] modes; two
/// records of a non-text mode compare equal whatever text they carry.
#[derive(Debug, Clone)]
pub struct FilterRecord {
    pub mode: FilterMode,
    pub text: Option<String>,
}

impl FilterRecord {
    pub fn new(mode: FilterMode) -> Self {
        Self { mode, text: None }
    }

    pub fn with_text(mode: FilterMode, text: impl Into<String>) -> Self {
        Self {
            mode,
            text: Some(text.into()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_text(FilterMode::Text, text)
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Self::with_text(FilterMode::Expression, expression)
    }

    pub fn xml(selector: impl Into<String>) -> Self {
        Self::with_text(FilterMode::Xml, selector)
    }

    /// The payload as seen by [`process`](Self::process): empty for non-text
    /// modes and for missing text.
    pub fn text_value(&self) -> &str {
        match &self.text {
            Some(text) if self.mode.has_text() => text,
            _ => "",
        }
    }

    /// Runs this instruction and returns the produced fragment.
    ///
    /// Never fails: unresolvable lookups and invalid expressions degrade to
    /// their stored text.
    pub fn process(
        &self,
        stats: &dyn StatisticsSource,
        format: &mut FilterFormat,
        options: &FormatOptions,
    ) -> String {
        match self.mode {
            FilterMode::NewLine => "\n".to_string(),
            FilterMode::Tabulator => "\t".to_string(),
            FilterMode::Space => " ".to_string(),
            FilterMode::Text => self.text_value().to_string(),
            FilterMode::Xml => self.process_xml(stats, format, options),
            FilterMode::Expression => self.process_expression(stats, format, options),
            FilterMode::FormatSystem => {
                format.set_system();
                String::new()
            }
            FilterMode::FormatLocal => {
                format.set_local();
                String::new()
            }
            FilterMode::FormatFraction => {
                format.set_fraction();
                String::new()
            }
            FilterMode::FormatPercent => {
                format.set_percent();
                String::new()
            }
            FilterMode::FormatTime => {
                format.set_time();
                String::new()
            }
            FilterMode::FormatNumber => {
                format.set_number();
                String::new()
            }
        }
    }

    fn process_xml(
        &self,
        stats: &dyn StatisticsSource,
        format: &FilterFormat,
        options: &FormatOptions,
    ) -> String {
        let selector = self.text_value();
        match stats.resolve(selector) {
            Ok(resolved) => format_value(&resolved.value, &resolved.path, format, options),
            Err(err) => {
                tracing::debug!(selector, error = %err, "xml lookup failed");
                selector.to_string()
            }
        }
    }

    fn process_expression(
        &self,
        stats: &dyn StatisticsSource,
        format: &FilterFormat,
        options: &FormatOptions,
    ) -> String {
        let text = self.text_value();
        let expression = match Expression::parse(text) {
            Ok(expression) => expression,
            Err(err) => {
                return format!(
                    "{text}\ncould not process, error at position {}",
                    err.display_position()
                );
            }
        };
        match expression.eval(&StatisticsContext::new(stats)) {
            Ok(value) => format_number_value(value, format, options),
            Err(err) => {
                tracing::debug!(expression = text, error = %err, "expression evaluation failed");
                text.to_string()
            }
        }
    }
}

impl PartialEq for FilterRecord {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.text_value() == other.text_value()
    }
}

impl Eq for FilterRecord {}

impl fmt::Display for FilterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mode.has_text() {
            write!(f, "{}: {}", self.mode, self.text_value())
        } else {
            write!(f, "{}", self.mode)
        }
    }
}
