//! Report building blocks shared by the CLI commands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use qsim_expr::{Expression, StatisticsContext};
use qsim_filter::{
    FastAccessSettings, FilterFormat, FilterList, FormatOptions, LoadOutcome, format_number_value,
};
use qsim_stats::{StatisticsDocument, StatisticsSource};

/// Message shown when a filter cannot produce a report.
pub const FILTER_FAILED: &str = "could not process filter";

/// One row of the indicator listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorRow {
    pub selector: String,
    pub value: String,
}

pub fn load_statistics(path: &Path) -> Result<StatisticsDocument> {
    StatisticsDocument::from_path(path)
        .with_context(|| format!("load statistics {}", path.display()))
}

pub fn load_filter(path: &Path) -> Result<LoadOutcome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read filter list {}", path.display()))?;
    Ok(FilterList::load(&text))
}

/// Runs `list` against `stats`.
///
/// Fails when the list was only partially readable or produced no output.
pub fn run_filter(
    outcome: &LoadOutcome,
    stats: &dyn StatisticsSource,
    options: &FormatOptions,
) -> Result<String> {
    if !outcome.fully_read {
        tracing::warn!("filter list contains unreadable lines");
        bail!(FILTER_FAILED);
    }
    let output = outcome.list.process(stats, options);
    if output.is_empty() {
        bail!(FILTER_FAILED);
    }
    Ok(output)
}

/// Picks the filter list to run: the given file or the remembered list.
pub fn resolve_filter(path: Option<&Path>, settings: &FastAccessSettings) -> Result<LoadOutcome> {
    match path {
        Some(path) => load_filter(path),
        None if settings.filter_list.trim().is_empty() => {
            bail!("no filter list given and none remembered")
        }
        None => Ok(FilterList::load(&settings.filter_list)),
    }
}

/// Lists every indicator whose selector contains `filter` (case-insensitive).
pub fn indicator_rows(doc: &StatisticsDocument, filter: Option<&str>) -> Vec<IndicatorRow> {
    let needle = filter.map(str::to_lowercase);
    doc.indicators()
        .into_iter()
        .map(|indicator| IndicatorRow {
            selector: indicator.selector,
            value: indicator.value,
        })
        .filter(|row| {
            needle
                .as_deref()
                .is_none_or(|needle| row.selector.to_lowercase().contains(needle))
        })
        .collect()
}

/// Evaluates `text` and formats the result.
///
/// Without `stats` only expressions that do not read statistics can be
/// evaluated.
pub fn evaluate(
    text: &str,
    stats: Option<&dyn StatisticsSource>,
    format: &FilterFormat,
    options: &FormatOptions,
) -> Result<String> {
    let expression = Expression::parse(text).with_context(|| format!("parse expression {text:?}"))?;
    let value = match stats {
        Some(stats) => expression.eval(&StatisticsContext::new(stats)),
        None if expression.has_lookups() => {
            bail!("expression {text:?} reads statistics but no statistics file was given")
        }
        None => expression.eval(&()),
    }
    .with_context(|| format!("evaluate expression {text:?}"))?;
    Ok(format_number_value(value, format, options))
}
