use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span, warn};

use qsim_filter::{
    FastAccessSettings, FilterFormat, FormatOptions, default_settings_path, load_settings,
    save_settings,
};
use qsim_format::NumberLocale;
use qsim_stats::StatisticsSource;

use qsim_cli::report::{
    evaluate, indicator_rows, load_filter, load_statistics, resolve_filter, run_filter as process,
};

use crate::cli::{CheckArgs, EvalArgs, FilterArgs, ListArgs, NotationArgs, ValueStyleArg};
use crate::summary::{print_indicators, print_records};

/// Settings file location and contents for one invocation.
pub struct SettingsContext {
    path: Option<PathBuf>,
    settings: FastAccessSettings,
}

impl SettingsContext {
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = explicit.map(Path::to_path_buf).or_else(default_settings_path);
        let settings = match &path {
            Some(path) => load_settings(path),
            None => {
                warn!("Could not determine settings path, using defaults");
                FastAccessSettings::default()
            }
        };
        Self { path, settings }
    }

    fn format_options(&self, notation: &NotationArgs) -> Result<FormatOptions> {
        let mut options = self.settings.format_options();
        if let Some(language) = &notation.locale {
            options.locale = NumberLocale::from_language(language)
                .ok_or_else(|| anyhow!("unknown locale {language:?} (expected en or de)"))?;
        }
        if let Some(digits) = notation.digits {
            options.number_digits = usize::from(digits);
            options.percent_digits = usize::from(digits);
        }
        Ok(options)
    }
}

pub fn run_filter(args: &FilterArgs, context: &mut SettingsContext) -> Result<()> {
    let span = info_span!("filter", statistics = %args.statistics.display());
    let _guard = span.enter();

    let options = context.format_options(&args.notation)?;
    let outcome = resolve_filter(args.filter.as_deref(), &context.settings)?;
    let stats = load_statistics(&args.statistics)?;
    let output = process(&outcome, &stats, &options)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("write report {}", path.display()))?;
            info!("Wrote report to {:?}", path);
        }
        None => println!("{output}"),
    }

    if args.remember && context.settings.remember(&outcome.list) {
        let path = context
            .path
            .as_deref()
            .ok_or_else(|| anyhow!("no settings file to remember the filter list in"))?;
        save_settings(path, &context.settings).context("save settings")?;
    }
    Ok(())
}

/// Prints the records of a filter file; returns whether it was fully read.
pub fn run_check(args: &CheckArgs) -> Result<bool> {
    let outcome = load_filter(&args.filter)?;
    print_records(&outcome);
    Ok(outcome.fully_read)
}

pub fn run_list(args: &ListArgs) -> Result<()> {
    let doc = load_statistics(&args.statistics)?;
    let rows = indicator_rows(&doc, args.filter.as_deref());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows).context("serialize indicators")?);
    } else {
        print_indicators(&rows);
    }
    Ok(())
}

pub fn run_eval(args: &EvalArgs, context: &SettingsContext) -> Result<()> {
    let options = context.format_options(&args.notation)?;
    let stats = args.statistics.as_deref().map(load_statistics).transpose()?;

    let mut format = FilterFormat::default();
    if args.system {
        format.set_system();
    }
    match args.style {
        ValueStyleArg::Number => format.set_number(),
        ValueStyleArg::Percent => format.set_percent(),
        ValueStyleArg::Time => format.set_time(),
    }

    let stats = stats.as_ref().map(|doc| doc as &dyn StatisticsSource);
    println!("{}", evaluate(&args.expression, stats, &format, &options)?);
    Ok(())
}
