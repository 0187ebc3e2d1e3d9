//! CLI argument definitions for the simulation report tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "qsim-report",
    version,
    about = "Build short reports from queueing simulation statistics",
    long_about = "Build short reports from queueing simulation statistics.\n\n\
                  Runs fast-access filter lists and expressions against a\n\
                  statistics results file and lists the values it contains."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Settings file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a filter list against a statistics file.
    Filter(FilterArgs),

    /// Show the records of a filter list file.
    Check(CheckArgs),

    /// List the values available in a statistics file.
    List(ListArgs),

    /// Evaluate an expression, optionally against a statistics file.
    Eval(EvalArgs),
}

/// Output notation overrides shared by commands that format numbers.
#[derive(Args, Clone)]
pub struct NotationArgs {
    /// Local notation language (en, de); overrides the settings file.
    #[arg(long = "locale", value_name = "LANG")]
    pub locale: Option<String>,

    /// Fractional digits for numbers; overrides the settings file.
    #[arg(long = "digits", value_name = "N")]
    pub digits: Option<u8>,
}

#[derive(Parser)]
pub struct FilterArgs {
    /// Statistics results file.
    #[arg(value_name = "STATISTICS")]
    pub statistics: PathBuf,

    /// Filter list file (default: the remembered list).
    #[arg(value_name = "FILTER_FILE")]
    pub filter: Option<PathBuf>,

    /// Write the report to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Remember the filter list in the settings file.
    #[arg(long = "remember")]
    pub remember: bool,

    #[command(flatten)]
    pub notation: NotationArgs,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Filter list file.
    #[arg(value_name = "FILTER_FILE")]
    pub filter: PathBuf,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Statistics results file.
    #[arg(value_name = "STATISTICS")]
    pub statistics: PathBuf,

    /// Only show selectors containing this text.
    #[arg(long = "filter", value_name = "TEXT")]
    pub filter: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct EvalArgs {
    /// Expression, e.g. `xml("Clients->Client->[Mean]")*60`.
    #[arg(value_name = "EXPRESSION")]
    pub expression: String,

    /// Statistics results file for `xml(...)` lookups.
    #[arg(long = "statistics", short = 's', value_name = "PATH")]
    pub statistics: Option<PathBuf>,

    /// Output style of the result.
    #[arg(long = "as", value_enum, default_value = "number")]
    pub style: ValueStyleArg,

    /// Use system notation.
    #[arg(long = "system")]
    pub system: bool,

    #[command(flatten)]
    pub notation: NotationArgs,
}

/// How an evaluated value is shown.
#[derive(Clone, Copy, ValueEnum)]
pub enum ValueStyleArg {
    Number,
    Percent,
    Time,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
