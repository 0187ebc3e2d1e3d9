//! Fast-access filter lists.
//!
//! A [`FilterList`] is a sequence of small instructions: emit text or
//! whitespace, look up a value in the statistics, evaluate an expression, or
//! switch the output format. Running the list concatenates the fragments into
//! a short report.
//!
//! ```
//! use qsim_filter::{FilterList, FilterMode, FilterRecord, FormatOptions};
//! use qsim_stats::StatisticsDocument;
//!
//! let doc = StatisticsDocument::from_xml_str(
//!     r#"<Statistics><Waiting Mean="12.5"/></Statistics>"#,
//! )
//! .unwrap();
//! let list: FilterList = [
//!     FilterRecord::text("E[W]="),
//!     FilterRecord::xml("Waiting->[Mean]"),
//!     FilterRecord::new(FilterMode::Space),
//!     FilterRecord::text("sec"),
//! ]
//! .into_iter()
//! .collect();
//! assert_eq!(list.process(&doc, &FormatOptions::default()), "E[W]=12.5 sec");
//! ```

#![deny(unsafe_code)]

mod format;
mod list;
mod mode;
mod record;
mod runner;
mod settings;

pub use format::{
    DEFAULT_DO_NOT_FORMAT, FilterFormat, FormatOptions, format_number_value, format_value,
    split_path,
};
pub use list::{FilterList, LoadOutcome};
pub use mode::FilterMode;
pub use record::FilterRecord;
pub use runner::{FilterRunner, FilterUpdate, SharedStatistics};
pub use settings::{
    FastAccessSettings, SettingsError, default_settings_path, load_settings, save_settings,
};
