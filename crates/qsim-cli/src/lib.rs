//! Library components of the `qsim-report` command-line tool.

pub mod logging;
pub mod report;
