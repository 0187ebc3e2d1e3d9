//! Number and time formatting for simulation statistics.
//!
//! Values in a statistics results file are stored in system notation
//! (`.` as decimal separator). Reports show them either in that notation or in
//! the user's local notation. The helpers in this crate convert in both
//! directions without consulting any global state: the [`NumberLocale`] is
//! always passed explicitly.

#![deny(unsafe_code)]

pub mod locale;
pub mod number;
pub mod time;

pub use locale::NumberLocale;
pub use number::{
    MAX_DIGITS, format_long, format_number, format_number_max, format_percent,
    format_system_number, parse_number, parse_number_ext, system_to_local,
};
pub use time::{
    format_exact_local_time, format_exact_system_time, format_exact_time, format_time,
    parse_exact_time, parse_time,
};
