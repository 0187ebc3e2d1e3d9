//! Arithmetic expressions for simulation reports.
//!
//! Expressions support the usual operators (`+ - * / : ^`), postfix `%`,
//! `²`, `³` and `!`, three bracket styles, `|x|`, implicit multiplication
//! (`2pi`, `3(1+2)`), numbers with `.` or `,` as decimal separator and an
//! optional exponent (`1e3`, `2,5E-1`), and
//! case-insensitive function names. Values from a statistics run are pulled
//! in with `xml("selector")` and the distribution aggregates `xmlsum`,
//! `xmlmean`, `xmlsd` and `xmlcv`.
//!
//! ```
//! use qsim_expr::{Expression, calc};
//!
//! assert_eq!(calc("2*(1+2)^2"), Some(18.0));
//! let err = Expression::parse("1+*2").unwrap_err();
//! assert_eq!(err.display_position(), 3);
//! ```

#![deny(unsafe_code)]

mod context;
mod error;
mod expression;
mod function;
mod lexer;

pub use context::{EvalContext, StatisticsContext};
pub use error::{EvalError, ParseError, ParseErrorKind};
pub use expression::{Expression, calc};
pub use function::{Aggregate, Function, LookupFunction};
