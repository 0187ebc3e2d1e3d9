//! Read-only access to queueing simulation results.
//!
//! A finished simulation run writes its statistics as an XML tree. This crate
//! loads that tree once ([`StatisticsDocument`]) and answers lookups addressed
//! by `->`-separated [`Selector`]s through the [`StatisticsSource`] trait.
//!
//! ```
//! use qsim_stats::{StatisticsDocument, StatisticsSource};
//!
//! let doc = StatisticsDocument::from_xml_str(
//!     r#"<Statistics><WaitingTimes><Client Type="A" Mean="12.5"/></WaitingTimes></Statistics>"#,
//! )
//! .unwrap();
//! let resolved = doc.resolve(r#"WaitingTimes->Client[Type="A"]->[Mean]"#).unwrap();
//! assert_eq!(resolved.value, "12.5");
//! ```

#![deny(unsafe_code)]

mod distribution;
mod document;
mod error;
mod indicator;
mod resolve;
mod selector;

pub use distribution::{DENSITY_SEPARATOR, Distribution};
pub use document::{Attribute, Element, StatisticsDocument};
pub use error::{LookupError, Result, StatisticsError};
pub use indicator::Indicator;
pub use resolve::{NoStatistics, Resolved, StatisticsSource, resolve_selector};
pub use selector::{COMPONENT_SEPARATOR, Component, ComponentFilter, Selector, SelectorBuilder};
