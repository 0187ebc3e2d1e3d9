//! Statistics access during evaluation.

use qsim_format::{parse_exact_time, parse_number_ext};
use qsim_stats::{Distribution, LookupError, StatisticsSource};

use crate::error::EvalError;
use crate::function::LookupFunction;

/// Supplies the values behind `xml(...)` style lookups.
pub trait EvalContext {
    fn lookup(&self, function: LookupFunction, selector: &str) -> Result<f64, EvalError>;
}

/// Context without statistics: every lookup fails.
impl EvalContext for () {
    fn lookup(&self, _function: LookupFunction, _selector: &str) -> Result<f64, EvalError> {
        Err(EvalError::Lookup(LookupError::NoStatistics))
    }
}

/// Evaluates lookups against a [`StatisticsSource`].
#[derive(Clone, Copy)]
pub struct StatisticsContext<'a> {
    source: &'a dyn StatisticsSource,
}

impl<'a> StatisticsContext<'a> {
    pub fn new(source: &'a dyn StatisticsSource) -> Self {
        Self { source }
    }
}

impl EvalContext for StatisticsContext<'_> {
    fn lookup(&self, function: LookupFunction, selector: &str) -> Result<f64, EvalError> {
        let resolved = self.source.resolve(selector).inspect_err(|err| {
            tracing::debug!(selector, function = function.name(), error = %err, "lookup failed");
        })?;
        let value = resolved.value.trim();
        let not_a_number = || EvalError::NotANumber(selector.to_string());

        let distribution = || Distribution::parse(value).ok_or_else(not_a_number);
        Ok(match function {
            LookupFunction::Value => {
                let number = if value.contains(':') {
                    parse_exact_time(value)
                } else {
                    parse_number_ext(value)
                };
                number.ok_or_else(not_a_number)?
            }
            LookupFunction::Sum => distribution()?.sum(),
            LookupFunction::Mean => distribution()?.mean(),
            LookupFunction::StandardDeviation => distribution()?.standard_deviation(),
            LookupFunction::Cv => distribution()?.cv(),
        })
    }
}
