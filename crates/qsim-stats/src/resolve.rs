//! Resolving selectors against a statistics source.

use crate::document::{Element, StatisticsDocument};
use crate::error::LookupError;
use crate::selector::{ComponentFilter, Selector};

/// A raw value found by a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Text content or attribute value, unformatted.
    pub value: String,
    /// Tags (and a trailing attribute name) walked from the document element.
    pub path: Vec<String>,
}

/// Read-only access to simulation results by selector.
pub trait StatisticsSource {
    /// Resolves a textual selector to its raw value.
    fn resolve(&self, selector: &str) -> Result<Resolved, LookupError>;
}

impl StatisticsSource for StatisticsDocument {
    fn resolve(&self, selector: &str) -> Result<Resolved, LookupError> {
        let selector = Selector::parse(selector)?;
        resolve_selector(self.root(), &selector)
    }
}

impl<T: StatisticsSource + ?Sized> StatisticsSource for &T {
    fn resolve(&self, selector: &str) -> Result<Resolved, LookupError> {
        (**self).resolve(selector)
    }
}

impl<T: StatisticsSource + ?Sized> StatisticsSource for std::sync::Arc<T> {
    fn resolve(&self, selector: &str) -> Result<Resolved, LookupError> {
        (**self).resolve(selector)
    }
}

/// Source used when no results are loaded; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatistics;

impl StatisticsSource for NoStatistics {
    fn resolve(&self, _selector: &str) -> Result<Resolved, LookupError> {
        Err(LookupError::NoStatistics)
    }
}

/// Walks `selector` from `root`.
pub fn resolve_selector(root: &Element, selector: &Selector) -> Result<Resolved, LookupError> {
    let components = selector.components();
    let mut path = vec![root.name().to_string()];
    let mut current = root;

    for (index, component) in components.iter().enumerate() {
        let is_last = index + 1 == components.len();

        if component.is_parent_attribute() {
            let ComponentFilter::Attribute(name) = &component.filter else {
                return Err(LookupError::InvalidComponent(component.to_string()));
            };
            path.push(name.clone());
            return read_attribute(current, name, path);
        }

        let found = component
            .select(current, is_last)
            .ok_or_else(|| LookupError::NoMatchingElement(component.to_string()))?;
        path.push(found.name().to_string());
        current = found;

        if is_last && let ComponentFilter::Attribute(name) = &component.filter {
            path.push(name.clone());
            return read_attribute(current, name, path);
        }
    }

    Ok(Resolved {
        value: current.text_content(),
        path,
    })
}

fn read_attribute(
    element: &Element,
    name: &str,
    path: Vec<String>,
) -> Result<Resolved, LookupError> {
    let value = element
        .attribute(name)
        .ok_or_else(|| LookupError::MissingAttribute {
            element: element.name().to_string(),
            attribute: name.to_string(),
        })?;
    Ok(Resolved {
        value: value.to_string(),
        path,
    })
}
