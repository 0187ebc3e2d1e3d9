//! XML-like selectors addressing one value in the statistics tree.
//!
//! A selector is a chain of components separated by `->`, walked from the
//! document element downwards:
//!
//! | Component          | Meaning                                                          |
//! |--------------------|------------------------------------------------------------------|
//! | `tag`              | first child named `tag`                                          |
//! | `tag[n]`           | `n`-th child named `tag` (1-based)                               |
//! | `tag[attr="v"]`    | first child named `tag` whose `attr` equals `v`                  |
//! | `tag[attr=""]`     | first child named `tag` without (or with an empty) `attr`        |
//! | `tag[attr]`        | last component: attribute `attr` of the first child named `tag`; otherwise the first child named `tag` carrying `attr` |
//! | `[attr]`           | last component only: attribute `attr` of the current element     |
//!
//! Tags, attribute names and attribute values compare case-insensitively.

use std::fmt;
use std::str::FromStr;

use crate::document::Element;
use crate::error::LookupError;

/// Separator between selector components.
pub const COMPONENT_SEPARATOR: &str = "->";

/// How a component narrows the set of same-named children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentFilter {
    /// First matching child.
    First,
    /// 1-based position among same-named siblings.
    Nth(usize),
    /// `[attr]`: read the attribute when last, otherwise require its presence.
    Attribute(String),
    /// `[attr="value"]`; an empty value matches a missing attribute.
    AttributeEquals { name: String, value: String },
}

/// One `->`-separated selector step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Element tag; empty for a trailing parent attribute read (`[attr]`).
    pub tag: String,
    pub filter: ComponentFilter,
}

impl Component {
    fn parse(text: &str) -> Result<Self, LookupError> {
        let text = text.trim();
        let invalid = || LookupError::InvalidComponent(text.to_string());

        let Some(open) = text.find('[') else {
            if text.is_empty() {
                return Err(invalid());
            }
            return Ok(Self {
                tag: text.to_string(),
                filter: ComponentFilter::First,
            });
        };
        let inner = text[open + 1..].strip_suffix(']').ok_or_else(invalid)?.trim();
        let tag = text[..open].trim().to_string();
        if inner.is_empty() {
            return Err(invalid());
        }

        let filter = match inner.split_once('=') {
            Some((name, value)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(invalid());
                }
                let value = value.trim();
                let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                    &value[1..value.len() - 1]
                } else {
                    value
                };
                ComponentFilter::AttributeEquals {
                    name: name.to_string(),
                    value: value.to_string(),
                }
            }
            None if inner.chars().all(|c| c.is_ascii_digit()) => match inner.parse::<usize>() {
                Ok(n) if n >= 1 => ComponentFilter::Nth(n),
                _ => return Err(invalid()),
            },
            None => ComponentFilter::Attribute(inner.to_string()),
        };

        if tag.is_empty() && !matches!(filter, ComponentFilter::Attribute(_)) {
            return Err(invalid());
        }
        Ok(Self { tag, filter })
    }

    /// Whether this component reads the attribute of the current element.
    pub fn is_parent_attribute(&self) -> bool {
        self.tag.is_empty()
    }

    /// Finds the child of `parent` this component selects.
    pub(crate) fn select<'a>(&self, parent: &'a Element, is_last: bool) -> Option<&'a Element> {
        let mut candidates = parent.children_named(&self.tag);
        match &self.filter {
            ComponentFilter::First => candidates.next(),
            ComponentFilter::Nth(n) => candidates.nth(n - 1),
            ComponentFilter::Attribute(_) if is_last => candidates.next(),
            ComponentFilter::Attribute(name) => {
                candidates.find(|child| child.attribute(name).is_some())
            }
            ComponentFilter::AttributeEquals { name, value } => candidates.find(|child| {
                match child.attribute(name) {
                    Some(actual) => crate::document::eq_ignore_case(actual, value),
                    None => value.is_empty(),
                }
            }),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        match &self.filter {
            ComponentFilter::First => Ok(()),
            ComponentFilter::Nth(n) => write!(f, "[{n}]"),
            ComponentFilter::Attribute(name) => write!(f, "[{name}]"),
            ComponentFilter::AttributeEquals { name, value } => write!(f, "[{name}=\"{value}\"]"),
        }
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    components: Vec<Component>,
}

impl Selector {
    /// Parses the textual `a->b[attr="x"]->[c]` form.
    pub fn parse(text: &str) -> Result<Self, LookupError> {
        if text.trim().is_empty() {
            return Err(LookupError::EmptySelector);
        }
        let parts: Vec<&str> = text.split(COMPONENT_SEPARATOR).collect();
        let mut components = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            let component = Component::parse(part)?;
            if component.is_parent_attribute() && index + 1 != parts.len() {
                return Err(LookupError::InvalidComponent(part.trim().to_string()));
            }
            components.push(component);
        }
        Ok(Self { components })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

impl FromStr for Selector {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.components.iter().enumerate() {
            if index > 0 {
                f.write_str(COMPONENT_SEPARATOR)?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

/// Builds selectors step by step, e.g. from a node picked in a results tree.
#[derive(Debug, Clone, Default)]
pub struct SelectorBuilder {
    components: Vec<Component>,
    attribute: Option<String>,
}

impl SelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descends into the first child named `tag`.
    #[must_use]
    pub fn element(mut self, tag: impl Into<String>) -> Self {
        self.components.push(Component {
            tag: tag.into(),
            filter: ComponentFilter::First,
        });
        self
    }

    /// Descends into the first child named `tag` whose `attr` equals `value`.
    #[must_use]
    pub fn element_where(
        mut self,
        tag: impl Into<String>,
        attr: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.components.push(Component {
            tag: tag.into(),
            filter: ComponentFilter::AttributeEquals {
                name: attr.into(),
                value: value.into(),
            },
        });
        self
    }

    /// Descends into the `n`-th (1-based) child named `tag`.
    #[must_use]
    pub fn element_nth(mut self, tag: impl Into<String>, n: usize) -> Self {
        self.components.push(Component {
            tag: tag.into(),
            filter: ComponentFilter::Nth(n.max(1)),
        });
        self
    }

    /// Reads attribute `attr` of the element reached so far.
    #[must_use]
    pub fn attribute(mut self, attr: impl Into<String>) -> Self {
        self.attribute = Some(attr.into());
        self
    }

    /// Builds a selector for the node reached from `root` by following child
    /// indices. Each step is disambiguated against its same-named siblings:
    /// a unique tag stays bare, otherwise the first attribute with a unique
    /// value is used, falling back to the position.
    pub fn for_node(root: &Element, child_indices: &[usize]) -> Option<Self> {
        let mut builder = Self::new();
        let mut current = root;
        for &index in child_indices {
            let child = current.children().get(index)?;
            builder = builder.step_to(current, child, index);
            current = child;
        }
        Some(builder)
    }

    fn step_to(self, parent: &Element, child: &Element, index: usize) -> Self {
        let siblings: Vec<(usize, &Element)> = parent
            .children()
            .iter()
            .enumerate()
            .filter(|(_, sibling)| crate::document::eq_ignore_case(sibling.name(), child.name()))
            .collect();
        if siblings.len() == 1 {
            return self.element(child.name());
        }

        let unique_attribute = child.attributes().iter().find(|attr| {
            !attr.value.is_empty()
                && siblings
                    .iter()
                    .filter(|(_, sibling)| {
                        sibling
                            .attribute(&attr.name)
                            .is_some_and(|value| crate::document::eq_ignore_case(value, &attr.value))
                    })
                    .count()
                    == 1
                && !attr.value.contains(COMPONENT_SEPARATOR)
        });
        if let Some(attr) = unique_attribute {
            return self.element_where(child.name(), attr.name.clone(), attr.value.clone());
        }

        let position = siblings
            .iter()
            .position(|(sibling_index, _)| *sibling_index == index)
            .map_or(1, |p| p + 1);
        self.element_nth(child.name(), position)
    }

    /// Finishes the selector.
    pub fn build(self) -> Result<Selector, LookupError> {
        let mut components = self.components;
        if let Some(attr) = self.attribute {
            components.push(Component {
                tag: String::new(),
                filter: ComponentFilter::Attribute(attr),
            });
        }
        if components.is_empty() {
            return Err(LookupError::EmptySelector);
        }
        Ok(Selector { components })
    }
}
