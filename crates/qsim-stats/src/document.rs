//! In-memory statistics results tree.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, StatisticsError};

/// A single `name="value"` pair on an element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// One element of the statistics tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the element's own text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Looks up an attribute value; names compare case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| eq_ignore_case(&attr.name, name))
            .map(|attr| attr.value.as_str())
    }

    /// The element's own text, trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of this element and all descendants, in document order.
    pub fn text_content(&self) -> String {
        if self.children.is_empty() {
            return self.text.clone();
        }
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Children whose tag matches `tag` case-insensitively.
    pub fn children_named<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter(move |child| eq_ignore_case(&child.name, tag))
    }
}

/// Immutable statistics results document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsDocument {
    root: Element,
}

impl StatisticsDocument {
    /// Wraps an already built tree.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parses a statistics document from XML text.
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => return Err(xml_error(reader.buffer_position(), err)),
            };
            match event {
                Event::Start(start) => {
                    let element = element_from_start(&start)
                        .map_err(|message| xml_error(reader.buffer_position(), message))?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)
                        .map_err(|message| xml_error(reader.buffer_position(), message))?;
                    attach(&mut stack, &mut root, element)
                        .map_err(|message| xml_error(reader.buffer_position(), message))?;
                }
                Event::End(_) => {
                    let Some(mut element) = stack.pop() else {
                        return Err(xml_error(reader.buffer_position(), "unexpected closing tag"));
                    };
                    element.text = element.text.trim().to_string();
                    attach(&mut stack, &mut root, element)
                        .map_err(|message| xml_error(reader.buffer_position(), message))?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = String::from_utf8_lossy(&text);
                        let unescaped = quick_xml::escape::unescape(&raw)
                            .map_err(|err| xml_error(reader.buffer_position(), err))?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(current) = stack.last_mut() {
                        let entity = format!("&{};", String::from_utf8_lossy(&reference));
                        let resolved = quick_xml::escape::unescape(&entity)
                            .map_err(|err| xml_error(reader.buffer_position(), err))?;
                        current.text.push_str(&resolved);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(xml_error(
                reader.buffer_position(),
                format!("unclosed element <{}>", open.name),
            ));
        }
        let root = root.ok_or(StatisticsError::EmptyDocument)?;
        tracing::debug!(root = %root.name, "loaded statistics document");
        Ok(Self { root })
    }

    /// Reads and parses a statistics file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path).map_err(|source| StatisticsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml_str(&xml)
    }

    /// The document element.
    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn element_from_start(start: &BytesStart<'_>) -> std::result::Result<Element, String> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let raw = String::from_utf8_lossy(&attr.value);
        let value = quick_xml::escape::unescape(&raw).map_err(|err| err.to_string())?;
        element.attributes.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> std::result::Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(format!("second root element <{}>", element.name));
    }
    *root = Some(element);
    Ok(())
}

fn xml_error<P, M>(position: P, message: M) -> StatisticsError
where
    u64: TryFrom<P>,
    M: ToString,
{
    StatisticsError::Xml {
        position: u64::try_from(position).unwrap_or(u64::MAX),
        message: message.to_string(),
    }
}

/// Unicode-aware case-insensitive comparison.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let doc = StatisticsDocument::from_xml_str(
            r#"<?xml version="1.0"?>
            <Statistics>
              <Model><ModelName>Call center</ModelName></Model>
              <WaitingTimes><Client Type="A" Mean="12.5"/></WaitingTimes>
            </Statistics>"#,
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "Statistics");
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].children()[0].text(), "Call center");
        assert_eq!(root.children()[1].children()[0].attribute("mean"), Some("12.5"));
    }

    #[test]
    fn built_tree_matches_parsed_document() {
        let built = StatisticsDocument::new(
            Element::new("Statistics")
                .with_child(
                    Element::new("Model").with_child(Element::new("ModelName").with_text("Call center")),
                )
                .with_child(
                    Element::new("WaitingTimes").with_child(
                        Element::new("Client")
                            .with_attribute("Type", "A")
                            .with_attribute("Mean", "12.5"),
                    ),
                ),
        );
        let parsed = StatisticsDocument::from_xml_str(
            r#"<Statistics>
                 <Model><ModelName> Call center </ModelName></Model>
                 <WaitingTimes><Client Type="A" Mean="12.5"/></WaitingTimes>
               </Statistics>"#,
        )
        .unwrap();
        assert_eq!(built, parsed);
        assert_eq!(built.root().children()[1].children()[0].attributes()[1].value, "12.5");
    }

    #[test]
    fn unescapes_text_and_attributes() {
        let doc = StatisticsDocument::from_xml_str(
            r#"<Statistics Note="a &amp; b">x &lt; y</Statistics>"#,
        )
        .unwrap();
        assert_eq!(doc.root().attribute("Note"), Some("a & b"));
        assert_eq!(doc.root().text(), "x < y");
    }

    #[test]
    fn rejects_empty_and_malformed_input() {
        assert!(matches!(
            StatisticsDocument::from_xml_str("   "),
            Err(StatisticsError::EmptyDocument)
        ));
        assert!(matches!(
            StatisticsDocument::from_xml_str("<a><b></a>"),
            Err(StatisticsError::Xml { .. })
        ));
        assert!(matches!(
            StatisticsDocument::from_xml_str("<a/><b/>"),
            Err(StatisticsError::Xml { .. })
        ));
    }

    #[test]
    fn case_insensitive_comparison() {
        assert!(eq_ignore_case("Übersicht", "üBERSICHT"));
        assert!(!eq_ignore_case("Mean", "Median"));
    }
}
