//! Enumerates every addressable value in a statistics document.

use crate::document::{Element, StatisticsDocument};
use crate::selector::SelectorBuilder;

/// One addressable value together with a selector that resolves to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub selector: String,
    pub value: String,
}

impl StatisticsDocument {
    /// Lists every attribute and every non-empty text node in document order.
    pub fn indicators(&self) -> Vec<Indicator> {
        let mut out = Vec::new();
        let mut indices = Vec::new();
        collect(self.root(), self.root(), &mut indices, &mut out);
        out
    }
}

fn collect(root: &Element, element: &Element, indices: &mut Vec<usize>, out: &mut Vec<Indicator>) {
    let Some(builder) = SelectorBuilder::for_node(root, indices) else {
        return;
    };

    for attr in element.attributes() {
        if let Ok(selector) = builder.clone().attribute(attr.name.clone()).build() {
            out.push(Indicator {
                selector: selector.to_string(),
                value: attr.value.clone(),
            });
        }
    }
    if !element.text().is_empty()
        && !indices.is_empty()
        && let Ok(selector) = builder.build()
    {
        out.push(Indicator {
            selector: selector.to_string(),
            value: element.text_content(),
        });
    }

    for (index, child) in element.children().iter().enumerate() {
        indices.push(index);
        collect(root, child, indices, out);
        indices.pop();
    }
}
