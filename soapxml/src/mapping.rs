//! Conversion d'un arbre XML en mapping imbriqué.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use xmltree::Element;

/// Value side of a converted tree.
///
/// A tag occurring at least twice under the same parent collapses into a
/// `List` in document order. A list produced this way is not
/// distinguishable from any other list shape, downstream assertions rely
/// on exactly this collapsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    Text(String),
    List(Vec<XmlValue>),
    Map(HashMap<String, XmlValue>),
}

impl XmlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, XmlValue>> {
        match self {
            XmlValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Flattens the direct children of `element` into a mapping keyed by
/// local tag name.
///
/// A child with non-whitespace text maps to that text, anything else
/// recurses. Childless, textless elements yield an empty map. Repeated
/// keys merge into an ordered list, the second occurrence turns the
/// stored value into a two-element list and later ones append.
pub fn element_to_mapping(element: &Element) -> HashMap<String, XmlValue> {
    let mut result: HashMap<String, XmlValue> = HashMap::new();

    for child in element.children.iter().filter_map(|node| node.as_element()) {
        let key = child.name.clone();
        let value = match child.get_text() {
            Some(text) if !text.trim().is_empty() => XmlValue::Text(text.to_string()),
            _ => XmlValue::Map(element_to_mapping(child)),
        };

        match result.entry(key) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                XmlValue::List(items) => items.push(value),
                previous => {
                    let first = previous.clone();
                    *previous = XmlValue::List(vec![first, value]);
                }
            },
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    result
}
