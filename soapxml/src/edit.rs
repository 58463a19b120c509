//! Réécriture du texte de balises existantes dans un arbre XML.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};
use xmltree::{Element, XMLNode};

use crate::errors::XmlToolError;
use crate::find::find_by_local_name;
use crate::io;

/// Selects which occurrences of a tag get rewritten.
///
/// `At(n)` is **0-based**, while the lookup side of this crate indexes
/// occurrences starting at 1. The mismatch is historical and callers
/// depend on both conventions, so it is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Occurrence {
    #[default]
    All,
    At(usize),
}

impl FromStr for Occurrence {
    type Err = XmlToolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "All" {
            return Ok(Occurrence::All);
        }
        value
            .parse::<usize>()
            .map(Occurrence::At)
            .map_err(|_| XmlToolError::BadOccurrence(value.to_string()))
    }
}

/// Applies each `(tag, value)` pair to the tree, independently of the
/// others. A tag with no match is skipped with a warning. With
/// [`Occurrence::All`], or when the tag appears less than twice, every
/// occurrence gets the new text; otherwise only the occurrence at the
/// 0-based position is rewritten.
pub fn apply_values(
    root: &mut Element,
    values: &HashMap<String, String>,
    occurrence: &Occurrence,
) -> Result<(), XmlToolError> {
    for (tag, value) in values {
        let count = find_by_local_name(root, &[tag]).len();
        if count == 0 {
            warn!("tag {tag:?} not found");
            continue;
        }
        debug!("found {count} element(s) named {tag:?}");

        let target = match occurrence {
            Occurrence::All => None,
            Occurrence::At(_) if count < 2 => None,
            Occurrence::At(position) => {
                if *position >= count {
                    return Err(XmlToolError::IndexOutOfRange {
                        tag: tag.clone(),
                        index: *position,
                        count,
                    });
                }
                Some(*position)
            }
        };

        let mut next_match = 0usize;
        rewrite_named(root, tag, value, target, &mut next_match);
    }
    Ok(())
}

fn rewrite_named(
    element: &mut Element,
    tag: &str,
    value: &str,
    target: Option<usize>,
    next_match: &mut usize,
) {
    if element.name == tag {
        if target.is_none_or(|position| position == *next_match) {
            set_element_text(element, value);
        }
        *next_match += 1;
    }
    for node in element.children.iter_mut() {
        if let XMLNode::Element(child) = node {
            rewrite_named(child, tag, value, target, next_match);
        }
    }
}

/// Replaces the text nodes of the element with a single text node, child
/// elements are left untouched.
fn set_element_text(element: &mut Element, value: &str) {
    element
        .children
        .retain(|node| !matches!(node, XMLNode::Text(_) | XMLNode::CData(_)));
    element.children.insert(0, XMLNode::Text(value.to_string()));
}

/// Loads the XML file at `path`, rewrites the requested tags and writes
/// the result to `<output_name>.xml` next to the input file. Returns the
/// path of the new file.
pub fn edit_file(
    path: &Path,
    values: &HashMap<String, String>,
    output_name: &str,
    occurrence: &Occurrence,
) -> Result<PathBuf, XmlToolError> {
    let mut root = io::parse_file(path)?;
    apply_values(&mut root, values, occurrence)?;

    let folder = path.parent().unwrap_or_else(|| Path::new("."));
    let text = io::to_xml_string(&root)?;
    io::write_xml_file(folder, output_name, &text)
}
