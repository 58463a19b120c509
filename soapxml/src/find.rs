//! Recherche d'éléments par nom local, sans tenir compte des namespaces.

use tracing::{debug, warn};
use xmltree::Element;

use crate::errors::XmlToolError;

/// Collects every element of the tree (root included) whose local name
/// matches the first step of `path`, then chains each remaining step
/// through the descendants of the previous matches, in document order.
///
/// Matching is a predicate over a depth-first traversal. Namespace
/// prefixes and URIs are ignored entirely, only the local name counts.
pub fn find_by_local_name<'a>(root: &'a Element, path: &[&str]) -> Vec<&'a Element> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    collect_named(root, first, &mut matches);

    for step in rest {
        let mut next: Vec<&Element> = Vec::new();
        for parent in &matches {
            let mut found = Vec::new();
            for node in &parent.children {
                if let Some(child) = node.as_element() {
                    collect_named(child, step, &mut found);
                }
            }
            // Nested matches yield the same descendants twice, keep the
            // first (earliest) occurrence only.
            for element in found {
                if !next.iter().any(|seen| std::ptr::eq(*seen, element)) {
                    next.push(element);
                }
            }
        }
        matches = next;
    }

    matches
}

fn collect_named<'a>(element: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
    if element.name == name {
        out.push(element);
    }
    for node in &element.children {
        if let Some(child) = node.as_element() {
            collect_named(child, name, out);
        }
    }
}

/// Returns the text content of the `index`-th element (1-based, document
/// order) named `tag` anywhere in the tree.
///
/// Zero matches is reported as an explicit [`XmlToolError::TagNotFound`]
/// after a warning, never as an index fault. An element without text
/// yields an empty string.
pub fn text_by_tag(root: &Element, tag: &str, index: usize) -> Result<String, XmlToolError> {
    text_by_path(root, &[tag], index)
}

/// Same as [`text_by_tag`] for a multi-step path of local names.
pub fn text_by_path(root: &Element, path: &[&str], index: usize) -> Result<String, XmlToolError> {
    let matches = find_by_local_name(root, path);
    let tag = path.join("/");

    if matches.is_empty() {
        warn!("the search for {tag:?} did not return any result");
        return Err(XmlToolError::TagNotFound(tag));
    }
    if matches.len() > 1 {
        debug!(
            "tag {:?} matched {} elements, returning the text at index {}",
            tag,
            matches.len(),
            index
        );
    }
    if index == 0 || index > matches.len() {
        return Err(XmlToolError::IndexOutOfRange {
            tag,
            index,
            count: matches.len(),
        });
    }

    Ok(matches[index - 1]
        .get_text()
        .map(|text| text.to_string())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_str;

    const NAMESPACED: &str = r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <u:LookupResponse xmlns:u="urn:example:service:Lookup:1">
      <Entry>first</Entry>
      <Entry>second</Entry>
      <Total>2</Total>
    </u:LookupResponse>
  </s:Body>
</s:Envelope>"#;

    #[test]
    fn single_occurrence_returns_text() {
        let tree = parse_str(NAMESPACED).unwrap();
        assert_eq!(text_by_tag(&tree, "Total", 1).unwrap(), "2");
    }

    #[test]
    fn index_selects_occurrence_in_document_order() {
        let tree = parse_str(NAMESPACED).unwrap();
        assert_eq!(text_by_tag(&tree, "Entry", 1).unwrap(), "first");
        assert_eq!(text_by_tag(&tree, "Entry", 2).unwrap(), "second");
    }

    #[test]
    fn namespace_prefix_is_ignored() {
        let tree = parse_str(NAMESPACED).unwrap();
        let found = find_by_local_name(&tree, &["LookupResponse"]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn missing_tag_is_an_explicit_error() {
        let tree = parse_str(NAMESPACED).unwrap();
        assert!(matches!(
            text_by_tag(&tree, "Nope", 1),
            Err(XmlToolError::TagNotFound(_))
        ));
    }

    #[test]
    fn index_out_of_range_is_an_error() {
        let tree = parse_str(NAMESPACED).unwrap();
        let err = text_by_tag(&tree, "Entry", 3).unwrap_err();
        assert!(matches!(err, XmlToolError::IndexOutOfRange { count: 2, .. }));
        let err = text_by_tag(&tree, "Entry", 0).unwrap_err();
        assert!(matches!(err, XmlToolError::IndexOutOfRange { .. }));
    }

    #[test]
    fn path_chains_through_descendants() {
        let xml = r#"<root>
  <outer><item>in-outer</item></outer>
  <other><item>elsewhere</item></other>
</root>"#;
        let tree = parse_str(xml).unwrap();
        assert_eq!(text_by_path(&tree, &["outer", "item"], 1).unwrap(), "in-outer");
        assert!(text_by_path(&tree, &["outer", "item"], 2).is_err());
    }

    #[test]
    fn nested_matches_are_not_duplicated() {
        let xml = "<a><a><b>x</b></a></a>";
        let tree = parse_str(xml).unwrap();
        let found = find_by_local_name(&tree, &["a", "b"]);
        assert_eq!(found.len(), 1);
    }
}
