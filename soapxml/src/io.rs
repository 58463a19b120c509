//! Parsing, sérialisation et écriture sur disque des arbres XML.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use xmltree::{Element, EmitterConfig};

use crate::errors::XmlToolError;

/// Parses an XML document from text. A malformed document is fatal to
/// the call, there is no partially valid tree.
pub fn parse_str(text: &str) -> Result<Element, XmlToolError> {
    Ok(Element::parse(text.as_bytes())?)
}

/// Reads the file as text and parses it.
pub fn parse_file(path: &Path) -> Result<Element, XmlToolError> {
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

/// Compact serialization, with the XML declaration.
pub fn to_xml_string(element: &Element) -> Result<String, XmlToolError> {
    let config = EmitterConfig::new().write_document_declaration(true);
    emit(element, config)
}

/// Two-space indented serialization, used for logs and saved responses.
pub fn to_pretty_string(element: &Element) -> Result<String, XmlToolError> {
    let config = EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");
    emit(element, config)
}

fn emit(element: &Element, config: EmitterConfig) -> Result<String, XmlToolError> {
    let mut buf = Vec::new();
    element.write_with_config(&mut buf, config)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Saves the tree pretty-printed as `<name>.xml` inside `folder` and
/// returns the path of the new file.
pub fn save_to_file(element: &Element, folder: &Path, name: &str) -> Result<PathBuf, XmlToolError> {
    let text = to_pretty_string(element)?;
    write_xml_file(folder, name, &text)
}

/// Writes `text` to `<folder>/<name>.xml`. The write is not atomic, an
/// interrupted process can leave a partial file behind.
pub(crate) fn write_xml_file(
    folder: &Path,
    name: &str,
    text: &str,
) -> Result<PathBuf, XmlToolError> {
    let path = folder.join(format!("{name}.xml"));
    fs::write(&path, text)?;
    debug!("wrote XML file {}", path.display());
    Ok(path)
}
