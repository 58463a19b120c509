//! Construction of SOAP 1.1 request envelopes for typed operation
//! calls.

use soapxml::XmlToolError;
use xmltree::{Element, XMLNode};

/// Builds `<s:Envelope><s:Body><u:{operation} xmlns:u="{ns}">...` with
/// one child element per `(part, value)` pair.
pub(crate) fn build_method_envelope(
    target_namespace: Option<&str>,
    operation: &str,
    args: &[(String, String)],
) -> Result<String, XmlToolError> {
    let mut request = Element::new(&format!("u:{operation}"));
    if let Some(namespace) = target_namespace {
        request
            .attributes
            .insert("xmlns:u".to_string(), namespace.to_string());
    }
    for (name, value) in args {
        let mut child = Element::new(name);
        child.children.push(XMLNode::Text(value.clone()));
        request.children.push(XMLNode::Element(child));
    }

    let mut body = Element::new("s:Body");
    body.children.push(XMLNode::Element(request));

    let mut envelope = Element::new("s:Envelope");
    envelope.attributes.insert(
        "xmlns:s".to_string(),
        "http://schemas.xmlsoap.org/soap/envelope/".to_string(),
    );
    envelope.attributes.insert(
        "s:encodingStyle".to_string(),
        "http://schemas.xmlsoap.org/soap/encoding/".to_string(),
    );
    envelope.children.push(XMLNode::Element(body));

    soapxml::to_pretty_string(&envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_documented_shape() {
        let args = vec![
            ("Item".to_string(), "widget".to_string()),
            ("Currency".to_string(), "EUR".to_string()),
        ];
        let xml = build_method_envelope(Some("urn:example:prices"), "GetPrice", &args).unwrap();

        assert!(xml.contains("xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\""));
        assert!(xml.contains("<u:GetPrice xmlns:u=\"urn:example:prices\">"));
        assert!(xml.contains("<Item>widget</Item>"));
        assert!(xml.contains("<Currency>EUR</Currency>"));
    }

    #[test]
    fn envelope_without_namespace_still_parses() {
        let xml = build_method_envelope(None, "Ping", &[]).unwrap();
        let tree = soapxml::parse_str(&xml).unwrap();
        assert!(!soapxml::find_by_local_name(&tree, &["Ping"]).is_empty());
    }
}
