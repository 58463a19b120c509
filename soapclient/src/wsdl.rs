//! WSDL retrieval and introspection.
//!
//! The description is read with a streaming event reader, matching on
//! local names only since every server picks its own prefixes. Only the
//! pieces the client needs are kept: operation names, the input parts
//! each operation takes, the target namespace and the service address
//! advertised by the binding.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::errors::SoapError;
use crate::transport::HttpSession;

#[derive(Debug, Clone)]
pub struct WsdlOperation {
    pub name: String,
    /// Part names of the operation's input message, in declaration
    /// order. Positional call arguments are paired with these.
    pub input_parts: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WsdlDescription {
    /// Where the description was loaded from.
    pub location: String,
    pub target_namespace: Option<String>,
    pub operations: Vec<WsdlOperation>,
    /// `soap:address/@location` advertised under the service, when the
    /// description has one.
    pub binding_address: Option<String>,
}

impl WsdlDescription {
    /// Fetches the description through the session, so TLS and
    /// authentication settings apply to the WSDL itself. Unreachable or
    /// unparsable descriptions are fatal, there is no retry.
    pub fn fetch(session: &HttpSession, url: &str) -> Result<Self, SoapError> {
        let response = session
            .get(url)
            .map_err(|error| SoapError::Wsdl(format!("failed to fetch {url}: {error}")))?;
        if !response.is_success() {
            return Err(SoapError::Wsdl(format!(
                "fetching {url} returned HTTP status {}",
                response.status
            )));
        }
        Self::parse(&response.body, url)
    }

    pub fn parse(xml: &str, location: &str) -> Result<Self, SoapError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut target_namespace: Option<String> = None;
        let mut binding_address: Option<String> = None;
        // message name -> part names, resolved after the scan
        let mut messages: HashMap<String, Vec<String>> = HashMap::new();
        // portType operations with the local name of their input message
        let mut operations: Vec<(String, Option<String>)> = Vec::new();

        let mut current_message: Option<String> = None;
        let mut in_port_type = false;
        let mut in_operation = false;
        let mut in_service = false;

        loop {
            // Self-closing elements never produce an End event, so they
            // must not open a context that only End would close.
            let (element, has_content) = match reader.read_event()? {
                Event::Start(element) => (element, true),
                Event::Empty(element) => (element, false),
                Event::End(element) => {
                    match element.local_name().as_ref() {
                        b"message" => current_message = None,
                        b"portType" => in_port_type = false,
                        b"operation" => in_operation = false,
                        b"service" => in_service = false,
                        _ => {}
                    }
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            match element.local_name().as_ref() {
                b"definitions" => {
                    target_namespace = attr_value(&element, "targetNamespace")?;
                }
                b"message" => {
                    if let Some(name) = attr_value(&element, "name")? {
                        messages.entry(name.clone()).or_default();
                        if has_content {
                            current_message = Some(name);
                        }
                    }
                }
                b"part" => {
                    if let Some(message) = &current_message
                        && let Some(name) = attr_value(&element, "name")?
                    {
                        messages.entry(message.clone()).or_default().push(name);
                    }
                }
                b"portType" if has_content => in_port_type = true,
                b"operation" if in_port_type => {
                    if let Some(name) = attr_value(&element, "name")? {
                        operations.push((name, None));
                        in_operation = has_content;
                    }
                }
                b"input" if in_operation => {
                    if let Some(message) = attr_value(&element, "message")?
                        && let Some((_, input)) = operations.last_mut()
                    {
                        *input = Some(local_part(&message).to_string());
                    }
                }
                b"service" if has_content => in_service = true,
                b"address" if in_service => {
                    if let Some(location) = attr_value(&element, "location")? {
                        binding_address.get_or_insert(location);
                    }
                }
                _ => {}
            }
        }

        let operations = operations
            .into_iter()
            .map(|(name, input)| WsdlOperation {
                name,
                input_parts: input
                    .and_then(|message| messages.get(&message).cloned())
                    .unwrap_or_default(),
            })
            .collect::<Vec<_>>();

        debug!(
            "parsed WSDL at {location}: {} operation(s), binding address {:?}",
            operations.len(),
            binding_address
        );

        Ok(Self {
            location: location.to_string(),
            target_namespace,
            operations,
            binding_address,
        })
    }

    pub fn operation(&self, name: &str) -> Result<&WsdlOperation, SoapError> {
        self.operations
            .iter()
            .find(|operation| operation.name == name)
            .ok_or_else(|| SoapError::UnknownOperation(name.to_string()))
    }

    pub fn operation_names(&self) -> Vec<&str> {
        self.operations
            .iter()
            .map(|operation| operation.name.as_str())
            .collect()
    }
}

fn attr_value(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, SoapError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

/// Strips a namespace prefix from a qualified reference like
/// `tns:GetPriceInput`.
fn local_part(value: &str) -> &str {
    value.rsplit(':').next().unwrap_or(value)
}
