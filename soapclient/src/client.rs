//! The SOAP client driving a webservice from test code: one client per
//! test scope, holding the HTTP session, the parsed WSDL, the effective
//! target URL and the snapshot of the last raw response.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{debug, info};
use xmltree::Element;

use crate::envelope::build_method_envelope;
use crate::errors::SoapError;
use crate::response::RawResponse;
use crate::transport::{HttpSession, SessionOptions, TlsMode};
use crate::wsdl::WsdlDescription;

pub const DEFAULT_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// The headers an XML send uses when the caller supplies none.
pub fn default_headers() -> Vec<(String, String)> {
    vec![("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string())]
}

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub tls: TlsMode,
    /// PEM file with the client certificate chain and private key, for
    /// mutual TLS.
    pub client_cert: Option<PathBuf>,
    /// `(username, password)` sent as HTTP Basic authentication on
    /// every request.
    pub auth: Option<(String, String)>,
    /// Target the address advertised inside the WSDL binding instead of
    /// the WSDL URL itself.
    pub use_binding_address: bool,
}

/// What to do with the HTTP status of an XML send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Fail the call when the status is not 200.
    #[default]
    ExpectOk,
    /// Return the parsed response whatever the status.
    Any,
}

/// Result of a lenient typed call: either the parsed response tree or
/// the failure message, never a propagated error.
#[derive(Debug)]
pub enum MethodOutcome {
    Response(Element),
    Error(String),
}

pub struct SoapClient {
    session: HttpSession,
    wsdl: WsdlDescription,
    url: String,
    last_response: Option<RawResponse>,
}

impl SoapClient {
    /// Loads the WSDL at `wsdl_url` and builds a client around it,
    /// logging the resolved endpoint and the available operations.
    pub fn create(wsdl_url: &str, options: &ClientOptions) -> Result<Self, SoapError> {
        let session = HttpSession::new(&SessionOptions {
            tls: options.tls.clone(),
            client_cert: options.client_cert.clone(),
            auth: options.auth.clone(),
        })?;
        let wsdl = WsdlDescription::fetch(&session, wsdl_url)?;

        info!("connected to {}", wsdl.location);
        info!("available operations: {:?}", wsdl.operation_names());

        let url = if options.use_binding_address {
            wsdl.binding_address.clone().ok_or_else(|| {
                SoapError::Wsdl(format!(
                    "{wsdl_url} advertises no service address in its binding"
                ))
            })?
        } else {
            wsdl_url.to_string()
        };

        Ok(Self {
            session,
            wsdl,
            url,
            last_response: None,
        })
    }

    /// The URL requests are POSTed to.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn wsdl(&self) -> &WsdlDescription {
        &self.wsdl
    }

    /// Sends the XML file at `path` as the request envelope, with the
    /// default headers and the default status policy.
    pub fn send_xml_file(&mut self, path: &Path) -> Result<Element, SoapError> {
        self.send_xml_file_with(path, &default_headers(), StatusPolicy::ExpectOk)
    }

    pub fn send_xml_file_with(
        &mut self,
        path: &Path,
        headers: &[(String, String)],
        policy: StatusPolicy,
    ) -> Result<Element, SoapError> {
        let text = fs::read_to_string(path)?;
        self.dispatch(&text, headers, policy)
    }

    /// Sends a string representation of the request envelope.
    pub fn send_xml_string(&mut self, xml: &str) -> Result<Element, SoapError> {
        self.dispatch(xml, &default_headers(), StatusPolicy::ExpectOk)
    }

    pub fn send_xml_string_with(
        &mut self,
        xml: &str,
        headers: &[(String, String)],
        policy: StatusPolicy,
    ) -> Result<Element, SoapError> {
        self.dispatch(xml, headers, policy)
    }

    fn dispatch(
        &mut self,
        xml: &str,
        headers: &[(String, String)],
        policy: StatusPolicy,
    ) -> Result<Element, SoapError> {
        // The request must be a well-formed envelope before it goes out.
        soapxml::parse_str(xml)?;

        let response = self.session.post_xml(&self.url, xml, headers)?;
        info!("status code: {}", response.status);

        let status = response.status;
        let reason = response.reason.clone().unwrap_or_default();
        let body = response.body.clone();
        let url = response.url.clone();
        // The snapshot is stored before any parsing or status check, so
        // it stays inspectable when the call fails.
        self.last_response = Some(response);

        let tree = soapxml::parse_str(&body)?;
        let pretty = soapxml::to_pretty_string(&tree)?;
        debug!("URL: {url}");
        debug!("{pretty}");

        if policy == StatusPolicy::ExpectOk && status != 200 {
            return Err(SoapError::Status { status, reason });
        }

        info!("response from webservice:\n{pretty}");
        Ok(tree)
    }

    /// Calls a WSDL operation by name with positional arguments, the
    /// envelope is built from the operation's input parts.
    ///
    /// Unlike the XML sends this does not touch the last-response slot,
    /// so a later [`Self::last_response`] still reflects the previous
    /// XML send.
    pub fn call_method(&self, name: &str, args: &[&str]) -> Result<Element, SoapError> {
        let operation = self.wsdl.operation(name)?;
        if operation.input_parts.len() != args.len() {
            return Err(SoapError::ArgumentCount {
                operation: name.to_string(),
                expected: operation.input_parts.len(),
                given: args.len(),
            });
        }

        let pairs: Vec<(String, String)> = operation
            .input_parts
            .iter()
            .cloned()
            .zip(args.iter().map(|arg| arg.to_string()))
            .collect();
        let envelope =
            build_method_envelope(self.wsdl.target_namespace.as_deref(), name, &pairs)?;

        let namespace = self.wsdl.target_namespace.clone().unwrap_or_default();
        let mut headers = default_headers();
        headers.push(("SOAPAction".to_string(), format!("\"{namespace}#{name}\"")));

        let response = self.session.post_xml(&self.url, &envelope, &headers)?;
        info!("status code: {}", response.status);
        if !response.is_success() {
            return Err(SoapError::Status {
                status: response.status,
                reason: response.reason.unwrap_or_default(),
            });
        }
        Ok(soapxml::parse_str(&response.body)?)
    }

    /// Same call, but every failure is caught and handed back as its
    /// message instead of propagating.
    pub fn call_method_lenient(&self, name: &str, args: &[&str]) -> MethodOutcome {
        match self.call_method(name, args) {
            Ok(tree) => MethodOutcome::Response(tree),
            Err(error) => MethodOutcome::Error(error.to_string()),
        }
    }

    /// The raw response captured by the most recent XML send, `None`
    /// before the first send of this client.
    pub fn last_response(&self) -> Option<&RawResponse> {
        self.last_response.as_ref()
    }
}

/// Decodes a base64 payload to text. Invalid UTF-8 sequences in the
/// decoded bytes are replaced rather than failing the call.
pub fn decode_base64(text: &str) -> Result<String, SoapError> {
    let bytes = BASE64.decode(text.trim())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
