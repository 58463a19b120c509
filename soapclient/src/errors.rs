use soapxml::XmlToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoapError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Xml(#[from] XmlToolError),

    #[error("WSDL error: {0}")]
    Wsdl(String),

    #[error("WSDL parse error: {0}")]
    WsdlXml(#[from] quick_xml::Error),

    #[error("unknown operation {0:?}")]
    UnknownOperation(String),

    #[error("operation {operation:?} takes {expected} argument(s), {given} given")]
    ArgumentCount {
        operation: String,
        expected: usize,
        given: usize,
    },

    #[error("request failed with HTTP status {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
