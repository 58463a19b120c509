//! SOAP webservice client for keyword-driven test suites.
//!
//! Builds a blocking HTTP session around a WSDL, sends raw or
//! file-based XML envelopes, calls WSDL operations by name, and keeps
//! the last raw response around for inspection. XML tree helpers
//! (lookup by local name, tag rewriting, tree to mapping conversion)
//! live in the companion `soapxml` crate.

mod envelope;

pub mod client;
pub mod errors;
pub mod response;
pub mod transport;
pub mod wsdl;

use std::time::Duration;

pub use client::{
    ClientOptions, DEFAULT_CONTENT_TYPE, MethodOutcome, SoapClient, StatusPolicy, decode_base64,
    default_headers,
};
pub use errors::SoapError;
pub use response::RawResponse;
pub use transport::{HttpSession, SessionOptions, TlsMode};
pub use wsdl::{WsdlDescription, WsdlOperation};

pub(crate) const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
