//! Blocking HTTP session used for the WSDL fetch and every SOAP
//! exchange.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;
use ureq::Agent;
use ureq::tls::{Certificate, ClientCert, PemItem, PrivateKey, TlsConfig, RootCerts, parse_pem};

use crate::errors::SoapError;
use crate::response::RawResponse;

/// Server certificate validation mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Validate against the built-in trust anchors.
    #[default]
    Verify,
    /// Skip server certificate validation entirely (unsafe).
    NoVerify,
    /// Validate against a custom trust-anchor bundle, a single PEM
    /// file. Root and intermediate authorities must be concatenated
    /// into that one file beforehand.
    CaBundle(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub tls: TlsMode,

    /// PEM file holding the client certificate chain and its private
    /// key, for mutual TLS.
    pub client_cert: Option<PathBuf>,

    /// Username and password attached to every request as HTTP Basic
    /// authentication.
    pub auth: Option<(String, String)>,
}

/// A configured [`ureq::Agent`] plus the pre-computed Basic auth
/// header. All requests of one client go through the same session.
pub struct HttpSession {
    agent: Agent,
    auth_header: Option<String>,
}

impl HttpSession {
    pub fn new(options: &SessionOptions) -> Result<Self, SoapError> {
        let mut tls = TlsConfig::builder();
        match &options.tls {
            TlsMode::Verify => {}
            TlsMode::NoVerify => {
                tls = tls.disable_verification(true);
            }
            TlsMode::CaBundle(path) => {
                tls = tls.root_certs(load_root_certs(path)?);
            }
        }
        if let Some(path) = &options.client_cert {
            tls = tls.client_cert(Some(load_client_cert(path)?));
        }

        // Non-2xx responses must stay readable: a SOAP Fault arrives as
        // an HTTP 500 whose body is the interesting part, so the agent
        // must not turn status codes into transport errors.
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(crate::DEFAULT_HTTP_TIMEOUT))
            .tls_config(tls.build())
            .build();
        let agent: Agent = config.into();

        let auth_header = options
            .auth
            .as_ref()
            .map(|(user, password)| format!("Basic {}", BASE64.encode(format!("{user}:{password}"))));

        Ok(Self { agent, auth_header })
    }

    /// POSTs an XML payload with exactly the given headers and captures
    /// the whole response, whatever its status code.
    pub fn post_xml(
        &self,
        url: &str,
        body: &str,
        headers: &[(String, String)],
    ) -> Result<RawResponse, SoapError> {
        debug!("POST {url}");
        let mut request = self.agent.post(url);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request.send(body)?;
        snapshot(url, response)
    }

    /// Plain GET, used to retrieve the WSDL through the same TLS and
    /// authentication settings as the SOAP calls themselves.
    pub fn get(&self, url: &str) -> Result<RawResponse, SoapError> {
        debug!("GET {url}");
        let mut request = self.agent.get(url);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }
        let response = request.call()?;
        snapshot(url, response)
    }
}

fn snapshot(
    url: &str,
    response: ureq::http::Response<ureq::Body>,
) -> Result<RawResponse, SoapError> {
    let (parts, body) = response.into_parts();
    let status = parts.status;
    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let mut body = body;
    let text = body.read_to_string()?;

    Ok(RawResponse {
        status: status.as_u16(),
        reason: status.canonical_reason().map(str::to_string),
        headers,
        body: text,
        url: url.to_string(),
    })
}

fn load_root_certs(path: &Path) -> Result<RootCerts, SoapError> {
    let pem = fs::read(path)?;
    let certs = certificates_from_pem(&pem, path)?;
    Ok(RootCerts::new_with_certs(&certs))
}

fn load_client_cert(path: &Path) -> Result<ClientCert, SoapError> {
    let pem = fs::read(path)?;
    let certs = certificates_from_pem(&pem, path)?;
    let key = private_key_from_pem(&pem, path)?;
    Ok(ClientCert::new_with_certs(&certs, key))
}

fn certificates_from_pem(
    pem: &[u8],
    path: &Path,
) -> Result<Vec<Certificate<'static>>, SoapError> {
    let mut certs = Vec::new();
    for item in parse_pem(pem) {
        let item = item.map_err(|error| SoapError::Tls(error.to_string()))?;
        if let PemItem::Certificate(cert) = item {
            certs.push(cert.to_owned());
        }
    }
    if certs.is_empty() {
        return Err(SoapError::Tls(format!(
            "no certificate found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

fn private_key_from_pem(pem: &[u8], path: &Path) -> Result<PrivateKey<'static>, SoapError> {
    for item in parse_pem(pem) {
        let item = item.map_err(|error| SoapError::Tls(error.to_string()))?;
        if let PemItem::PrivateKey(key) = item {
            return Ok(key.to_owned());
        }
    }
    Err(SoapError::Tls(format!(
        "no private key found in {}",
        path.display()
    )))
}
