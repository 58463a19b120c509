/// Owned snapshot of an HTTP response:
/// - status code and reason phrase
/// - response headers in arrival order
/// - full body text
/// - the URL the request was sent to
///
/// The most recent snapshot of each client is kept in its last-response
/// slot for inspection after the call.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub url: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
