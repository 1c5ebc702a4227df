//! The HTTP layer used to execute lookup requests.
//!
//! [`Transport`] is the single seam between the client and the network.
//! The default implementation is [`HttpTransport`]; callers can inject
//! their own implementation (the crate's own tests use a generated mock).

use std::fmt::Display;
use std::time::Duration;

use http::StatusCode;
use log::trace;

#[cfg(test)]
use mockall::automock;

// Connect and response timeout applied to every request
const TIMEOUT: Duration = Duration::from_secs(120);
// Redirects are followed up to this many hops
const MAX_REDIRECTS: usize = 10;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("freegeoip-client/", env!("CARGO_PKG_VERSION"));

/// A fetched response: the HTTP status and the body text.
///
/// The status is carried alongside the body because the upstream service
/// answers quota exhaustion with HTTP 403 and a body that is still worth
/// returning to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: String,
}

/// A `Transport` performs a single blocking GET and returns the response
/// body regardless of status code. Status interpretation is left to the
/// caller.
#[cfg_attr(test, automock)]
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

/// Error returned when the transport could not complete a request, such as
/// a refused connection, a timeout or a DNS failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportError {
    msg: String,
}
impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.msg)
    }
}
impl std::error::Error for TransportError {}
impl From<String> for TransportError {
    fn from(s: String) -> Self {
        TransportError { msg: s }
    }
}

/// Default [`Transport`] on top of a blocking reqwest client.
///
/// To create a transport, use the [`HttpTransport::try_new()`] function.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a new transport with the fixed timeout and redirect policy.
    /// Returns an error if the underlying client fails to initialize.
    pub fn try_new() -> Result<HttpTransport, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(TIMEOUT)
            .timeout(TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError { msg: e.to_string() })?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError { msg: e.to_string() })?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TransportError { msg: e.to_string() })?;
        trace!("{} answered {} ({} bytes)", url, status, body.len());
        Ok(FetchResponse { status, body })
    }
}
