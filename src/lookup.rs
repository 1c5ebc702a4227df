//! Reverse-geocoding lookups against the freegeoip.net HTTP API.
//!
//! A [`GeoIpClient`] holds one lookup target (IP address or domain), a
//! response format and a URL scheme. It builds the request URL, performs
//! exactly one blocking fetch through its [`Transport`] and decodes the
//! response in the requested format. Instances are independent; there is
//! no shared state between lookups.

use std::fmt::Display;
use std::net::IpAddr;

use log::{debug, warn};
use thiserror::Error;

use crate::transport::{HttpTransport, Transport, TransportError};
use crate::validate::{self, Normalized};

/// Host of the freegeoip API. The request path is `/{format}/{target}`.
pub const API_HOST: &str = "www.freegeoip.net";

/// Response format of a lookup request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    Json,
    Xml,
    Csv,
}

impl ResponseFormat {
    /// Coerce arbitrary input to a response format. Matching is
    /// case-insensitive and ignores surrounding whitespace; anything
    /// unrecognized falls back to [`ResponseFormat::Json`].
    pub fn normalize(input: &str) -> Normalized<ResponseFormat> {
        match input.trim().to_ascii_lowercase().as_str() {
            "json" => Normalized::accepted(ResponseFormat::Json),
            "xml" => Normalized::accepted(ResponseFormat::Xml),
            "csv" => Normalized::accepted(ResponseFormat::Csv),
            _ => Normalized::rejected(ResponseFormat::default()),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ResponseFormat::Json)
    }

    pub fn is_xml(&self) -> bool {
        matches!(self, ResponseFormat::Xml)
    }

    pub fn is_csv(&self) -> bool {
        matches!(self, ResponseFormat::Csv)
    }
}

impl Default for ResponseFormat {
    fn default() -> Self {
        ResponseFormat::Json
    }
}

impl Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResponseFormat::Json => "json",
                ResponseFormat::Xml => "xml",
                ResponseFormat::Csv => "csv",
            }
        )
    }
}

/// URL scheme used to reach the API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Coerce arbitrary input to a scheme, falling back to
    /// [`Scheme::Https`] for anything unrecognized.
    pub fn normalize(input: &str) -> Normalized<Scheme> {
        match input.trim().to_ascii_lowercase().as_str() {
            "http" => Normalized::accepted(Scheme::Http),
            "https" => Normalized::accepted(Scheme::Https),
            _ => Normalized::rejected(Scheme::default()),
        }
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Scheme::Https
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Scheme::Http => "http",
                Scheme::Https => "https",
            }
        )
    }
}

/// A decoded lookup response, by requested format.
///
/// Field names and document structure are owned by the upstream service
/// and passed through as-is.
#[derive(Debug)]
pub enum LookupResponse {
    /// JSON body as a generic value.
    Json(serde_json::Value),
    /// CSV body as the ordered sequence of comma-separated fields.
    Csv(Vec<String>),
    /// XML body as a parsed document tree.
    Xml(xmltree::Element),
}

/// Error decoding a response body in the requested format.
///
/// Carries the offending body so callers can inspect what the service
/// actually returned.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {body:?}")]
    Json {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("response body is not valid XML: {body:?}")]
    Xml {
        body: String,
        #[source]
        source: xmltree::ParseError,
    },
}

/// Error returned by a lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("decode failure: {0}")]
    Decode(#[from] DecodeError),
}

/// Client for a single reverse-geocoding target.
///
/// Setters never fail: invalid target input clears the field and invalid
/// format/scheme input falls back to the default, matching the lenient
/// contract of the upstream API. Use [`crate::validate`] or the
/// `normalize` functions directly to observe whether an input was
/// accepted.
///
/// ```no_run
/// use freegeoip_client::GeoIpClient;
///
/// let mut client = GeoIpClient::try_new("203.0.113.9".parse()?)?;
/// client.set_domain("github.com").set_format("json");
/// let location = client.lookup()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct GeoIpClient {
    ip_address: Option<IpAddr>,
    domain: Option<String>,
    format: ResponseFormat,
    scheme: Scheme,
    fallback_address: IpAddr,
    transport: Box<dyn Transport>,
}

impl GeoIpClient {
    /// Create a client over the default HTTP transport.
    ///
    /// `fallback_address` is the caller's own network address; it becomes
    /// the lookup target when neither an IP address nor a domain is set.
    pub fn try_new(fallback_address: IpAddr) -> Result<GeoIpClient, TransportError> {
        Ok(GeoIpClient::with_transport(
            fallback_address,
            Box::new(HttpTransport::try_new()?),
        ))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(fallback_address: IpAddr, transport: Box<dyn Transport>) -> GeoIpClient {
        GeoIpClient {
            ip_address: None,
            domain: None,
            format: ResponseFormat::default(),
            scheme: Scheme::default(),
            fallback_address,
            transport,
        }
    }

    /// Set the IP address to reverse geocode. Anything that is not a
    /// public IP literal clears the field.
    pub fn set_ip_address(&mut self, input: &str) -> &mut Self {
        self.ip_address = validate::ip_address(input).value;
        self
    }

    /// Set the domain to reverse geocode, either as a bare hostname or as
    /// a URL whose host is extracted. Invalid input clears the field.
    pub fn set_domain(&mut self, input: &str) -> &mut Self {
        self.domain = validate::domain(input).value;
        self
    }

    /// Set the response format, falling back to JSON for unrecognized
    /// input.
    pub fn set_format(&mut self, input: &str) -> &mut Self {
        self.format = ResponseFormat::normalize(input).value;
        self
    }

    /// Set the URL scheme, falling back to HTTPS for unrecognized input.
    pub fn set_scheme(&mut self, input: &str) -> &mut Self {
        self.scheme = Scheme::normalize(input).value;
        self
    }

    pub fn ip_address(&self) -> Option<IpAddr> {
        self.ip_address
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn fallback_address(&self) -> IpAddr {
        self.fallback_address
    }

    // Lookup target, by precedence: explicit IP address, then explicit
    // domain, then the fallback address
    fn target(&self) -> String {
        if let Some(addr) = self.ip_address {
            addr.to_string()
        } else if let Some(domain) = &self.domain {
            domain.to_owned()
        } else {
            self.fallback_address.to_string()
        }
    }

    /// Build the request URL for the current configuration.
    pub fn request_url(&self) -> String {
        format!(
            "{}://{}/{}/{}",
            self.scheme,
            API_HOST,
            self.format,
            self.target()
        )
    }

    /// Execute the lookup and decode the response in the requested
    /// format.
    pub fn lookup(&self) -> Result<LookupResponse, LookupError> {
        let body = self.fetch()?;
        let decoded = match self.format {
            ResponseFormat::Json => LookupResponse::Json(decode_json(body)?),
            ResponseFormat::Csv => LookupResponse::Csv(decode_csv(&body)),
            ResponseFormat::Xml => LookupResponse::Xml(decode_xml(body)?),
        };
        Ok(decoded)
    }

    /// Execute the lookup and return the raw response body.
    pub fn lookup_raw(&self) -> Result<String, LookupError> {
        Ok(self.fetch()?)
    }

    fn fetch(&self) -> Result<String, TransportError> {
        let url = self.request_url();
        debug!("querying {}", url);
        let response = self.transport.fetch(&url)?;
        if !response.status.is_success() {
            // Quota exhaustion answers 403 with a parseable body
            warn!("{} answered {}", url, response.status);
        }
        Ok(response.body)
    }
}

fn decode_json(body: String) -> Result<serde_json::Value, DecodeError> {
    serde_json::from_str(&body).map_err(|source| DecodeError::Json { body, source })
}

fn decode_csv(body: &str) -> Vec<String> {
    body.trim_end().split(',').map(str::to_owned).collect()
}

fn decode_xml(body: String) -> Result<xmltree::Element, DecodeError> {
    xmltree::Element::parse(body.as_bytes()).map_err(|source| DecodeError::Xml { body, source })
}
