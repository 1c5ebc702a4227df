//! Client library for the freegeoip.net reverse-geocoding HTTP API.
//!
//! freegeoip.net resolves an IP address or domain name to approximate
//! location metadata (country, region, city, time zone, coordinates).
//! The public service allows a fixed number of queries per hour; once the
//! quota is exceeded all further requests answer HTTP 403 until it clears.
//!
//! For more information, choose one of the modules below.
//! The following modules might be of interest:
//! - [`lookup`] holds the [`GeoIpClient`] used to configure and execute a single lookup
//! - [`transport`] is the HTTP layer; implement [`Transport`] to substitute your own fetch
//! - [`validate`] exposes the input normalization backing the client setters

#![allow(clippy::uninlined_format_args)]

pub mod lookup;
pub mod transport;
pub mod validate;

// Re-exports for convenience
pub use lookup::{DecodeError, GeoIpClient, LookupError, LookupResponse, ResponseFormat, Scheme};
pub use transport::{FetchResponse, HttpTransport, Transport, TransportError};
pub use validate::Normalized;
