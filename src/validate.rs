//! Input validation and normalization for lookup targets.
//!
//! Every function in this module is total: bad input never raises an
//! error, it normalizes to the unset/default value instead. The
//! [`Normalized`] wrapper carries an `accepted` flag so callers can still
//! observe whether their input survived the normalization.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// Dot-separated alphanumeric/hyphen labels ending in a 2-6 letter TLD
static HOSTNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,6}$").unwrap());

/// A normalization result: the definite value to use, plus whether the
/// original input was accepted or replaced by the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Normalized<T> {
    pub value: T,
    pub accepted: bool,
}

impl<T> Normalized<T> {
    pub(crate) fn accepted(value: T) -> Self {
        Normalized {
            value,
            accepted: true,
        }
    }

    pub(crate) fn rejected(value: T) -> Self {
        Normalized {
            value,
            accepted: false,
        }
    }
}

/// Validate an IP address literal for use as a lookup target.
///
/// Accepts syntactically valid, globally routable IPv4/IPv6 literals.
/// Private, loopback, link-local, multicast and otherwise reserved
/// addresses are rejected along with anything that does not parse;
/// rejected input normalizes to `None`.
pub fn ip_address(input: &str) -> Normalized<Option<IpAddr>> {
    let trimmed = input.trim();
    match trimmed.parse::<IpAddr>() {
        Ok(addr) if is_public(&addr) => Normalized::accepted(Some(addr)),
        Ok(addr) => {
            debug!("rejecting non-public address {}", addr);
            Normalized::rejected(None)
        }
        Err(_) => {
            if !trimmed.is_empty() {
                debug!("rejecting malformed address {:?}", input);
            }
            Normalized::rejected(None)
        }
    }
}

/// Validate a domain for use as a lookup target.
///
/// The input may be a bare hostname or a full URL; for URL-like input the
/// host component is extracted first. Anything that does not match the
/// hostname pattern normalizes to `None`.
pub fn domain(input: &str) -> Normalized<Option<String>> {
    let trimmed = input.trim();
    let host = match Url::parse(trimmed) {
        Ok(url) => url.host_str().map(str::to_owned),
        Err(_) => None,
    }
    .unwrap_or_else(|| trimmed.to_owned());

    if HOSTNAME.is_match(&host) {
        Normalized::accepted(Some(host))
    } else {
        if !trimmed.is_empty() {
            debug!("rejecting domain input {:?}", input);
        }
        Normalized::rejected(None)
    }
}

fn is_public(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => is_public_v6(v6),
    }
}

// The stable std classifiers cover most ranges; shared (100.64/10),
// benchmarking (198.18/15) and future-reserved (240/4) are checked by octet
fn is_public_v4(addr: &Ipv4Addr) -> bool {
    let octets = addr.octets();
    let shared = octets[0] == 100 && (octets[1] & 0b1100_0000) == 64;
    let benchmarking = octets[0] == 198 && (octets[1] & 0xfe) == 18;
    let reserved = (octets[0] & 0xf0) == 240;
    !(addr.is_unspecified()
        || addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_broadcast()
        || addr.is_documentation()
        || addr.is_multicast()
        || shared
        || benchmarking
        || reserved)
}

fn is_public_v6(addr: &Ipv6Addr) -> bool {
    let segments = addr.segments();
    let unique_local = (segments[0] & 0xfe00) == 0xfc00;
    let link_local = (segments[0] & 0xffc0) == 0xfe80;
    let documentation = segments[0] == 0x2001 && segments[1] == 0xdb8;
    !(addr.is_unspecified()
        || addr.is_loopback()
        || addr.is_multicast()
        || unique_local
        || link_local
        || documentation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_public_addresses() {
        for input in ["8.8.8.8", "216.58.210.46", "2001:4860:4860::8888"] {
            let normalized = ip_address(input);
            assert!(normalized.accepted, "{} should be accepted", input);
            assert_eq!(normalized.value, Some(input.parse().unwrap()));
        }
    }

    #[test]
    fn should_accept_addresses_with_surrounding_whitespace() {
        let normalized = ip_address("  8.8.4.4\n");
        assert!(normalized.accepted);
        assert_eq!(normalized.value, Some("8.8.4.4".parse().unwrap()));
    }

    #[test]
    fn should_reject_private_and_reserved_addresses() {
        for input in [
            "10.0.0.1",
            "172.16.3.4",
            "192.168.1.1",
            "127.0.0.1",
            "169.254.10.10",
            "100.64.0.1",
            "198.18.0.1",
            "240.0.0.1",
            "255.255.255.255",
            "224.0.0.1",
            "192.0.2.55",
            "0.0.0.0",
            "::",
            "::1",
            "fe80::1",
            "fc00::1",
            "fd12:3456::1",
            "2001:db8::1",
            "ff02::1",
        ] {
            let normalized = ip_address(input);
            assert!(!normalized.accepted, "{} should be rejected", input);
            assert_eq!(normalized.value, None);
        }
    }

    #[test]
    fn should_reject_malformed_addresses() {
        for input in ["", "8.8.8", "256.1.1.1", "not-an-ip", "8.8.8.8/24"] {
            assert_eq!(ip_address(input).value, None);
        }
    }

    #[test]
    fn should_accept_bare_hostnames() {
        let normalized = domain("github.com");
        assert!(normalized.accepted);
        assert_eq!(normalized.value.as_deref(), Some("github.com"));

        assert_eq!(
            domain("maps.google.co.uk").value.as_deref(),
            Some("maps.google.co.uk")
        );
    }

    #[test]
    fn should_extract_host_from_urls() {
        let normalized = domain("http://github.com/test?test=3");
        assert!(normalized.accepted);
        assert_eq!(normalized.value.as_deref(), Some("github.com"));

        assert_eq!(
            domain("https://www.example.org/some/path").value.as_deref(),
            Some("www.example.org")
        );
    }

    #[test]
    fn should_reject_invalid_domains() {
        for input in [
            "",
            "localhost",
            "no-tld",
            "spaced name.com",
            "example.x",
            "example.toolongtld",
            "192.168.0.1",
        ] {
            let normalized = domain(input);
            assert!(!normalized.accepted, "{:?} should be rejected", input);
            assert_eq!(normalized.value, None);
        }
    }
}
