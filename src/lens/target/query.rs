//! Query target composition
//!
//! Turns raw user input into the single query parameter the geolocation
//! endpoint expects, or rejects it before any request is made.

use super::validator::{is_domain_like, is_ipv4_literal, normalize_domain};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message shown when input is neither an IPv4 address nor a domain
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid IP address or domain name.";

/// What kind of lookup a piece of input asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputClassification {
    /// Nothing but whitespace; look up the caller's own address
    Empty,
    /// Dotted-quad IPv4 literal
    Ipv4,
    /// Hostname or URL that normalizes to a valid domain
    Domain,
    /// Neither of the above
    Invalid,
}

impl fmt::Display for InputClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputClassification::Empty => write!(f, "empty"),
            InputClassification::Ipv4 => write!(f, "ipv4"),
            InputClassification::Domain => write!(f, "domain"),
            InputClassification::Invalid => write!(f, "invalid"),
        }
    }
}

/// Query parameter name selecting the upstream lookup mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKey {
    #[serde(rename = "ipAddress")]
    IpAddress,
    #[serde(rename = "domain")]
    Domain,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::IpAddress => "ipAddress",
            QueryKey::Domain => "domain",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `key=value` query parameter; `value` is already percent-encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryTarget {
    pub key: QueryKey,
    pub value: String,
}

impl QueryTarget {
    fn new(key: QueryKey, raw_value: &str) -> Self {
        Self {
            key,
            value: urlencoding::encode(raw_value).into_owned(),
        }
    }
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Input that cannot be turned into a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please enter a valid IP address or domain name.")]
pub struct InvalidInputError {
    /// The rejected input, trimmed
    pub input: String,
}

/// Classify raw input; IPv4 is tried before domain
pub fn classify(raw: &str) -> InputClassification {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        InputClassification::Empty
    } else if is_ipv4_literal(trimmed) {
        InputClassification::Ipv4
    } else if is_domain_like(trimmed) {
        InputClassification::Domain
    } else {
        InputClassification::Invalid
    }
}

/// Build the query target for raw input
///
/// `Ok(None)` means the input was empty and the endpoint's default lookup
/// should be used.
pub fn build_query_target(raw: &str) -> Result<Option<QueryTarget>, InvalidInputError> {
    let trimmed = raw.trim();
    match classify(trimmed) {
        InputClassification::Empty => Ok(None),
        InputClassification::Ipv4 => Ok(Some(QueryTarget::new(QueryKey::IpAddress, trimmed))),
        InputClassification::Domain => Ok(Some(QueryTarget::new(
            QueryKey::Domain,
            normalize_domain(trimmed),
        ))),
        InputClassification::Invalid => Err(InvalidInputError {
            input: trimmed.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), InputClassification::Empty);
        assert_eq!(classify(" \t\n"), InputClassification::Empty);
        assert_eq!(classify("192.168.1.1"), InputClassification::Ipv4);
        assert_eq!(classify("  8.8.8.8  "), InputClassification::Ipv4);
        assert_eq!(classify("example.com"), InputClassification::Domain);
        assert_eq!(classify("localhost"), InputClassification::Domain);
        assert_eq!(classify("not a domain!!"), InputClassification::Invalid);
        assert_eq!(classify("256.1.1.1"), InputClassification::Invalid);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for input in ["", "1.1.1.1", "https://www.example.com/x", "bad..name", "host"] {
            let first = classify(input);
            assert_eq!(classify(input), first);
            assert_eq!(build_query_target(input), build_query_target(input));
        }
    }

    #[test]
    fn test_build_query_target_empty() {
        assert_eq!(build_query_target(""), Ok(None));
        assert_eq!(build_query_target("   "), Ok(None));
    }

    #[test]
    fn test_build_query_target_ipv4() {
        let target = build_query_target(" 192.168.1.1 ").unwrap().unwrap();
        assert_eq!(target.key, QueryKey::IpAddress);
        assert_eq!(target.value, "192.168.1.1");
        assert_eq!(target.to_string(), "ipAddress=192.168.1.1");
    }

    #[test]
    fn test_build_query_target_domain_is_normalized() {
        let target = build_query_target("https://www.example.com/path?x=1")
            .unwrap()
            .unwrap();
        assert_eq!(target.key, QueryKey::Domain);
        assert_eq!(target.value, "example.com");
        assert_eq!(target.to_string(), "domain=example.com");
    }

    #[test]
    fn test_build_query_target_invalid() {
        let err = build_query_target("invalid input").unwrap_err();
        assert_eq!(err.input, "invalid input");
        assert_eq!(err.to_string(), INVALID_INPUT_MESSAGE);
    }

    #[test]
    fn test_build_query_target_rejects_inner_whitespace() {
        for input in ["example.com /path", "https:// example.com", "example.com :8080"] {
            assert_eq!(classify(input), InputClassification::Invalid);
            assert!(build_query_target(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_query_target_serialization() {
        let target = build_query_target("1.1.1.1").unwrap().unwrap();
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, r#"{"key":"ipAddress","value":"1.1.1.1"}"#);

        let classification = serde_json::to_string(&InputClassification::Ipv4).unwrap();
        assert_eq!(classification, r#""ipv4""#);
    }
}
