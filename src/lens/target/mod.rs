//! Lookup target lens
//!
//! This module decides what a piece of user input asks for (an IPv4 address, a
//! domain, or nothing at all) and turns it into the query parameter used by the
//! geolocation lookup. Everything here is pure and offline.
//!
//! # Example
//!
//! ```rust
//! use ipgeo::lens::target::{build_query_target, classify, InputClassification};
//!
//! assert_eq!(classify("example.com"), InputClassification::Domain);
//!
//! let target = build_query_target("https://www.example.com/about").unwrap();
//! assert_eq!(target.unwrap().to_string(), "domain=example.com");
//! ```

mod query;
mod validator;

pub use query::{
    build_query_target, classify, InputClassification, InvalidInputError, QueryKey, QueryTarget,
    INVALID_INPUT_MESSAGE,
};
pub use validator::{
    is_domain_like, is_ipv4_literal, normalize_domain, MAX_DOMAIN_LEN, MAX_LABEL_LEN,
};

use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// Classification report for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReport {
    /// Input as given
    pub input: String,
    /// Input after trimming (and, for domains, normalization)
    pub normalized: String,
    /// What the input was classified as
    pub classification: InputClassification,
    /// Query parameter that a lookup would send
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<QueryTarget>,
}

// =============================================================================
// Lens
// =============================================================================

/// Offline classification lens
///
/// Wraps the free functions of this module for callers that want one report
/// per input, e.g. the `classify` command.
pub struct TargetLens;

impl TargetLens {
    /// Create a new target lens
    pub fn new() -> Self {
        Self
    }

    /// Classify a single input
    pub fn report(&self, input: &str) -> TargetReport {
        let classification = classify(input);
        let normalized = match classification {
            InputClassification::Domain => normalize_domain(input),
            _ => input.trim(),
        };

        TargetReport {
            input: input.to_string(),
            normalized: normalized.to_string(),
            classification,
            target: build_query_target(input).ok().flatten(),
        }
    }

    /// Classify several inputs, keeping their order
    pub fn report_all(&self, inputs: &[String]) -> Vec<TargetReport> {
        inputs.iter().map(|i| self.report(i)).collect()
    }
}

impl Default for TargetLens {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_domain() {
        let lens = TargetLens::new();
        let report = lens.report("http://www.example.org:8080/index.html");
        assert_eq!(report.classification, InputClassification::Domain);
        assert_eq!(report.normalized, "example.org");
        assert_eq!(
            report.target.map(|t| t.to_string()),
            Some("domain=example.org".to_string())
        );
    }

    #[test]
    fn test_report_all_keeps_order() {
        let lens = TargetLens::new();
        let inputs = vec![
            "1.1.1.1".to_string(),
            "".to_string(),
            "bad input".to_string(),
        ];
        let reports = lens.report_all(&inputs);
        let kinds: Vec<_> = reports.iter().map(|r| r.classification).collect();
        assert_eq!(
            kinds,
            vec![
                InputClassification::Ipv4,
                InputClassification::Empty,
                InputClassification::Invalid
            ]
        );
        assert!(reports[1].target.is_none());
        assert!(reports[2].target.is_none());
    }

    #[test]
    fn test_report_serialization_skips_missing_target() {
        let lens = TargetLens::new();
        let json = serde_json::to_string(&lens.report("???")).unwrap();
        assert!(json.contains(r#""classification":"invalid""#));
        assert!(!json.contains("target"));
    }
}
