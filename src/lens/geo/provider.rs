//! Lookup providers
//!
//! A provider takes an optional [`QueryTarget`] and returns the raw response of
//! a geolocation service. [`IpifyProvider`] talks to the ipify geolocation API
//! over HTTP; [`MockProvider`] returns a fixed answer for offline use and tests.

use super::error::LookupError;
use crate::config::IpgeoConfig;
use crate::lens::target::QueryTarget;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;

/// Default ipify geolocation endpoint (country and city granularity)
pub const IPIFY_GEO_API: &str = crate::config::DEFAULT_BASE_URL;

// =============================================================================
// Response types
// =============================================================================

/// Raw provider response
///
/// Every field is optional so that shaping, not deserialization, decides what
/// a usable response is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoResponse {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default, rename = "as")]
    pub autonomous_system: Option<GeoAutonomousSystem>,
    #[serde(default)]
    pub isp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub geoname_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoAutonomousSystem {
    #[serde(default)]
    pub asn: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

// =============================================================================
// Provider trait
// =============================================================================

/// Source of geolocation data
pub trait LookupProvider {
    /// Fetch data for `target`, or for the caller's own address when `None`
    fn fetch(&self, target: Option<&QueryTarget>) -> Result<GeoResponse, LookupError>;

    /// Provider name, for logs
    fn name(&self) -> &'static str;
}

// =============================================================================
// ipify
// =============================================================================

/// Compose the request URL for the ipify endpoint
///
/// The API key is percent-encoded; the target value already is.
pub fn build_api_url(base_url: &str, api_key: &str, target: Option<&QueryTarget>) -> String {
    let mut url = format!("{}?apiKey={}", base_url, urlencoding::encode(api_key));
    if let Some(target) = target {
        url.push('&');
        url.push_str(&target.to_string());
    }
    url
}

/// HTTP provider for the ipify geolocation API
pub struct IpifyProvider {
    agent: Agent,
    base_url: String,
    api_key: Option<String>,
}

impl IpifyProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn from_config(config: &IpgeoConfig) -> Self {
        Self::new(&config.base_url, config.api_key.clone(), config.timeout())
    }

    /// Request URL for `target`; fails when no API key is configured
    pub fn api_url(&self, target: Option<&QueryTarget>) -> Result<String, LookupError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LookupError::Auth("No API key configured (set IPGEO_API_KEY)".to_string())
        })?;
        Ok(build_api_url(&self.base_url, api_key, target))
    }

    fn redact(&self, url: &str) -> String {
        match &self.api_key {
            Some(key) => url.replace(urlencoding::encode(key).as_ref(), "***"),
            None => url.to_string(),
        }
    }
}

impl LookupProvider for IpifyProvider {
    fn fetch(&self, target: Option<&QueryTarget>) -> Result<GeoResponse, LookupError> {
        let url = self.api_url(target)?;
        debug!("requesting {}", self.redact(&url));

        let mut response = match self.agent.get(&url).call() {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(status)) => {
                warn!("{} returned HTTP {}", self.name(), status);
                return Err(LookupError::from_status(status));
            }
            Err(e) => {
                return Err(LookupError::Upstream {
                    status: None,
                    message: format!("Failed to fetch IP data: {}", e),
                })
            }
        };

        match response.body_mut().read_json::<GeoResponse>() {
            Ok(resp) => Ok(resp),
            Err(ureq::Error::Json(e)) => Err(LookupError::MalformedResponse(format!(
                "Invalid response: {}",
                e
            ))),
            Err(e) => Err(LookupError::Upstream {
                status: None,
                message: format!("Failed to read response body: {}", e),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "ipify"
    }
}

// =============================================================================
// Mock
// =============================================================================

/// Offline provider returning a fixed response
///
/// A target whose value is `invalid` is answered the way the real API answers
/// unknown input (HTTP 422).
#[derive(Debug, Clone)]
pub struct MockProvider {
    response: GeoResponse,
    delay: Duration,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            response: GeoResponse {
                ip: Some("192.168.1.1".to_string()),
                location: Some(GeoLocation {
                    country: Some("Nigeria".to_string()),
                    region: Some("Lagos".to_string()),
                    city: Some("Lagos".to_string()),
                    lat: Some(6.5244),
                    lng: Some(3.3792),
                    timezone: Some("+01:00".to_string()),
                    ..Default::default()
                }),
                autonomous_system: None,
                isp: Some("Mock ISP Ltd.".to_string()),
            },
            delay: Duration::ZERO,
        }
    }

    /// Answer every lookup with `response`
    pub fn with_response(mut self, response: GeoResponse) -> Self {
        self.response = response;
        self
    }

    /// Sleep for `delay` before answering, to simulate network latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupProvider for MockProvider {
    fn fetch(&self, target: Option<&QueryTarget>) -> Result<GeoResponse, LookupError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        if target.is_some_and(|t| t.value == "invalid") {
            return Err(LookupError::from_status(422));
        }

        Ok(self.response.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::target::build_query_target;
    use mockito::Matcher;

    const SAMPLE: &str = r#"{
        "ip": "8.8.8.8",
        "location": {
            "country": "US",
            "region": "California",
            "city": "Mountain View",
            "lat": 37.40599,
            "lng": -122.078514,
            "postalCode": "94043",
            "timezone": "-07:00",
            "geonameId": 5375481
        },
        "domains": ["dns.google"],
        "as": {
            "asn": 15169,
            "name": "Google LLC",
            "route": "8.8.8.0/24",
            "domain": "https://about.google/intl/en/",
            "type": "Content"
        },
        "isp": "Google LLC"
    }"#;

    fn provider_for(server_url: &str, key: Option<&str>) -> IpifyProvider {
        IpifyProvider::new(
            &format!("{}/api/v2/country,city", server_url),
            key.map(|k| k.to_string()),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_build_api_url() {
        let target = build_query_target("example.com").unwrap();
        assert_eq!(
            build_api_url(IPIFY_GEO_API, "at_key", target.as_ref()),
            "https://geo.ipify.org/api/v2/country,city?apiKey=at_key&domain=example.com"
        );
        assert_eq!(
            build_api_url(IPIFY_GEO_API, "a b", None),
            "https://geo.ipify.org/api/v2/country,city?apiKey=a%20b"
        );
    }

    #[test]
    fn test_deserialize_sample() {
        let resp: GeoResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(resp.ip.as_deref(), Some("8.8.8.8"));
        let location = resp.location.unwrap();
        assert_eq!(location.postal_code.as_deref(), Some("94043"));
        assert_eq!(location.geoname_id, Some(5375481));
        let asys = resp.autonomous_system.unwrap();
        assert_eq!(asys.asn, Some(15169));
        assert_eq!(asys.kind.as_deref(), Some("Content"));
    }

    #[test]
    fn test_missing_api_key() {
        let provider =
            IpifyProvider::new(IPIFY_GEO_API, Some("  ".to_string()), Duration::from_secs(1));
        let err = provider.fetch(None).unwrap_err();
        assert_eq!(err.kind(), "auth");
    }

    #[test]
    fn test_ipify_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v2/country,city")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
                Matcher::UrlEncoded("ipAddress".into(), "8.8.8.8".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE)
            .create();

        let provider = provider_for(&server.url(), Some("test-key"));
        let target = build_query_target("8.8.8.8").unwrap();
        let resp = provider.fetch(target.as_ref()).unwrap();

        mock.assert();
        assert_eq!(resp.isp.as_deref(), Some("Google LLC"));
    }

    #[test]
    fn test_ipify_status_mapping() {
        let cases = [(403, "auth"), (429, "quota"), (422, "upstream"), (500, "upstream")];
        for (status, kind) in cases {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/api/v2/country,city")
                .match_query(Matcher::Any)
                .with_status(status)
                .create();

            let provider = provider_for(&server.url(), Some("test-key"));
            let err = provider.fetch(None).unwrap_err();
            assert_eq!(err.kind(), kind, "status {}", status);
        }
    }

    #[test]
    fn test_ipify_malformed_json() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/api/v2/country,city")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();

        let provider = provider_for(&server.url(), Some("test-key"));
        let err = provider.fetch(None).unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[test]
    fn test_mock_provider() {
        let provider = MockProvider::new();
        let resp = provider.fetch(None).unwrap();
        assert_eq!(resp.isp.as_deref(), Some("Mock ISP Ltd."));

        let target = build_query_target("invalid").unwrap();
        let err = provider.fetch(target.as_ref()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid IP address or domain name");
    }

    #[test]
    fn test_mock_provider_custom_response() {
        let response: GeoResponse = serde_json::from_str(SAMPLE).unwrap();
        let provider = MockProvider::new()
            .with_response(response.clone())
            .with_delay(Duration::from_millis(5));

        let started = std::time::Instant::now();
        assert_eq!(provider.fetch(None).unwrap(), response);
        assert!(started.elapsed() >= Duration::from_millis(5));
        assert_eq!(provider.name(), "mock");
    }
}
