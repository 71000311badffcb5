//! Geolocation lookup lens
//!
//! This module drives a complete lookup: the input is validated and turned into
//! a query target, a [`LookupProvider`] fetches the raw data, and the response
//! is shaped into display rows and map coordinates. Progress is reported
//! through a [`Notifier`] and the outcome is kept in an observable
//! [`LookupState`].
//!
//! # Feature Requirements
//!
//! This module requires the `lens-geo` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use ipgeo::lens::geo::{GeoLens, GeoLookupArgs, IpifyProvider};
//! use ipgeo::IpgeoConfig;
//!
//! let config = IpgeoConfig::new(&None)?;
//! let mut lens = GeoLens::new(Box::new(IpifyProvider::from_config(&config)));
//!
//! let result = lens.lookup(&GeoLookupArgs::new("example.com"))?;
//! for detail in &result.details {
//!     println!("{}: {}", detail.label, detail.value);
//! }
//! println!("{}", result.coordinates.map_url(config.map_zoom));
//! ```

mod error;
mod notify;
mod provider;

pub use error::LookupError;
pub use notify::{NoopNotifier, Notifier, TracingNotifier};
pub use provider::{
    build_api_url, GeoAutonomousSystem, GeoLocation, GeoResponse, IpifyProvider, LookupProvider,
    MockProvider, IPIFY_GEO_API,
};

use crate::lens::target::build_query_target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Types
// =============================================================================

/// One labelled row of lookup output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct GeoDetail {
    pub id: u32,
    pub label: String,
    pub value: String,
}

impl GeoDetail {
    fn new(id: u32, label: &str, value: String) -> Self {
        Self {
            id,
            label: label.to_string(),
            value,
        }
    }
}

/// Latitude/longitude pair; `(0, 0)` stands for "no location"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapCoordinates {
    pub lat: f64,
    pub lng: f64,
}

impl MapCoordinates {
    /// OpenStreetMap link centered on the coordinates with a marker
    pub fn map_url(&self, zoom: u8) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lng:.4}#map={zoom}/{lat:.4}/{lng:.4}",
            lat = self.lat,
            lng = self.lng,
            zoom = zoom,
        )
    }
}

/// Autonomous system announcing the looked-up address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub asn: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// A shaped, successful lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub ip: String,
    pub details: Vec<GeoDetail>,
    pub coordinates: MapCoordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkInfo>,
    pub fetched_at: DateTime<Utc>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl GeoResult {
    /// Shape a raw provider response
    ///
    /// Fails when the address, the location block or either coordinate is
    /// missing.
    pub fn from_response(resp: GeoResponse) -> Result<Self, LookupError> {
        let (ip, location) = match (non_empty(resp.ip.as_ref()), resp.location.as_ref()) {
            (Some(ip), Some(location)) => (ip.to_string(), location),
            _ => return Err(LookupError::MalformedResponse("Invalid response".to_string())),
        };

        let place: Vec<&str> = [location.region.as_ref(), location.country.as_ref()]
            .into_iter()
            .filter_map(non_empty)
            .collect();
        let place = if place.is_empty() {
            "Unknown".to_string()
        } else {
            place.join(", ")
        };

        let timezone = match non_empty(location.timezone.as_ref()) {
            Some(tz) => format!("UTC{}", tz),
            None => "N/A".to_string(),
        };

        let isp = non_empty(resp.isp.as_ref()).unwrap_or("Unknown").to_string();

        let coordinates = match (location.lat, location.lng) {
            (Some(lat), Some(lng)) => MapCoordinates { lat, lng },
            _ => {
                return Err(LookupError::MalformedResponse(
                    "Location coordinates are not available".to_string(),
                ))
            }
        };

        let network = resp.autonomous_system.as_ref().and_then(|a| {
            a.asn.filter(|asn| *asn != 0).map(|asn| NetworkInfo {
                asn,
                name: non_empty(a.name.as_ref()).map(str::to_string),
                route: non_empty(a.route.as_ref()).map(str::to_string),
            })
        });

        Ok(GeoResult {
            details: vec![
                GeoDetail::new(1, "IP Address", ip.clone()),
                GeoDetail::new(2, "Location", place),
                GeoDetail::new(3, "Time Zone", timezone),
                GeoDetail::new(4, "ISP", isp),
            ],
            ip,
            coordinates,
            network,
            fetched_at: Utc::now(),
        })
    }
}

/// Observable state of a [`GeoLens`]
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Success(GeoResult),
    Failure(String),
}

// =============================================================================
// Args
// =============================================================================

/// Arguments for a lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoLookupArgs {
    /// IP address, domain or URL; empty or absent looks up the caller's address
    #[serde(default)]
    pub query: Option<String>,
}

impl GeoLookupArgs {
    pub fn new(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
        }
    }

    /// Look up the caller's own public address
    pub fn public_ip() -> Self {
        Self::default()
    }

    fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Geolocation lookup lens
///
/// Holds the provider, the notifier and the state of the last lookup. Taking
/// `&mut self` in [`GeoLens::lookup`] keeps a lens to one lookup at a time;
/// each call overwrites whatever the previous one left behind.
pub struct GeoLens {
    provider: Box<dyn LookupProvider>,
    notifier: Box<dyn Notifier>,
    state: LookupState,
}

impl GeoLens {
    /// Create a lens reporting through `tracing`
    pub fn new(provider: Box<dyn LookupProvider>) -> Self {
        Self {
            provider,
            notifier: Box::new(TracingNotifier),
            state: LookupState::Idle,
        }
    }

    /// Replace the notifier
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LookupState::Loading)
    }

    /// Result of the last lookup, if it succeeded
    pub fn result(&self) -> Option<&GeoResult> {
        match &self.state {
            LookupState::Success(result) => Some(result),
            _ => None,
        }
    }

    /// Error message of the last lookup, if it failed
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LookupState::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Coordinates of the last successful lookup, `(0, 0)` otherwise
    pub fn coordinates(&self) -> MapCoordinates {
        self.result()
            .map(|r| r.coordinates)
            .unwrap_or_default()
    }

    /// Run one lookup
    pub fn lookup(&mut self, args: &GeoLookupArgs) -> Result<GeoResult, LookupError> {
        let query = args.query().trim();
        let label = if query.is_empty() {
            "your public IP"
        } else {
            query
        };

        self.state = LookupState::Loading;
        self.notifier.loading(label);

        match self.fetch(query) {
            Ok(result) => {
                debug!("{} resolved {} to {}", self.provider.name(), label, result.ip);
                self.notifier
                    .success(&format!("Found details for {}", result.ip));
                self.state = LookupState::Success(result.clone());
                Ok(result)
            }
            Err(e) => {
                debug!("{} lookup for {} failed: {:?}", self.provider.name(), label, e);
                let message = e.to_string();
                self.notifier.failure(&message);
                self.state = LookupState::Failure(message);
                Err(e)
            }
        }
    }

    fn fetch(&self, query: &str) -> Result<GeoResult, LookupError> {
        let target = build_query_target(query)?;
        let response = self.provider.fetch(target.as_ref())?;
        GeoResult::from_response(response)
    }

    /// Forget the last lookup
    pub fn reset(&mut self) {
        self.state = LookupState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
