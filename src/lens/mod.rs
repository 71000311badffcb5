//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business logic
//! with output formatting. Lenses are reusable across interfaces: the CLI uses
//! them today, and nothing in them assumes a terminal.
//!
//! # Feature Requirements
//!
//! | Lens | Feature Required | Dependencies |
//! |------|-----------------|--------------|
//! | `TargetLens` | (always) | urlencoding |
//! | `GeoLens` | `lens-geo` | ureq |
//!
//! # Usage
//!
//! ```rust,ignore
//! // Offline input classification
//! use ipgeo::lens::target::{classify, build_query_target, TargetLens};
//!
//! // Geolocation lookup (lens-geo)
//! use ipgeo::lens::geo::{GeoLens, GeoLookupArgs, IpifyProvider, MockProvider};
//! ```

pub mod utils;

// TargetLens - input classification and query composition
pub mod target;

// GeoLens - lookup orchestration and providers
#[cfg(feature = "lens-geo")]
pub mod geo;
