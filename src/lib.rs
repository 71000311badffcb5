#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! ipgeo - IP address and domain geolocation lookups
//!
//! ipgeo validates user input as an IPv4 address or a domain name, composes the
//! matching query for a geolocation API, and shapes the answer into display
//! rows and map coordinates. It can be used as both a command-line application
//! and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Input classification and query composition | `urlencoding` |
//! | `lens-geo` | Lookup orchestration, ipify and mock providers | `ureq` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | CLI binary | All above + `clap`, `indicatif` |
//!
//! ```toml
//! # Validation only
//! ipgeo = { version = "0.1", default-features = false }
//!
//! # Lookups without the CLI
//! ipgeo = { version = "0.1", default-features = false, features = ["lens-geo"] }
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: high-level business logic
//!   - `target`: IPv4/domain validation and query composition (always available)
//!   - `geo`: lookup state machine, providers and notifiers (requires `lens-geo`)
//!   - `utils`: output formats
//! - **[`config`]**: configuration management
//!
//! # Quick Start
//!
//! ```rust
//! use ipgeo::lens::target::{build_query_target, classify, InputClassification};
//!
//! assert_eq!(classify("192.168.1.1"), InputClassification::Ipv4);
//! assert!(build_query_target("not a domain!!").is_err());
//! ```
//!
//! ```rust,ignore
//! use ipgeo::lens::geo::{GeoLens, GeoLookupArgs, MockProvider};
//!
//! let mut lens = GeoLens::new(Box::new(MockProvider::new()));
//! let result = lens.lookup(&GeoLookupArgs::new("example.com"))?;
//! println!("{} is at {:?}", result.ip, result.coordinates);
//! ```

pub mod config;
pub mod lens;

pub use config::IpgeoConfig;

pub use lens::target::{
    build_query_target, classify, is_domain_like, is_ipv4_literal, InputClassification,
    InvalidInputError, QueryTarget,
};

pub use lens::utils::OutputFormat;

#[cfg(feature = "lens-geo")]
pub use lens::geo::{GeoLens, GeoLookupArgs, GeoResult, LookupError, LookupState, MapCoordinates};
