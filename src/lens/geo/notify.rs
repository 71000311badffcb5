//! Lookup notifications
//!
//! The [`GeoLens`](super::GeoLens) reports progress through a [`Notifier`] so
//! that a frontend can show a spinner, a toast or a log line without the lens
//! knowing which.

use tracing::{error, info};

pub trait Notifier {
    /// A lookup for `query` has started
    fn loading(&self, _query: &str) {}

    /// A lookup completed
    fn success(&self, message: &str);

    /// A lookup failed; `message` is meant for the user
    fn failure(&self, message: &str);
}

/// Reports through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn loading(&self, query: &str) {
        info!("looking up {}", query);
    }

    fn success(&self, message: &str) {
        info!("{}", message);
    }

    fn failure(&self, message: &str) {
        error!("{}", message);
    }
}

/// Discards all notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn success(&self, _message: &str) {}

    fn failure(&self, _message: &str) {}
}
