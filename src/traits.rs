//! Routing seam.
//!
//! Renderers talk to a [`Router`]; the HTTP client is one implementation,
//! test doubles and alternative transports are others.

use std::collections::BTreeMap;

use crate::error::RoutingError;
use crate::model::{Route, Waypoint};

/// Per-request routing options.
///
/// `costing` labels the travel-mode profile and is copied onto the route.
/// `params` are passed through to the service untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingOptions {
    pub costing: Option<String>,
    pub params: BTreeMap<String, String>,
}

impl RoutingOptions {
    pub fn with_costing(mut self, costing: impl Into<String>) -> Self {
        self.costing = Some(costing.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Overlays `other` on top of these options.
    pub fn merged(&self, other: &RoutingOptions) -> RoutingOptions {
        let mut params = self.params.clone();
        params.extend(other.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        RoutingOptions {
            costing: other.costing.clone().or_else(|| self.costing.clone()),
            params,
        }
    }
}

/// Computes one route through the given waypoints.
///
/// Implementations must reject fewer than two waypoints without contacting
/// any service.
pub trait Router {
    fn route(&self, waypoints: &[Waypoint], options: &RoutingOptions) -> Result<Route, RoutingError>;
}
