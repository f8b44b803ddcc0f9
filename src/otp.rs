//! OpenTripPlanner HTTP adapter.
//!
//! Issues a blocking `plan` request and hands the response to the
//! assembler. The request timeout is enforced by the HTTP client.

use reqwest::Url;
use tracing::{debug, warn};

use crate::assembler::assemble_plan;
use crate::document::PlanDocument;
use crate::error::{RoutingError, TRANSPORT_STATUS};
use crate::model::{Coordinate, Route, Waypoint};
use crate::traits::{Router, RoutingOptions};

#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Router base URL; `plan` is appended to it.
    pub service_url: String,
    pub timeout_secs: u64,
    /// Defaults applied to every request, overridden per request.
    pub routing: RoutingOptions,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000/otp/routers/default/".to_string(),
            timeout_secs: 30,
            routing: RoutingOptions::default(),
        }
    }
}

impl OtpConfig {
    /// Defaults overridden by `OTP_SERVICE_URL` and `OTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("OTP_SERVICE_URL") {
            config.service_url = url;
        }
        if let Some(secs) = std::env::var("OTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct OtpClient {
    config: OtpConfig,
    client: reqwest::blocking::Client,
}

impl OtpClient {
    pub fn new(config: OtpConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Builds the `plan` URL for the first and last waypoints, with any
    /// waypoints in between sent as intermediate places.
    pub fn build_route_url(
        &self,
        waypoints: &[Waypoint],
        options: &RoutingOptions,
    ) -> Result<Url, RoutingError> {
        let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) else {
            return Err(RoutingError::TooFewWaypoints(waypoints.len()));
        };
        if waypoints.len() < 2 {
            return Err(RoutingError::TooFewWaypoints(waypoints.len()));
        }
        if let Some((index, waypoint)) = waypoints
            .iter()
            .enumerate()
            .find(|(_, waypoint)| !waypoint.latlng.is_valid())
        {
            return Err(RoutingError::InvalidCoordinate {
                index,
                lat: waypoint.latlng.lat,
                lng: waypoint.latlng.lng,
            });
        }

        let mut base = self.config.service_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        base.push_str("plan");

        let mut params: Vec<(String, String)> = options
            .params
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        params.push(("fromPlace".to_string(), location_key(first.latlng)));
        params.push(("toPlace".to_string(), location_key(last.latlng)));
        for via in &waypoints[1..waypoints.len() - 1] {
            params.push(("intermediatePlaces".to_string(), location_key(via.latlng)));
        }

        Url::parse_with_params(&base, &params).map_err(|err| RoutingError::InvalidUrl(err.to_string()))
    }
}

impl Router for OtpClient {
    fn route(&self, waypoints: &[Waypoint], options: &RoutingOptions) -> Result<Route, RoutingError> {
        let options = self.config.routing.merged(options);
        let url = self.build_route_url(waypoints, &options)?;
        // Snapshot taken before the request so the route reflects what was asked.
        let input = waypoints.to_vec();

        debug!(%url, "requesting trip plan");
        let response = self.client.get(url).send().map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().map_err(transport_error)?;
            warn!(status = status.as_u16(), "trip planner returned an error status");
            return Err(RoutingError::Transport {
                status: i64::from(status.as_u16()),
                message: body,
            });
        }

        let bytes = response.bytes().map_err(transport_error)?;
        let document = PlanDocument::from_slice(&bytes)?;
        assemble_plan(&document, &input, options.costing.as_deref())
    }
}

fn location_key(coordinate: Coordinate) -> String {
    format!("{},{}", coordinate.lat, coordinate.lng)
}

fn transport_error(err: reqwest::Error) -> RoutingError {
    if err.is_timeout() {
        warn!("trip plan request timed out");
        return RoutingError::Timeout;
    }
    warn!(error = %err, "trip plan request failed");
    RoutingError::Transport {
        status: err
            .status()
            .map(|status| i64::from(status.as_u16()))
            .unwrap_or(TRANSPORT_STATUS),
        message: err.to_string(),
    }
}
