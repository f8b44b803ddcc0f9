//! Error types for polyline decoding and routing.

use thiserror::Error;

/// Status reported for a request that timed out before the service answered.
pub const TIMEOUT_STATUS: i64 = -1;

/// Status reported for a request that was rejected before it was sent.
pub const INVALID_REQUEST_STATUS: i64 = -2;

/// Status reported for transport failures that carry no HTTP status.
pub const TRANSPORT_STATUS: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid polyline byte {byte:#04x} at position {position}")]
    InvalidByte { position: usize, byte: u8 },

    #[error("polyline ends inside a chunk at position {position}")]
    UnterminatedChunk { position: usize },

    #[error("polyline latitude at position {position} has no longitude")]
    MissingLongitude { position: usize },

    #[error("polyline value at position {position} overflows")]
    Overflow { position: usize },

    #[error("input must be a GeoJSON LineString")]
    NotLineString,
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("need at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error("waypoint {index} is out of range: {lat},{lng}")]
    InvalidCoordinate { index: usize, lat: f64, lng: f64 },

    #[error("invalid service url: {0}")]
    InvalidUrl(String),

    #[error("Time out.")]
    Timeout,

    #[error("transport failure ({status}): {message}")]
    Transport { status: i64, message: String },

    #[error("routing service error ({status}): {message}")]
    Service { status: i64, message: String },

    #[error("invalid geometry in leg {leg}: {source}")]
    Geometry {
        leg: usize,
        #[source]
        source: PolylineError,
    },

    #[error("malformed trip plan: {0}")]
    Document(#[from] serde_json::Error),

    #[error("trip plan has no itineraries")]
    NoItinerary,
}

impl RoutingError {
    /// Numeric status of the failure, as surfaced to callers.
    pub fn status(&self) -> i64 {
        match self {
            RoutingError::TooFewWaypoints(_)
            | RoutingError::InvalidCoordinate { .. }
            | RoutingError::InvalidUrl(_) => INVALID_REQUEST_STATUS,
            RoutingError::Timeout => TIMEOUT_STATUS,
            RoutingError::Transport { status, .. } | RoutingError::Service { status, .. } => {
                *status
            }
            RoutingError::Geometry { .. }
            | RoutingError::Document(_)
            | RoutingError::NoItinerary => INVALID_REQUEST_STATUS,
        }
    }

    /// Human readable message paired with [`RoutingError::status`].
    pub fn message(&self) -> String {
        match self {
            RoutingError::Transport { message, .. } | RoutingError::Service { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}
