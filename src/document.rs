//! Wire types for trip-plan responses.
//!
//! [`PlanDocument`] is the OpenTripPlanner `plan` response. [`TripDocument`]
//! is the legacy Valhalla `trip` response used for multimodal routing.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RoutingError;

/// Status used when an error document carries no usable status.
const UNKNOWN_STATUS: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
pub struct PlanDocument {
    pub plan: Option<Plan>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl PlanDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RoutingError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The failure signalled by the document itself, if any.
    pub fn failure(&self) -> Option<RoutingError> {
        document_failure(
            self.error.as_ref(),
            self.status.as_ref(),
            self.status_message.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub from: Place,
    pub to: Place,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

/// A named location in a plan. Fields other than the typed ones are kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stop_sequence: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Place {
    /// All fields except `lat` and `lon`.
    pub fn metadata(&self) -> Map<String, Value> {
        let mut metadata = self.extra.clone();
        if let Some(name) = &self.name {
            metadata.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(stop_sequence) = self.stop_sequence {
            metadata.insert("stopSequence".to_string(), Value::from(stop_sequence));
        }
        metadata
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    pub leg_geometry: LegGeometry,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub agency_id: Option<String>,
    #[serde(default)]
    pub agency_name: Option<String>,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub headsign: Option<String>,
    #[serde(default)]
    pub route_color: Option<String>,
    #[serde(default)]
    pub from: Option<Place>,
    #[serde(default)]
    pub to: Option<Place>,
}

impl Leg {
    pub fn is_transit(&self) -> bool {
        self.agency_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegGeometry {
    pub points: String,
    #[serde(default)]
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub relative_direction: Option<String>,
    #[serde(default)]
    pub absolute_direction: Option<String>,
    #[serde(default)]
    pub street_name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl Step {
    pub fn anchor(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripDocument {
    pub trip: Option<Trip>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl TripDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RoutingError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn failure(&self) -> Option<RoutingError> {
        if let Some(failure) = document_failure(
            self.error.as_ref(),
            self.status.as_ref(),
            self.status_message.as_deref(),
        ) {
            return Some(failure);
        }
        let trip = self.trip.as_ref()?;
        match trip.status {
            Some(status) if status != 0 => Some(RoutingError::Service {
                status,
                message: trip.status_message.clone().unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub summary: TripSummary,
    #[serde(default)]
    pub locations: Vec<Map<String, Value>>,
    #[serde(default)]
    pub legs: Vec<TripLeg>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TripSummary {
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub time: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripLeg {
    pub shape: String,
    #[serde(default)]
    pub maneuvers: Vec<TripManeuver>,
    #[serde(default)]
    pub summary: Option<TripSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripManeuver {
    #[serde(rename = "type", default)]
    pub code: u32,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub street_names: Vec<String>,
    #[serde(default)]
    pub begin_shape_index: usize,
    #[serde(default)]
    pub travel_type: Option<String>,
    #[serde(default)]
    pub transit_info: Option<TransitInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitInfo {
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub headsign: Option<String>,
}

fn document_failure(
    error: Option<&Value>,
    status: Option<&Value>,
    status_message: Option<&str>,
) -> Option<RoutingError> {
    let error = error.filter(|e| !matches!(e, Value::Null | Value::Bool(false)))?;

    let status = status
        .and_then(status_code)
        .or_else(|| error.get("id").and_then(status_code))
        .unwrap_or(UNKNOWN_STATUS);
    let message = status_message
        .map(str::to_string)
        .or_else(|| {
            ["msg", "message"]
                .iter()
                .find_map(|key| error.get(key).and_then(Value::as_str))
                .map(str::to_string)
        })
        .or_else(|| error.as_str().map(str::to_string))
        .unwrap_or_else(|| error.to_string());

    Some(RoutingError::Service { status, message })
}

fn status_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
