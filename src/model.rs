//! Normalized route model handed to renderers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::maneuver::Maneuver;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coordinate: Coordinate) -> Self {
        (coordinate.lat, coordinate.lng)
    }
}

/// Whether the route may turn around at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointType {
    Break,
    Through,
}

/// Location options passed along with a waypoint.
///
/// Known keys are typed; anything else, including known keys whose value
/// has an unexpected type, is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<WaypointType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub way_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_reachability: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl WaypointOptions {
    /// Sorts a free-form metadata bag into known keys and passthrough fields.
    pub fn from_metadata(metadata: Map<String, Value>) -> Self {
        let mut options = Self::default();
        for (key, value) in metadata {
            let leftover = match key.as_str() {
                "type" => take(&mut options.kind, value),
                "name" => take(&mut options.name, value),
                "heading" => take(&mut options.heading, value),
                "heading_tolerance" => take(&mut options.heading_tolerance, value),
                "street" => take(&mut options.street, value),
                "way_id" => take(&mut options.way_id, value),
                "minimum_reachability" => take(&mut options.minimum_reachability, value),
                "radius" => take(&mut options.radius, value),
                _ => Some(value),
            };
            if let Some(value) = leftover {
                options.extra.insert(key, value);
            }
        }
        options
    }
}

/// Stores `value` in `slot` when it has the slot's type, else hands it back.
fn take<T: serde::de::DeserializeOwned>(slot: &mut Option<T>, value: Value) -> Option<Value> {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => {
            *slot = Some(parsed);
            None
        }
        Err(_) => Some(value),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latlng: Coordinate,
    pub name: Option<String>,
    pub options: WaypointOptions,
}

impl Waypoint {
    pub fn new(latlng: impl Into<Coordinate>) -> Self {
        Self {
            latlng: latlng.into(),
            name: None,
            options: WaypointOptions::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: WaypointOptions) -> Self {
        self.options = options;
        self
    }
}

/// One user-facing maneuver, indexed into the route coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(rename = "type")]
    pub kind: Maneuver,
    pub text: Option<String>,
    pub distance: f64,
    pub time: Option<f64>,
    pub road: Option<String>,
    pub direction: Option<String>,
    pub travel_type: Option<String>,
    /// Position in the route coordinates (leg-local until assembled).
    pub index: usize,
}

impl Instruction {
    pub fn new(kind: Maneuver) -> Self {
        Self {
            kind,
            text: None,
            distance: 0.0,
            time: None,
            road: None,
            direction: None,
            travel_type: None,
            index: 0,
        }
    }

    /// Icon name a renderer can show for this instruction.
    pub fn icon_name(&self) -> String {
        self.kind.icon_name(self.travel_type.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_distance: f64,
    pub total_time: f64,
}

/// Stroke style of one drawn line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub opacity: f64,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

impl LineStyle {
    pub fn new(color: impl Into<String>, opacity: f64, weight: f64) -> Self {
        Self {
            color: color.into(),
            opacity,
            weight,
            dash_array: None,
        }
    }

    pub fn dashed(mut self, dash_array: impl Into<String>) -> Self {
        self.dash_array = Some(dash_array.into());
        self
    }

    /// White casing drawn under transit lines.
    pub fn casing() -> Self {
        Self::new("white", 0.8, 8.0)
    }
}

/// A contiguous slice of the route drawn with its own styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRoute {
    pub coordinates: Vec<Coordinate>,
    pub travel_type: Option<String>,
    /// `None` means the renderer's default styles.
    pub styles: Option<Vec<LineStyle>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub summary: Summary,
    pub coordinates: Vec<Coordinate>,
    pub instructions: Vec<Instruction>,
    pub unit: String,
    pub costing: Option<String>,
    pub sub_routes: Option<Vec<SubRoute>>,
    pub input_waypoints: Vec<Waypoint>,
    pub output_waypoints: Vec<Waypoint>,
    pub waypoint_indices: Option<Vec<usize>>,
}
