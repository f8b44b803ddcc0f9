//! Test fixtures for otp-route-adapter.
//!
//! Provides:
//! - Downtown Portland coordinates for leg shapes
//! - Builders for OTP plan documents and legacy Valhalla trip documents

#![allow(dead_code)]

pub mod portland_locations;

pub use portland_locations::*;

use serde_json::{json, Value};

use otp_route_adapter::polyline;
use otp_route_adapter::Waypoint;

/// A walking step anchored on `at`.
pub fn step(direction: &str, street: &str, distance: f64, at: (f64, f64)) -> Value {
    json!({
        "distance": distance,
        "relativeDirection": direction,
        "absoluteDirection": "NORTH",
        "streetName": street,
        "lat": at.0,
        "lon": at.1
    })
}

pub fn walk_leg(points: &[(f64, f64)], distance: f64, steps: Vec<Value>) -> Value {
    json!({
        "mode": "WALK",
        "distance": distance,
        "duration": distance / 1.4,
        "legGeometry": {"points": polyline::encode(points, 5), "length": points.len()},
        "steps": steps
    })
}

pub fn bus_leg(points: &[(f64, f64)], route_color: Option<&str>) -> Value {
    let mut leg = json!({
        "mode": "BUS",
        "distance": 2150.0,
        "duration": 540,
        "agencyId": "TRIMET",
        "agencyName": "TriMet",
        "routeShortName": "14",
        "headsign": "Foster Rd",
        "from": {"lat": points[0].0, "lon": points[0].1, "name": "SW Main & 5th", "stopSequence": 4},
        "to": {"lat": points[points.len() - 1].0, "lon": points[points.len() - 1].1,
               "name": "SE Hawthorne & Grand", "stopSequence": 9},
        "legGeometry": {"points": polyline::encode(points, 5), "length": points.len()},
        "steps": []
    });
    if let Some(color) = route_color {
        leg["routeColor"] = json!(color);
    }
    leg
}

pub fn plan_document(legs: Vec<Value>, duration: f64) -> Value {
    let first = legs
        .first()
        .and_then(|leg| leg["legGeometry"]["points"].as_str())
        .map(|points| polyline::decode(points, 5).unwrap()[0])
        .unwrap_or((0.0, 0.0));
    json!({
        "plan": {
            "from": {"lat": first.0, "lon": first.1, "name": "Origin", "vertexType": "NORMAL"},
            "to": {"lat": 45.51283, "lon": -122.65855, "name": "Destination", "vertexType": "NORMAL"},
            "itineraries": [{"duration": duration, "legs": legs}]
        }
    })
}

pub fn waypoints(points: &[(f64, f64)]) -> Vec<Waypoint> {
    points.iter().copied().map(Waypoint::new).collect()
}

/// Legacy trip leg: walk, a tram ride with the given color, walk.
pub fn multimodal_trip(points: &[(f64, f64)], tram_start: usize, tram_end: usize, color: u32) -> Value {
    json!({
        "trip": {
            "status": 0,
            "status_message": "Found route between points",
            "units": "kilometers",
            "summary": {"length": 3.4, "time": 1260},
            "locations": [
                {"lat": points[0].0, "lon": points[0].1, "type": "break"},
                {"lat": points[points.len() - 1].0, "lon": points[points.len() - 1].1, "type": "break", "street": "SE 7th"}
            ],
            "legs": [{
                "shape": polyline::encode(points, 6),
                "summary": {"length": 3.4, "time": 1260},
                "maneuvers": [
                    {"type": 1, "instruction": "Walk north.", "begin_shape_index": 0, "travel_type": "foot", "length": 0.3},
                    {"type": 30, "instruction": "Take the tram.", "begin_shape_index": tram_start,
                     "travel_type": "tram", "transit_info": {"color": color, "short_name": "NS"}, "length": 2.8},
                    {"type": 35, "instruction": "Walk to destination.", "begin_shape_index": tram_end,
                     "travel_type": "foot", "length": 0.3},
                    {"type": 4, "instruction": "You have arrived.", "begin_shape_index": points.len() - 1,
                     "travel_type": "foot"}
                ]
            }]
        }
    })
}
