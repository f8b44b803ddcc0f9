//! Route assembly.
//!
//! Folds per-leg decoder output into a single [`Route`]: coordinates are
//! concatenated, instruction indices are shifted by the number of
//! coordinates contributed by earlier legs, and the document's origin and
//! destination become output waypoints.

use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::document::{Place, PlanDocument, TripDocument};
use crate::error::RoutingError;
use crate::leg::decode_leg;
use crate::model::{Coordinate, Instruction, Route, SubRoute, Summary, Waypoint, WaypointOptions};
use crate::multimodal::decode_trip_leg;

/// Costing label that turns on sub-route partitioning for legacy trips.
pub const MULTIMODAL_COSTING: &str = "multimodal";

/// Either supported response shape.
#[derive(Debug, Clone)]
pub enum RouteDocument {
    Plan(PlanDocument),
    Trip(TripDocument),
}

impl RouteDocument {
    /// Parses a response, telling the legacy shape apart by its `trip` key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RoutingError> {
        let value: Value = serde_json::from_slice(bytes)?;
        if value.get("trip").is_some() {
            Ok(RouteDocument::Trip(serde_json::from_value(value)?))
        } else {
            Ok(RouteDocument::Plan(serde_json::from_value(value)?))
        }
    }

    pub fn assemble(&self, waypoints: &[Waypoint], costing: Option<&str>) -> Result<Route, RoutingError> {
        match self {
            RouteDocument::Plan(document) => assemble_plan(document, waypoints, costing),
            RouteDocument::Trip(document) => assemble_trip(document, waypoints, costing),
        }
    }
}

/// One independent assembly: a document and the waypoints that requested it.
#[derive(Debug, Clone)]
pub struct AssemblyJob {
    pub document: RouteDocument,
    pub waypoints: Vec<Waypoint>,
    pub costing: Option<String>,
}

impl AssemblyJob {
    pub fn assemble(&self) -> Result<Route, RoutingError> {
        self.document
            .assemble(&self.waypoints, self.costing.as_deref())
    }
}

/// Assembles many documents in parallel; results keep the job order.
pub fn assemble_batch(jobs: &[AssemblyJob]) -> Vec<Result<Route, RoutingError>> {
    jobs.par_iter().map(AssemblyJob::assemble).collect()
}

/// Running concatenation of leg output.
#[derive(Default)]
struct Accumulator {
    coordinates: Vec<Coordinate>,
    instructions: Vec<Instruction>,
}

impl Accumulator {
    fn push_leg(&mut self, coordinates: Vec<Coordinate>, instructions: Vec<Instruction>) {
        let offset = self.coordinates.len();
        self.instructions
            .extend(instructions.into_iter().map(|mut instruction| {
                instruction.index += offset;
                instruction
            }));
        self.coordinates.extend(coordinates);
    }
}

/// Assembles the first itinerary of an OTP plan document.
pub fn assemble_plan(
    document: &PlanDocument,
    waypoints: &[Waypoint],
    costing: Option<&str>,
) -> Result<Route, RoutingError> {
    if let Some(failure) = document.failure() {
        warn!(status = failure.status(), message = %failure.message(), "trip plan reports an error");
        return Err(failure);
    }

    let plan = document.plan.as_ref().ok_or(RoutingError::NoItinerary)?;
    let itinerary = plan.itineraries.first().ok_or(RoutingError::NoItinerary)?;
    if plan.itineraries.len() > 1 {
        debug!(discarded = plan.itineraries.len() - 1, "ignoring alternative itineraries");
    }

    let mut acc = Accumulator::default();
    let mut sub_routes = Vec::with_capacity(itinerary.legs.len());
    let mut has_transit = false;
    for (leg_index, leg) in itinerary.legs.iter().enumerate() {
        let decoded = decode_leg(leg).map_err(|source| RoutingError::Geometry {
            leg: leg_index,
            source,
        })?;
        debug!(
            leg = leg_index,
            coordinates = decoded.coordinates.len(),
            instructions = decoded.instructions.len(),
            transit = decoded.is_transit,
            "decoded leg"
        );
        has_transit |= decoded.is_transit;
        sub_routes.push(decoded.sub_route);
        acc.push_leg(decoded.coordinates, decoded.instructions);
    }

    let summary = Summary {
        total_distance: itinerary.legs.iter().map(|leg| leg.distance).sum(),
        total_time: itinerary.duration,
    };

    Ok(finish(
        acc,
        summary,
        "m".to_string(),
        costing,
        has_transit.then_some(sub_routes),
        waypoints,
        vec![place_waypoint(&plan.from), place_waypoint(&plan.to)],
    ))
}

/// Assembles a legacy Valhalla trip document.
///
/// Sub-routes are produced only for multimodal costing.
pub fn assemble_trip(
    document: &TripDocument,
    waypoints: &[Waypoint],
    costing: Option<&str>,
) -> Result<Route, RoutingError> {
    if let Some(failure) = document.failure() {
        warn!(status = failure.status(), message = %failure.message(), "trip reports an error");
        return Err(failure);
    }
    let trip = document.trip.as_ref().ok_or(RoutingError::NoItinerary)?;

    let multimodal = costing == Some(MULTIMODAL_COSTING);
    let mut acc = Accumulator::default();
    let mut sub_routes: Vec<SubRoute> = Vec::new();
    for (leg_index, leg) in trip.legs.iter().enumerate() {
        let decoded = decode_trip_leg(leg, multimodal).map_err(|source| RoutingError::Geometry {
            leg: leg_index,
            source,
        })?;
        debug!(
            leg = leg_index,
            coordinates = decoded.coordinates.len(),
            partitions = decoded.sub_routes.len(),
            "decoded trip leg"
        );
        sub_routes.extend(decoded.sub_routes);
        acc.push_leg(decoded.coordinates, decoded.instructions);
    }

    let summary = Summary {
        total_distance: trip.summary.length,
        total_time: trip.summary.time,
    };
    let output = trip
        .locations
        .iter()
        .filter_map(location_waypoint)
        .collect();

    Ok(finish(
        acc,
        summary,
        trip.units.clone().unwrap_or_else(|| "kilometers".to_string()),
        costing,
        multimodal.then_some(sub_routes),
        waypoints,
        output,
    ))
}

fn finish(
    acc: Accumulator,
    summary: Summary,
    unit: String,
    costing: Option<&str>,
    sub_routes: Option<Vec<SubRoute>>,
    input: &[Waypoint],
    output: Vec<Waypoint>,
) -> Route {
    debug!(
        coordinates = acc.coordinates.len(),
        instructions = acc.instructions.len(),
        distance = summary.total_distance,
        "assembled route"
    );
    Route {
        summary,
        coordinates: acc.coordinates,
        instructions: acc.instructions,
        unit,
        costing: costing.map(str::to_string),
        sub_routes,
        input_waypoints: input.to_vec(),
        output_waypoints: output,
        waypoint_indices: None,
    }
}

fn place_waypoint(place: &Place) -> Waypoint {
    Waypoint {
        latlng: Coordinate::new(place.lat, place.lon),
        name: None,
        options: WaypointOptions::from_metadata(place.metadata()),
    }
}

fn location_waypoint(location: &Map<String, Value>) -> Option<Waypoint> {
    let lat = location.get("lat").and_then(Value::as_f64)?;
    let lon = location.get("lon").and_then(Value::as_f64)?;
    let metadata = location
        .iter()
        .filter(|(key, _)| *key != "lat" && *key != "lon")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Some(Waypoint {
        latlng: Coordinate::new(lat, lon),
        name: None,
        options: WaypointOptions::from_metadata(metadata),
    })
}
