//! Per-leg decoding of OTP itineraries.
//!
//! A leg becomes its coordinates, a leg-local instruction list and a
//! sub-route. Instruction indices are relative to the leg; the assembler
//! offsets them into the route.

use tracing::trace;

use crate::document::{Leg, Place};
use crate::error::PolylineError;
use crate::maneuver::Maneuver;
use crate::model::{Coordinate, Instruction, LineStyle, SubRoute};
use crate::polyline::{self, DEFAULT_PRECISION};

/// Squared distance in degrees under which a step anchor matches a point.
pub const ANCHOR_TOLERANCE_SQ: f64 = 1e-10;

/// Fill color of a transit leg whose route has no declared color.
pub const FALLBACK_TRANSIT_COLOR: &str = "#ff0000";

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLeg {
    pub coordinates: Vec<Coordinate>,
    pub instructions: Vec<Instruction>,
    pub sub_route: SubRoute,
    pub is_transit: bool,
}

pub fn decode_leg(leg: &Leg) -> Result<DecodedLeg, PolylineError> {
    let points = polyline::decode(&leg.leg_geometry.points, DEFAULT_PRECISION)?;
    let travel_type = leg.mode.as_ref().map(|mode| mode.to_ascii_lowercase());
    let is_transit = leg.is_transit();

    let mut instructions = Vec::with_capacity(leg.steps.len() + 3);
    if is_transit {
        instructions.extend(transit_instructions(leg, travel_type.as_deref()));
    }

    let anchors: Vec<_> = leg.steps.iter().map(|step| step.anchor()).collect();
    let indices = align_anchors(&points, &anchors);
    for (step, index) in leg.steps.iter().zip(indices) {
        let kind = step
            .relative_direction
            .as_deref()
            .map(Maneuver::from_relative_direction)
            .unwrap_or(Maneuver::Unknown);
        instructions.push(Instruction {
            distance: step.distance,
            road: step.street_name.clone(),
            direction: step.absolute_direction.clone(),
            travel_type: travel_type.clone(),
            index,
            ..Instruction::new(kind)
        });
    }

    let coordinates: Vec<Coordinate> = points.into_iter().map(Coordinate::from).collect();
    let sub_route = SubRoute {
        coordinates: coordinates.clone(),
        travel_type,
        styles: is_transit.then(|| transit_styles(leg.route_color.as_deref())),
    };

    Ok(DecodedLeg {
        coordinates,
        instructions,
        sub_route,
        is_transit,
    })
}

/// Finds the shape index of each anchor.
///
/// Scanning starts at the previous match and only moves forward. The nearest
/// point within tolerance wins, the later one on a tie. An anchor with no
/// point within tolerance keeps the previous match.
pub fn align_anchors(points: &[(f64, f64)], anchors: &[Option<(f64, f64)>]) -> Vec<usize> {
    let mut last = 0;
    anchors
        .iter()
        .map(|anchor| {
            let found = anchor.and_then(|(lat, lon)| {
                points
                    .get(last..)?
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(offset, &(plat, plon))| (offset, (plat - lat).powi(2) + (plon - lon).powi(2)))
                    .filter(|&(_, distance)| distance < ANCHOR_TOLERANCE_SQ)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(offset, _)| offset)
            });
            match found {
                Some(offset) => last += offset,
                None => trace!(index = last, "step anchor not on leg shape, keeping last index"),
            }
            last
        })
        .collect()
}

fn transit_instructions(leg: &Leg, travel_type: Option<&str>) -> [Instruction; 3] {
    let from = place_name(leg.from.as_ref());
    let to = place_name(leg.to.as_ref());
    let agency = leg.agency_name.as_deref().unwrap_or_default();
    let route = leg.route_short_name.as_deref().unwrap_or_default();

    let board = match leg.headsign.as_deref() {
        Some(headsign) => format!("Board {agency} Route {route} ({headsign}) at {from}"),
        None => format!("Board {agency} Route {route} at {from}"),
    };
    let stops = leg
        .to
        .as_ref()
        .and_then(|p| p.stop_sequence)
        .zip(leg.from.as_ref().and_then(|p| p.stop_sequence))
        .map(|(to_seq, from_seq)| to_seq - from_seq);
    let ride = match stops {
        Some(stops) => format!(
            "Ride from {from} to {to} ({stops} stops, {} seconds)",
            leg.duration
        ),
        None => format!("Ride from {from} to {to} ({} seconds)", leg.duration),
    };
    let exit = format!("Exit the vehicle at {to}");

    let transit = |text: String| Instruction {
        text: Some(text),
        travel_type: travel_type.map(str::to_string),
        ..Instruction::new(Maneuver::Transit)
    };
    [
        transit(board),
        Instruction {
            distance: leg.distance,
            time: Some(leg.duration),
            ..transit(ride)
        },
        transit(exit),
    ]
}

fn place_name(place: Option<&Place>) -> &str {
    place.and_then(|p| p.name.as_deref()).unwrap_or_default()
}

/// Casing plus route color, e.g. `3366cc` becomes `#3366CC`.
pub fn transit_styles(route_color: Option<&str>) -> Vec<LineStyle> {
    let color = route_color
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("#{}", c.trim_start_matches('#').to_ascii_uppercase()))
        .unwrap_or_else(|| FALLBACK_TRANSIT_COLOR.to_string());
    vec![LineStyle::casing(), LineStyle::new(color, 1.0, 6.0)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leg_from(value: serde_json::Value) -> Leg {
        serde_json::from_value(value).unwrap()
    }

    fn shape() -> Vec<(f64, f64)> {
        vec![
            (45.51, -122.68),
            (45.512, -122.68),
            (45.512, -122.678),
            (45.514, -122.678),
        ]
    }

    #[test]
    fn test_align_moves_forward() {
        let points = shape();
        let anchors = vec![Some((45.51, -122.68)), Some((45.512, -122.678)), Some((45.514, -122.678))];
        assert_eq!(align_anchors(&points, &anchors), vec![0, 2, 3]);
    }

    #[test]
    fn test_align_picks_nearest_within_tolerance() {
        // Both points are in range; the second is closer.
        let points = vec![(45.0, -122.0), (45.000_01, -122.0)];
        assert_eq!(align_anchors(&points, &[Some((45.000_007, -122.0))]), vec![1]);
        assert_eq!(align_anchors(&points, &[Some((45.000_003, -122.0))]), vec![0]);
    }

    #[test]
    fn test_align_repeated_vertex_takes_later_index() {
        let points = vec![(45.51, -122.68), (45.512, -122.68), (45.512, -122.68), (45.514, -122.678)];
        let anchors = vec![Some((45.512, -122.68)), Some((45.512, -122.68)), Some((45.514, -122.678))];
        assert_eq!(align_anchors(&points, &anchors), vec![2, 2, 3]);
    }

    #[test]
    fn test_align_keeps_last_match_when_missing() {
        let points = shape();
        let anchors = vec![Some((45.512, -122.68)), Some((10.0, 10.0)), None];
        assert_eq!(align_anchors(&points, &anchors), vec![1, 1, 1]);
    }

    #[test]
    fn test_align_never_moves_backward() {
        let points = shape();
        let anchors = vec![Some((45.514, -122.678)), Some((45.51, -122.68))];
        assert_eq!(align_anchors(&points, &anchors), vec![3, 3]);
    }

    #[test]
    fn test_align_tolerance() {
        let points = vec![(0.0, 0.0)];
        assert_eq!(align_anchors(&points, &[Some((0.000_005, 0.0))]), vec![0]);
        let points = vec![(0.0, 0.0), (1.0, 1.0)];
        assert_eq!(align_anchors(&points, &[Some((1.000_02, 1.0))]), vec![0]);
    }

    #[test]
    fn test_walk_leg() {
        let points = shape();
        let leg = leg_from(json!({
            "mode": "WALK",
            "distance": 420.5,
            "duration": 300,
            "legGeometry": {"points": polyline::encode(&points, 5), "length": 4},
            "steps": [
                {"distance": 200.0, "relativeDirection": "DEPART", "absoluteDirection": "NORTH",
                 "streetName": "SW 5th Ave", "lat": 45.51, "lon": -122.68},
                {"distance": 220.5, "relativeDirection": "RIGHT", "absoluteDirection": "EAST",
                 "streetName": "SW Main St", "lat": 45.512, "lon": -122.68}
            ]
        }));

        let decoded = decode_leg(&leg).unwrap();
        assert_eq!(decoded.coordinates.len(), 4);
        assert!(!decoded.is_transit);
        assert!(decoded.sub_route.styles.is_none());
        assert_eq!(decoded.instructions.len(), 2);
        assert_eq!(decoded.instructions[0].kind, Maneuver::Start);
        assert_eq!(decoded.instructions[1].kind, Maneuver::Right);
        assert_eq!(decoded.instructions[1].index, 1);
        assert_eq!(decoded.instructions[1].road.as_deref(), Some("SW Main St"));
        assert_eq!(decoded.instructions[1].travel_type.as_deref(), Some("walk"));
    }

    #[test]
    fn test_transit_leg_brackets_steps() {
        let leg = leg_from(json!({
            "mode": "BUS",
            "distance": 3200.0,
            "duration": 600,
            "agencyId": "TRIMET",
            "agencyName": "TriMet",
            "routeShortName": "14",
            "headsign": "Hawthorne",
            "routeColor": "1c4ca5",
            "from": {"lat": 45.51, "lon": -122.68, "name": "SW Main", "stopSequence": 3},
            "to": {"lat": 45.514, "lon": -122.678, "name": "SE 39th", "stopSequence": 15},
            "legGeometry": {"points": polyline::encode(&shape(), 5)},
            "steps": []
        }));

        let decoded = decode_leg(&leg).unwrap();
        let texts: Vec<_> = decoded
            .instructions
            .iter()
            .map(|i| i.text.clone().unwrap_or_default())
            .collect();
        assert_eq!(
            texts,
            vec![
                "Board TriMet Route 14 (Hawthorne) at SW Main",
                "Ride from SW Main to SE 39th (12 stops, 600 seconds)",
                "Exit the vehicle at SE 39th",
            ]
        );
        assert!(decoded.instructions.iter().all(|i| i.kind == Maneuver::Transit && i.index == 0));
        assert_eq!(decoded.instructions[1].time, Some(600.0));
        assert_eq!(decoded.instructions[0].icon_name(), "kTransitBus");

        let styles = decoded.sub_route.styles.unwrap();
        assert_eq!(styles[0], LineStyle::casing());
        assert_eq!(styles[1].color, "#1C4CA5");
    }

    #[test]
    fn test_transit_styles_fallback() {
        assert_eq!(transit_styles(None)[1].color, FALLBACK_TRANSIT_COLOR);
        assert_eq!(transit_styles(Some(""))[1].color, FALLBACK_TRANSIT_COLOR);
    }

    #[test]
    fn test_bad_geometry_is_an_error() {
        let leg = leg_from(json!({"legGeometry": {"points": "_p~iF~ps|U_"}}));
        assert!(decode_leg(&leg).is_err());
    }
}
