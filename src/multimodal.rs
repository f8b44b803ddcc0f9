//! Legacy Valhalla trip legs and multimodal sub-route partitioning.

use crate::document::{TripLeg, TripManeuver};
use crate::error::PolylineError;
use crate::maneuver::{Maneuver, TRANSIT_TRANSFER_CODE};
use crate::model::{Coordinate, Instruction, LineStyle, SubRoute};
use crate::polyline::{self, LEGACY_PRECISION};

/// YUV luma above which a route color counts as light.
pub const LIGHT_LUMA_THRESHOLD: f64 = 187.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTripLeg {
    pub coordinates: Vec<Coordinate>,
    pub instructions: Vec<Instruction>,
    /// Empty unless partitioning was requested.
    pub sub_routes: Vec<SubRoute>,
}

/// Decodes a legacy leg into coordinates and leg-local instructions,
/// partitioning it by travel mode when `with_sub_routes` is set.
pub fn decode_trip_leg(leg: &TripLeg, with_sub_routes: bool) -> Result<DecodedTripLeg, PolylineError> {
    let points = polyline::decode(&leg.shape, LEGACY_PRECISION)?;
    let sub_routes = if with_sub_routes {
        partition(&points, &leg.maneuvers)
    } else {
        Vec::new()
    };
    Ok(DecodedTripLeg {
        coordinates: points.into_iter().map(Coordinate::from).collect(),
        instructions: leg.maneuvers.iter().map(convert_maneuver).collect(),
        sub_routes,
    })
}

fn convert_maneuver(maneuver: &TripManeuver) -> Instruction {
    Instruction {
        text: maneuver.instruction.clone(),
        distance: maneuver.length.unwrap_or_default(),
        time: maneuver.time,
        road: (!maneuver.street_names.is_empty()).then(|| maneuver.street_names.join(", ")),
        travel_type: maneuver.travel_type.clone(),
        index: maneuver.begin_shape_index,
        ..Instruction::new(Maneuver::from_code(maneuver.code))
    }
}

struct Partition {
    start: usize,
    travel_type: Option<String>,
    styles: Option<Vec<LineStyle>>,
}

/// Cuts `points` wherever the travel type changes or a transfer happens.
///
/// Neighbouring partitions share their boundary point, so dropping the first
/// point of every partition but the first gives back `points`.
pub fn partition(points: &[(f64, f64)], maneuvers: &[TripManeuver]) -> Vec<SubRoute> {
    let Some(last_index) = points.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut partitions: Vec<Partition> = Vec::new();
    let mut last_travel_type: Option<Option<&str>> = None;
    for maneuver in maneuvers {
        let travel_type = maneuver.travel_type.as_deref();
        let changed = last_travel_type != Some(travel_type) || maneuver.code == TRANSIT_TRANSFER_CODE;
        last_travel_type = Some(travel_type);
        if !changed {
            continue;
        }

        let floor = partitions.last().map_or(0, |p| p.start);
        let start = maneuver.begin_shape_index.min(last_index).max(floor);
        let partition = Partition {
            start,
            travel_type: travel_type.map(str::to_string),
            styles: maneuver
                .transit_info
                .as_ref()
                .and_then(|info| info.color)
                .map(contrast_styles),
        };
        if partitions.last().is_some_and(|last| last.start == start) {
            partitions.pop();
        }
        partitions.push(partition);
    }

    if let Some(first) = partitions.first_mut() {
        first.start = 0;
    } else {
        partitions.push(Partition {
            start: 0,
            travel_type: None,
            styles: None,
        });
    }

    let ends: Vec<usize> = partitions
        .iter()
        .skip(1)
        .map(|p| p.start)
        .chain(std::iter::once(last_index))
        .collect();

    partitions
        .into_iter()
        .zip(ends)
        .map(|(partition, end)| SubRoute {
            coordinates: points[partition.start..=end]
                .iter()
                .copied()
                .map(Coordinate::from)
                .collect(),
            travel_type: partition.travel_type,
            styles: partition.styles,
        })
        .collect()
}

/// Outline chosen to contrast with `color`, then the color itself.
pub fn contrast_styles(color: u32) -> Vec<LineStyle> {
    let red = f64::from((color >> 16) & 0xff);
    let green = f64::from((color >> 8) & 0xff);
    let blue = f64::from(color & 0xff);
    let luma = 0.299 * red + 0.587 * green + 0.114 * blue;
    let outline = if luma > LIGHT_LUMA_THRESHOLD { "#000" } else { "#fff" };

    vec![
        LineStyle::new(outline, 0.8, 8.0),
        LineStyle::new(format!("#{:06x}", color & 0xff_ffff), 1.0, 6.0),
    ]
}
