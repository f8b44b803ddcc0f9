//! Maneuver kinds.
//!
//! Valhalla reports maneuvers as integer codes and OTP as relative direction
//! names; both map onto [`Maneuver`]. The mappings are total: anything not in
//! the tables becomes [`Maneuver::Unknown`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Maneuver {
    None,
    Start,
    StartRight,
    StartLeft,
    Destination,
    DestinationRight,
    DestinationLeft,
    Becomes,
    Continue,
    SlightRight,
    Right,
    SharpRight,
    UturnRight,
    UturnLeft,
    SharpLeft,
    Left,
    SlightLeft,
    RampStraight,
    RampRight,
    RampLeft,
    ExitRight,
    ExitLeft,
    StayStraight,
    StayRight,
    StayLeft,
    Merge,
    RoundaboutEnter,
    RoundaboutExit,
    FerryEnter,
    FerryExit,
    Transit,
    TransitTransfer,
    TransitRemainOn,
    TransitConnectionStart,
    TransitConnectionTransfer,
    TransitConnectionDestination,
    PostTransitConnectionDestination,
    Unknown,
}

/// Code for a transfer between transit vehicles.
pub const TRANSIT_TRANSFER_CODE: u32 = 31;

const BY_CODE: [Maneuver; 37] = [
    Maneuver::None,
    Maneuver::Start,
    Maneuver::StartRight,
    Maneuver::StartLeft,
    Maneuver::Destination,
    Maneuver::DestinationRight,
    Maneuver::DestinationLeft,
    Maneuver::Becomes,
    Maneuver::Continue,
    Maneuver::SlightRight,
    Maneuver::Right,
    Maneuver::SharpRight,
    Maneuver::UturnRight,
    Maneuver::UturnLeft,
    Maneuver::SharpLeft,
    Maneuver::Left,
    Maneuver::SlightLeft,
    Maneuver::RampStraight,
    Maneuver::RampRight,
    Maneuver::RampLeft,
    Maneuver::ExitRight,
    Maneuver::ExitLeft,
    Maneuver::StayStraight,
    Maneuver::StayRight,
    Maneuver::StayLeft,
    Maneuver::Merge,
    Maneuver::RoundaboutEnter,
    Maneuver::RoundaboutExit,
    Maneuver::FerryEnter,
    Maneuver::FerryExit,
    Maneuver::Transit,
    Maneuver::TransitTransfer,
    Maneuver::TransitRemainOn,
    Maneuver::TransitConnectionStart,
    Maneuver::TransitConnectionTransfer,
    Maneuver::TransitConnectionDestination,
    Maneuver::PostTransitConnectionDestination,
];

impl Maneuver {
    /// Maps a Valhalla maneuver code.
    pub fn from_code(code: u32) -> Self {
        BY_CODE
            .get(code as usize)
            .copied()
            .unwrap_or(Maneuver::Unknown)
    }

    /// Valhalla code of this maneuver, `None` for [`Maneuver::Unknown`].
    pub fn code(self) -> Option<u32> {
        BY_CODE
            .iter()
            .position(|&m| m == self)
            .map(|position| position as u32)
    }

    /// Maps an OTP `relativeDirection`, case-insensitively.
    pub fn from_relative_direction(direction: &str) -> Self {
        match direction.to_ascii_lowercase().as_str() {
            "depart" => Maneuver::Start,
            "left" => Maneuver::Left,
            "right" => Maneuver::Right,
            "hard_left" => Maneuver::SharpLeft,
            "hard_right" => Maneuver::SharpRight,
            "slightly_left" => Maneuver::SlightLeft,
            "slightly_right" => Maneuver::SlightRight,
            "continue" => Maneuver::Continue,
            "uturn_left" => Maneuver::UturnLeft,
            "uturn_right" => Maneuver::UturnRight,
            "circle_clockwise" | "circle_counterclockwise" => Maneuver::RoundaboutEnter,
            _ => Maneuver::Unknown,
        }
    }

    pub fn is_transit(self) -> bool {
        matches!(
            self,
            Maneuver::Transit
                | Maneuver::TransitTransfer
                | Maneuver::TransitRemainOn
                | Maneuver::TransitConnectionStart
                | Maneuver::TransitConnectionTransfer
                | Maneuver::TransitConnectionDestination
                | Maneuver::PostTransitConnectionDestination
        )
    }

    /// Icon name for this maneuver.
    ///
    /// Transit maneuvers share one icon family, specialised by travel type
    /// when one is known (`kTransitTram`, `kTransitRail`, ...).
    pub fn icon_name(self, travel_type: Option<&str>) -> String {
        if self.is_transit() {
            return match travel_type.filter(|t| !t.is_empty()) {
                Some(travel_type) => format!("kTransit{}", capitalize(travel_type)),
                None => "kTransit".to_string(),
            };
        }
        format!("k{:?}", self)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
