//! Downtown Portland stops and street corners for trip-plan fixtures.
//!
//! Coordinates are rounded to five decimals so they survive a precision-5
//! polyline round trip unchanged.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Walk from Pioneer Square to the 14 bus stop
// ============================================================================

pub const WALK_TO_STOP: &[Location] = &[
    Location::new("Pioneer Courthouse Square", 45.51899, -122.67906),
    Location::new("SW Yamhill & 6th", 45.51852, -122.67853),
    Location::new("SW Taylor & 6th", 45.51794, -122.67924),
    Location::new("SW Main & 5th", 45.51723, -122.67811),
];

// ============================================================================
// Line 14 from SW Main & 5th across the Hawthorne Bridge
// ============================================================================

pub const BUS_14: &[Location] = &[
    Location::new("SW Main & 5th", 45.51723, -122.67811),
    Location::new("SW Madison & 4th", 45.51627, -122.67742),
    Location::new("SW Madison & 1st", 45.51539, -122.67380),
    Location::new("Hawthorne Bridge West", 45.51373, -122.67096),
    Location::new("Hawthorne Bridge East", 45.51257, -122.66641),
    Location::new("SE Hawthorne & Grand", 45.51231, -122.66103),
];

// ============================================================================
// Walk from SE Hawthorne & Grand to the destination
// ============================================================================

pub const WALK_TO_DESTINATION: &[Location] = &[
    Location::new("SE Hawthorne & Grand", 45.51231, -122.66103),
    Location::new("SE Hawthorne & 7th", 45.51232, -122.65855),
    Location::new("SE 7th & Madison", 45.51283, -122.65855),
];

pub fn coords(locations: &[Location]) -> Vec<(f64, f64)> {
    locations.iter().map(Location::coords).collect()
}
