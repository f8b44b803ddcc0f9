//! Encoded polyline codec.
//!
//! Implements the published polyline algorithm: each coordinate is stored as
//! a zig-zag encoded delta from the previous one, scaled by `10^precision` and
//! split into 5-bit chunks offset by 63. Trip plans use precision 5 for leg
//! geometries; the legacy multimodal `shape` field uses precision 6.

use geojson::{GeoJson, Geometry, Value};

use crate::error::PolylineError;

/// Decimal digits used by leg geometries unless stated otherwise.
pub const DEFAULT_PRECISION: u32 = 5;

/// Decimal digits used by legacy multimodal trip shapes.
pub const LEGACY_PRECISION: u32 = 6;

const CHUNK_OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;

fn factor(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

/// Decodes to a list of `(latitude, longitude)` points.
///
/// Fails only on malformed input: a byte outside the encoding alphabet, a
/// final chunk that still has its continuation bit set, a latitude with no
/// longitude after it, or deltas that run past the 64-bit accumulator.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let factor = factor(precision);
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        let lat_start = index;
        let lat_change = read_value(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::MissingLongitude {
                position: lat_start,
            });
        }
        let lng_start = index;
        let lng_change = read_value(bytes, &mut index)?;

        lat = lat
            .checked_add(lat_change)
            .ok_or(PolylineError::Overflow { position: lat_start })?;
        lng = lng
            .checked_add(lng_change)
            .ok_or(PolylineError::Overflow { position: lng_start })?;
        points.push((lat as f64 / factor, lng as f64 / factor));
    }

    Ok(points)
}

fn read_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::UnterminatedChunk { position: start });
        };
        if !(CHUNK_OFFSET..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                position: *index,
                byte,
            });
        }
        if shift >= 64 {
            return Err(PolylineError::Overflow { position: start });
        }
        *index += 1;

        let chunk = u64::from(byte - CHUNK_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        if chunk < CONTINUATION {
            break;
        }
    }

    if result & 1 == 1 {
        Ok(!(result >> 1) as i64)
    } else {
        Ok((result >> 1) as i64)
    }
}

/// Encodes `(latitude, longitude)` points at the given precision.
pub fn encode(points: &[(f64, f64)], precision: u32) -> String {
    let factor = factor(precision);
    let mut output = String::new();
    let mut previous = (0.0, 0.0);

    for &(lat, lng) in points {
        write_value(&mut output, lat, previous.0, factor);
        write_value(&mut output, lng, previous.1, factor);
        previous = (lat, lng);
    }

    output
}

/// Rounds half away from zero.
fn round_half_away(value: f64) -> i64 {
    let magnitude = (value.abs() + 0.5).floor() as i64;
    if value < 0.0 { -magnitude } else { magnitude }
}

fn write_value(output: &mut String, current: f64, previous: f64, factor: f64) {
    // Non-finite input saturates instead of wrapping.
    let delta = round_half_away(current * factor).saturating_sub(round_half_away(previous * factor));
    let mut value = (delta << 1) as u64;
    if delta < 0 {
        value = !value;
    }

    while value >= CONTINUATION {
        output.push(char::from(
            ((CONTINUATION | (value & CHUNK_MASK)) as u8) + CHUNK_OFFSET,
        ));
        value >>= 5;
    }
    output.push(char::from(value as u8 + CHUNK_OFFSET));
}


/// Decodes to a GeoJSON LineString geometry with `[longitude, latitude]`
/// positions.
pub fn to_geojson(encoded: &str, precision: u32) -> Result<Geometry, PolylineError> {
    let positions = decode(encoded, precision)?
        .into_iter()
        .map(|(lat, lng)| vec![lng, lat])
        .collect();
    Ok(Geometry::new(Value::LineString(positions)))
}

/// Encodes a GeoJSON LineString geometry, or a Feature wrapping one.
pub fn from_geojson(geojson: &GeoJson, precision: u32) -> Result<String, PolylineError> {
    let geometry = match geojson {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature.geometry.as_ref().ok_or(PolylineError::NotLineString)?,
        GeoJson::FeatureCollection(_) => return Err(PolylineError::NotLineString),
    };
    let Value::LineString(positions) = &geometry.value else {
        return Err(PolylineError::NotLineString);
    };

    let points = positions
        .iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Ok((*lat, *lng)),
            _ => Err(PolylineError::NotLineString),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(encode(&points, precision))
}
