//! Codec for the polyline6 route-geometry encoding.
//!
//! Each coordinate component is stored as a signed delta from the previous
//! point, zig-zag encoded and split into 5-bit groups. Every group is offset
//! by 63 into printable ASCII, with the 6th bit marking continuation.

use crate::geodesy::LatLng;
use thiserror::Error;

/// Scale factor between encoded integers and degrees.
const PRECISION: f64 = 1e-6;

/// An error produced while decoding a polyline6 string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// The input ended while a multi-character group was still open,
    /// i.e. the last consumed character had its continuation bit set.
    #[error("invalid polyline: buffer exhausted at byte {0}")]
    BufferExhausted(usize),
    /// A group ran long enough to encode a value wider than 64 bits.
    #[error("invalid polyline: value overflow at byte {0}")]
    ValueOverflow(usize),
}

/// Decodes a polyline6 string into an ordered list of coordinates.
///
/// Returns an empty list for an empty input. Never produces a partial
/// coordinate: a string that ends mid-group, or whose group overflows a
/// 64-bit value, is rejected outright.
pub fn decode(polyline: &str) -> Result<Vec<LatLng>, PolylineError> {
    let bytes = polyline.as_bytes();
    let mut coordinates = Vec::new();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while index < bytes.len() {
        let (lat_change, next) = decode_value(bytes, index)?;
        let (lng_change, next) = decode_value(bytes, next)?;
        index = next;
        lat += lat_change;
        lng += lng_change;
        coordinates.push(LatLng::new(lat as f64 * PRECISION, lng as f64 * PRECISION));
    }

    Ok(coordinates)
}

/// Decodes a single signed value starting at `index`, returning the value
/// and the index of the next unread byte.
fn decode_value(bytes: &[u8], mut index: usize) -> Result<(i64, usize), PolylineError> {
    let mut result = 0i64;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(index)
            .ok_or(PolylineError::BufferExhausted(index))? as i64
            - 63;
        if shift >= 64 {
            return Err(PolylineError::ValueOverflow(index));
        }
        index += 1;
        result |= (byte & 0x1f) << shift;
        shift += 5;
        if byte < 0x20 {
            break;
        }
    }

    let delta = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((delta, index))
}

/// Encodes an ordered list of coordinates into a polyline6 string.
pub fn encode(coordinates: &[LatLng]) -> String {
    let mut output = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in coordinates {
        let lat = (point.lat / PRECISION).round() as i64;
        let lng = (point.lng / PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut output);
        encode_value(lng - prev_lng, &mut output);
        prev_lat = lat;
        prev_lng = lng;
    }

    output
}

/// Encodes a single signed value onto the output string.
fn encode_value(value: i64, output: &mut String) {
    let mut value = if value < 0 { !(value << 1) } else { value << 1 };
    while value >= 0x20 {
        output.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    output.push((value as u8 + 63) as char);
}
