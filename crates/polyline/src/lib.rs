//! Google's encoded polyline format.
//!
//! Every coordinate is stored as the difference to its predecessor, scaled to
//! a fixed-point integer (5 decimal places by default). Each signed value is
//! zig-zag encoded and emitted in 5 bit groups, least significant group first.
//! A group is written as the printable character `group + 63`, with `0x20`
//! set on every group but the last of a value.

use std::{error, fmt};

use model::{Coordinate, CoordinateError, Polyline};

/// Decimal places used by the directions service.
pub const PRECISION: u32 = 5;

/// Largest supported precision. Scaled coordinates stay far inside `i64`.
pub const MAX_PRECISION: u32 = 10;

const CHARACTER_OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;
const GROUP_MASK: u64 = 0x1f;
const GROUP_BITS: u32 = 5;

/// Ways in which an encoded polyline can be malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum PolylineError {
    /// The input ended inside a value, i.e. the last character still had the
    /// continuation bit set.
    Truncated { position: usize },
    /// The input ended after a latitude without the matching longitude.
    MissingLongitude { position: usize },
    /// A byte outside of `'?'..='~'`.
    InvalidCharacter { position: usize, byte: u8 },
    /// A value with more groups than fit into 64 bits.
    Overflow { position: usize },
    /// The running totals left the valid coordinate ranges.
    InvalidCoordinate {
        index: usize,
        source: CoordinateError,
    },
    /// More decimal places than `MAX_PRECISION`.
    UnsupportedPrecision { precision: u32 },
}

impl error::Error for PolylineError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            PolylineError::InvalidCoordinate { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed polyline: ")?;
        match self {
            PolylineError::Truncated { position } => {
                write!(f, "input ends inside a value at byte {}", position)
            }
            PolylineError::MissingLongitude { position } => {
                write!(f, "latitude without longitude at byte {}", position)
            }
            PolylineError::InvalidCharacter { position, byte } => {
                write!(f, "invalid byte 0x{:02x} at {}", byte, position)
            }
            PolylineError::Overflow { position } => {
                write!(f, "value starting before byte {} overflows", position)
            }
            PolylineError::InvalidCoordinate { index, source } => {
                write!(f, "point {}: {}", index, source)
            }
            PolylineError::UnsupportedPrecision { precision } => write!(
                f,
                "precision {} exceeds the maximum of {}",
                precision, MAX_PRECISION
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, PolylineError>;

/// Decodes a polyline with the default precision of 5 decimal places.
///
/// The empty string decodes to an empty polyline. Input that stops in the
/// middle of a value or of a coordinate pair is an error; nothing of a
/// malformed input is returned.
pub fn decode(encoded: &str) -> Result<Polyline> {
    decode_with_precision(encoded, PRECISION)
}

/// Decodes a polyline whose values are scaled by `10^precision`.
pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<Polyline> {
    let factor = scale_factor(precision)?;
    let bytes = encoded.as_bytes();

    let mut points = Vec::new();
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut position = 0;

    while position < bytes.len() {
        let (latitude_delta, next) = decode_value(bytes, position)?;
        if next == bytes.len() {
            return Err(PolylineError::MissingLongitude { position: next });
        }
        let (longitude_delta, next) = decode_value(bytes, next)?;
        position = next;

        latitude = latitude
            .checked_add(latitude_delta)
            .ok_or(PolylineError::Overflow { position })?;
        longitude = longitude
            .checked_add(longitude_delta)
            .ok_or(PolylineError::Overflow { position })?;

        let coordinate =
            Coordinate::new(latitude as f64 / factor, longitude as f64 / factor)
                .map_err(|source| PolylineError::InvalidCoordinate {
                    index: points.len(),
                    source,
                })?;
        points.push(coordinate);
    }

    Ok(Polyline::new(points))
}

/// Reads one zig-zag encoded value starting at `start`. Returns the value and
/// the position after its last group.
fn decode_value(bytes: &[u8], start: usize) -> Result<(i64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;
    let mut position = start;

    loop {
        let byte = *bytes
            .get(position)
            .ok_or(PolylineError::Truncated { position })?;
        if !(CHARACTER_OFFSET..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter { position, byte });
        }

        let group = u64::from(byte - CHARACTER_OFFSET);
        let bits = group & GROUP_MASK;
        if shift >= u64::BITS || (bits << shift) >> shift != bits {
            return Err(PolylineError::Overflow { position });
        }
        result |= bits << shift;
        shift += GROUP_BITS;
        position += 1;

        if group & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let value = ((result >> 1) as i64) ^ -((result & 1) as i64);
    Ok((value, position))
}

/// Encodes coordinates with the default precision of 5 decimal places.
pub fn encode<'a, I>(points: I) -> String
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    encode_scaled(points, 10f64.powi(PRECISION as i32))
}

/// Encodes coordinates rounded to `precision` decimal places.
pub fn encode_with_precision<'a, I>(points: I, precision: u32) -> Result<String>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    Ok(encode_scaled(points, scale_factor(precision)?))
}

fn encode_scaled<'a, I>(points: I, factor: f64) -> String
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut encoded = String::new();
    let mut previous_latitude: i64 = 0;
    let mut previous_longitude: i64 = 0;

    for point in points {
        let latitude = (point.latitude() * factor).round() as i64;
        let longitude = (point.longitude() * factor).round() as i64;
        encode_value(latitude - previous_latitude, &mut encoded);
        encode_value(longitude - previous_longitude, &mut encoded);
        previous_latitude = latitude;
        previous_longitude = longitude;
    }

    encoded
}

fn encode_value(value: i64, encoded: &mut String) {
    let mut rest = ((value << 1) ^ (value >> 63)) as u64;
    while rest >= CONTINUATION_BIT {
        encoded.push(to_char((rest & GROUP_MASK) | CONTINUATION_BIT));
        rest >>= GROUP_BITS;
    }
    encoded.push(to_char(rest));
}

fn to_char(group: u64) -> char {
    // group < 64, so the character stays within '?'..='~'
    char::from(group as u8 + CHARACTER_OFFSET)
}

fn scale_factor(precision: u32) -> Result<f64> {
    if precision > MAX_PRECISION {
        return Err(PolylineError::UnsupportedPrecision { precision });
    }
    Ok(10f64.powi(precision as i32))
}
