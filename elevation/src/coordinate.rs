//! Geographic coordinates in decimal degrees.
//!
//! [`GeoCoordinate`] is the validated latitude/longitude value passed through
//! every lookup. Values are rounded to 8 decimal places on construction
//! (roughly millimetre precision at the equator).

use std::fmt;

use crate::error::{ElevationError, Result};

/// Mean Earth radius used for great-circle distances, in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_009.0;

/// Relative tolerance used by coordinate equality.
const EQUALITY_TOLERANCE: f64 = 1e-8;

/// Number of decimal places kept for latitude and longitude.
const DECIMAL_PLACES: i32 = 8;

/// A validated latitude/longitude pair.
///
/// Equality is tolerance based: `a == b` when each component of `b` lies
/// within `|a| * 1e-8` of the matching component of `a`. The tolerance is
/// taken from the left-hand side only, so the comparison is not symmetric
/// and a component equal to zero only matches an exact zero.
///
/// # Example
///
/// ```
/// use elevation::GeoCoordinate;
///
/// let keswick = GeoCoordinate::new(54.6, -3.13).unwrap();
/// assert_eq!(keswick.latitude(), 54.6);
/// assert!(GeoCoordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rounding both components to 8 decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::InvalidCoordinate`] if the latitude is outside
    /// `[-90, 90]` or the longitude is outside `[-180, 180]` (including NaN).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !is_valid_latitude(latitude) || !is_valid_longitude(longitude) {
            return Err(ElevationError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }

        Ok(Self {
            latitude: round_decimals(latitude),
            longitude: round_decimals(longitude),
        })
    }

    /// Parse a coordinate from separate latitude and longitude strings.
    ///
    /// Returns `None` if either string is not a number or the values are out
    /// of range. Surrounding whitespace is ignored.
    ///
    /// ```
    /// use elevation::GeoCoordinate;
    ///
    /// assert!(GeoCoordinate::try_parse("54.4", "-3.2").is_some());
    /// assert!(GeoCoordinate::try_parse("north", "-3.2").is_none());
    /// assert!(GeoCoordinate::try_parse("95", "-3.2").is_none());
    /// ```
    pub fn try_parse(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude: f64 = latitude.trim().parse().ok()?;
        let longitude: f64 = longitude.trim().parse().ok()?;

        Self::new(latitude, longitude).ok()
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres (haversine formula).
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METRES * c
    }
}

impl PartialEq for GeoCoordinate {
    fn eq(&self, other: &Self) -> bool {
        let lat_tolerance = (self.latitude * EQUALITY_TOLERANCE).abs();
        let lon_tolerance = (self.longitude * EQUALITY_TOLERANCE).abs();

        (self.latitude - other.latitude).abs() <= lat_tolerance
            && (self.longitude - other.longitude).abs() <= lon_tolerance
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Whether `latitude` lies in `[-90, 90]`.
pub fn is_valid_latitude(latitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude)
}

/// Whether `longitude` lies in `[-180, 180]`.
pub fn is_valid_longitude(longitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude)
}

/// Parse a pipe separated list of `lat,lon` pairs, e.g. `54.4,-3.2|54.5,-3.5`.
///
/// Order is preserved. An empty (or all-whitespace) input yields an empty list.
///
/// # Errors
///
/// Returns [`ElevationError::InvalidCoordinateFormat`] for the first entry
/// that is not exactly two comma separated numbers in range.
pub fn parse_coordinate_list(input: &str) -> Result<Vec<GeoCoordinate>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split('|')
        .map(|pair| {
            let invalid = || ElevationError::InvalidCoordinateFormat {
                input: pair.to_string(),
            };

            match pair.split(',').collect::<Vec<_>>().as_slice() {
                [lat, lon] => GeoCoordinate::try_parse(lat, lon).ok_or_else(invalid),
                _ => Err(invalid()),
            }
        })
        .collect()
}

fn round_decimals(value: f64) -> f64 {
    let factor = 10f64.powi(DECIMAL_PLACES);
    (value * factor).round() / factor
}
