//! Tile file name codec.
//!
//! Converts between coordinates and canonical `.hgt` tile names.
//!
//! # Filename Format
//!
//! Tiles follow the naming convention: `{N|S}{lat}{E|W}{lon}.hgt`
//!
//! - Latitude: 2 digits with N/S prefix (e.g., N54, S12)
//! - Longitude: 3 digits with E/W prefix (e.g., E138, W004)
//!
//! The name encodes the **south-west corner** of the 1° × 1° tile, so every
//! coordinate inside a tile maps to the same name. Only the corner survives a
//! round trip; the position within the tile does not.

use crate::coordinate::GeoCoordinate;
use crate::error::{ElevationError, Result};

/// Extension of HGT tile files, including the leading dot.
pub const HGT_EXTENSION: &str = ".hgt";

/// Length of a bare tile name such as `N54W004`.
const TILE_NAME_LEN: usize = 7;

/// Canonical tile name (without extension) for the tile containing `coordinate`.
///
/// # Examples
///
/// ```
/// use elevation::{filename::tile_name, GeoCoordinate};
///
/// let c = GeoCoordinate::new(54.4, -3.2).unwrap();
/// assert_eq!(tile_name(&c), "N54W004");
/// ```
pub fn tile_name(coordinate: &GeoCoordinate) -> String {
    let lat = coordinate.latitude().floor() as i32;
    let lon = coordinate.longitude().floor() as i32;

    let lat_prefix = if lat >= 0 { 'N' } else { 'S' };
    let lon_prefix = if lon >= 0 { 'E' } else { 'W' };

    format!(
        "{}{:02}{}{:03}",
        lat_prefix,
        lat.abs(),
        lon_prefix,
        lon.abs()
    )
}

/// Tile file name (with `.hgt` extension) for the tile containing `coordinate`.
///
/// ```
/// use elevation::{filename::file_name, GeoCoordinate};
///
/// let c = GeoCoordinate::new(-12.3, -77.1).unwrap();
/// assert_eq!(file_name(&c), "S13W078.hgt");
/// ```
pub fn file_name(coordinate: &GeoCoordinate) -> String {
    format!("{}{}", tile_name(coordinate), HGT_EXTENSION)
}

/// Parse a tile name into its south-west corner coordinate.
///
/// Accepts a bare name (`N54W004`), a file name (`N54W004.hgt`) or a path.
///
/// # Errors
///
/// Returns [`ElevationError::InvalidFileName`] if the name does not match
/// `[NS]\d{2}[WE]\d{3}`.
///
/// ```
/// use elevation::filename::coordinate_for;
///
/// let corner = coordinate_for("/data/S12W077.hgt").unwrap();
/// assert_eq!((corner.latitude(), corner.longitude()), (-12.0, -77.0));
/// assert!(coordinate_for("invalid").is_err());
/// ```
pub fn coordinate_for(name: &str) -> Result<GeoCoordinate> {
    let stem = tile_stem(name);
    let invalid = || ElevationError::InvalidFileName {
        name: name.to_string(),
    };

    if !is_valid_tile_name(stem) {
        return Err(invalid());
    }

    let lat_sign = if stem.starts_with('S') { -1.0 } else { 1.0 };
    let lon_sign = if &stem[3..4] == "W" { -1.0 } else { 1.0 };

    let lat: f64 = stem[1..3].parse().map_err(|_| invalid())?;
    let lon: f64 = stem[4..7].parse().map_err(|_| invalid())?;

    // N90/E181-style names pass the pattern but are not coordinates
    GeoCoordinate::new(lat * lat_sign, lon * lon_sign).map_err(|_| invalid())
}

/// Whether `name` is exactly a bare tile name, e.g. `N52W002`.
pub fn is_valid_tile_name(name: &str) -> bool {
    let bytes = name.as_bytes();

    bytes.len() == TILE_NAME_LEN
        && matches!(bytes[0], b'N' | b'S')
        && bytes[1..3].iter().all(u8::is_ascii_digit)
        && matches!(bytes[3], b'W' | b'E')
        && bytes[4..7].iter().all(u8::is_ascii_digit)
}

/// Strip any directory components, the `.hgt` extension and whitespace.
fn tile_stem(name: &str) -> &str {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let name = name.trim();
    name.strip_suffix(HGT_EXTENSION).unwrap_or(name).trim()
}
