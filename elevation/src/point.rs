//! Query results.

use std::fmt;

use crate::coordinate::GeoCoordinate;

/// Elevation reading at a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationPoint {
    coordinate: GeoCoordinate,
    elevation: i16,
}

impl ElevationPoint {
    pub fn new(coordinate: GeoCoordinate, elevation: i16) -> Self {
        Self {
            coordinate,
            elevation,
        }
    }

    /// The queried coordinate.
    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    /// Elevation in metres.
    pub fn elevation(&self) -> i16 {
        self.elevation
    }
}

impl fmt::Display for ElevationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}m", self.coordinate, self.elevation)
    }
}

/// A single point within an elevation profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationProfilePoint {
    coordinate: GeoCoordinate,
    elevation: i16,
    distance: f64,
}

impl ElevationProfilePoint {
    pub fn new(coordinate: GeoCoordinate, elevation: i16, distance: f64) -> Self {
        Self {
            coordinate,
            elevation,
            distance,
        }
    }

    /// The queried coordinate.
    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    /// Elevation in metres.
    pub fn elevation(&self) -> i16 {
        self.elevation
    }

    /// Cumulative distance from the first point of the profile, in metres.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl fmt::Display for ElevationProfilePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}m @ {}m",
            self.coordinate, self.elevation, self.distance
        )
    }
}
