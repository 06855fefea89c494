//! Error types for the elevation library.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Broad classification of an [`ElevationError`].
///
/// Front ends branch on the kind (e.g. to pick an HTTP status) instead of
/// matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed coordinate, coordinate list or tile file name.
    InvalidArgument,
    /// A required dataset file, data directory or covering tile is missing.
    NotFound,
    /// An index was computed for a coordinate outside the target tile.
    OutOfRange,
    /// A tile file's size does not match a known resolution.
    FormatError,
    /// Underlying I/O failure.
    Io,
}

/// Errors that can occur when resolving or reading elevation tiles.
#[derive(Error, Debug, Clone)]
pub enum ElevationError {
    /// IO error when reading files.
    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),

    /// Latitude or longitude outside the valid geographic range.
    #[error("Invalid coordinate: lat={lat}, lon={lon} (valid: lat ±90°, lon ±180°)")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A textual coordinate could not be parsed.
    #[error("Invalid coordinate format: '{input}' (expected 'lat,lon')")]
    InvalidCoordinateFormat { input: String },

    /// A tile name does not follow the `[NS]DD[WE]DDD` convention.
    #[error("Invalid tile file name: '{name}' (expected e.g. N52W002)")]
    InvalidFileName { name: String },

    /// File size doesn't match a one or three arc-second tile.
    #[error("Invalid file size: {size} bytes (expected 25934402 for 1\" or 2884802 for 3\" tiles)")]
    InvalidFileSize { size: u64 },

    /// Sample count doesn't match a one or three arc-second tile.
    #[error("Unsupported sample count: {count} (expected 3601² or 1201²)")]
    UnsupportedSampleCount { count: u64 },

    /// The dataset file required for a coordinate is not available.
    #[error("Dataset '{name}' is not available: {path}")]
    DatasetNotFound { name: String, path: PathBuf },

    /// None of the resolved tiles contains the coordinate.
    #[error("No tile covers coordinate: lat={lat}, lon={lon}")]
    NoCoveringTile { lat: f64, lon: f64 },

    /// The configured data directory does not exist.
    #[error("Data directory not found: {path}")]
    DataDirNotFound { path: PathBuf },

    /// Index requested for a coordinate outside the tile.
    #[error("Coordinate lat={lat}, lon={lon} is not contained within '{path}'")]
    OutOfRange { lat: f64, lon: f64, path: PathBuf },
}

impl ElevationError {
    /// Returns the broad kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ElevationError::Io(_) => ErrorKind::Io,
            ElevationError::InvalidCoordinate { .. }
            | ElevationError::InvalidCoordinateFormat { .. }
            | ElevationError::InvalidFileName { .. } => ErrorKind::InvalidArgument,
            ElevationError::InvalidFileSize { .. }
            | ElevationError::UnsupportedSampleCount { .. } => ErrorKind::FormatError,
            ElevationError::DatasetNotFound { .. }
            | ElevationError::NoCoveringTile { .. }
            | ElevationError::DataDirNotFound { .. } => ErrorKind::NotFound,
            ElevationError::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}

impl From<std::io::Error> for ElevationError {
    fn from(err: std::io::Error) -> Self {
        ElevationError::Io(Arc::new(err))
    }
}

/// Result type alias using [`ElevationError`].
pub type Result<T> = std::result::Result<T, ElevationError>;
