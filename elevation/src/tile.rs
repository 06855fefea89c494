//! Tile file references and single-sample reads.
//!
//! A [`TileFileReference`] holds everything needed to answer a point query
//! against an `.hgt` file (path, south-west corner and resolution) without
//! keeping any of the file's samples in memory. Every read opens the file,
//! seeks to the sample and closes it again; use [`crate::InMemoryTile`] when
//! many samples from the same tile are needed.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::coordinate::GeoCoordinate;
use crate::error::{ElevationError, Result};
use crate::filename;
use crate::resolution::{TileResolution, BYTES_PER_SAMPLE};

/// Value indicating no data (void) in HGT files
pub const VOID_VALUE: i16 = -32768;

/// Metadata handle for one tile file on disk.
///
/// Immutable after construction and cheap to clone; safe to share between
/// threads.
///
/// # Example
///
/// ```ignore
/// use elevation::{GeoCoordinate, TileFileReference};
///
/// let tile = TileFileReference::from_file("/data/N54W004.hgt")?;
/// let elevation = tile.elevation_at(&GeoCoordinate::new(54.45, -3.21)?)?;
/// println!("Elevation: {}m", elevation);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileFileReference {
    /// Path of the tile file
    path: PathBuf,
    /// South-west corner (integer degrees)
    south_west: GeoCoordinate,
    /// Resolution detected from the file size
    resolution: TileResolution,
}

impl TileFileReference {
    /// Load a reference to a tile file, taking the corner from its name.
    ///
    /// The resolution is detected from the file size.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist ([`ElevationError::DatasetNotFound`])
    /// - The file name is not a valid tile name
    /// - The file size doesn't match a one or three arc-second tile
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let south_west = filename::coordinate_for(&name)?;
        Self::from_file_with_corner(path, south_west)
    }

    /// Load a reference with an explicit south-west corner.
    ///
    /// This is useful when the file name doesn't follow the standard naming
    /// convention.
    pub fn from_file_with_corner<P: AsRef<Path>>(
        path: P,
        south_west: GeoCoordinate,
    ) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => not_found(path),
            _ => e.into(),
        })?;

        let resolution = TileResolution::from_file_size(metadata.len())?;

        Ok(Self {
            path: path.to_path_buf(),
            south_west,
            resolution,
        })
    }

    /// Create a reference from already known parts.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::DatasetNotFound`] if `path` does not exist.
    pub fn new<P: AsRef<Path>>(
        path: P,
        south_west: GeoCoordinate,
        resolution: TileResolution,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(not_found(path));
        }

        Ok(Self {
            path: path.to_path_buf(),
            south_west,
            resolution,
        })
    }

    /// Does the tile contain `coordinate`?
    ///
    /// All four edges are inclusive, so a coordinate on an edge shared by two
    /// tiles is contained by both.
    pub fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        let lat = coordinate.latitude();
        let lon = coordinate.longitude();
        let south = self.south_west.latitude();
        let west = self.south_west.longitude();

        (south..=south + 1.0).contains(&lat) && (west..=west + 1.0).contains(&lon)
    }

    /// Sample index of `coordinate` within the tile.
    ///
    /// Samples are stored row-major starting at the tile's northern edge, so
    /// the row counted up from the south-west corner is inverted.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::OutOfRange`] if the tile does not contain
    /// `coordinate`.
    pub fn index_of(&self, coordinate: &GeoCoordinate) -> Result<usize> {
        if !self.contains(coordinate) {
            return Err(ElevationError::OutOfRange {
                lat: coordinate.latitude(),
                lon: coordinate.longitude(),
                path: self.path.clone(),
            });
        }

        let last = (self.resolution.row_length() - 1) as f64;
        let rel_lat = coordinate.latitude() - self.south_west.latitude();
        let rel_lon = coordinate.longitude() - self.south_west.longitude();

        let row = (rel_lat * last).round() as usize;
        let col = (rel_lon * last).round() as usize;
        let storage_row = self.resolution.row_length() - 1 - row;

        Ok(col + storage_row * self.resolution.row_length())
    }

    /// Read the elevation at `coordinate` in metres.
    ///
    /// Opens the file, reads the single big-endian sample and closes it again.
    /// [`VOID_VALUE`] is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate is outside the tile or the file
    /// cannot be read.
    pub fn elevation_at(&self, coordinate: &GeoCoordinate) -> Result<i16> {
        let index = self.index_of(coordinate)?;

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start((index * BYTES_PER_SAMPLE) as u64))?;

        let mut bytes = [0u8; BYTES_PER_SAMPLE];
        file.read_exact(&mut bytes)?;

        Ok(i16::from_be_bytes(bytes))
    }

    /// Path of the tile file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// South-west corner of the tile.
    pub fn south_west(&self) -> GeoCoordinate {
        self.south_west
    }

    /// Resolution of the tile.
    pub fn resolution(&self) -> TileResolution {
        self.resolution
    }
}

fn not_found(path: &Path) -> ElevationError {
    ElevationError::DatasetNotFound {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const SAMPLES: usize = 1201;
    const SIZE: usize = SAMPLES * SAMPLES * 2;

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    /// Write a 3" tile with a few known samples under `dir/name`.
    fn create_test_tile(dir: &Path, name: &str) -> PathBuf {
        let mut data = vec![0u8; SIZE];

        // Row 0, Col 0 (north-west corner) = 1000m
        data[0..2].copy_from_slice(&1000i16.to_be_bytes());

        // Row 600, Col 600 (center) = 500m
        let center = (600 * SAMPLES + 600) * 2;
        data[center..center + 2].copy_from_slice(&500i16.to_be_bytes());

        // Row 1200, Col 0 (south-west corner) = 100m
        let south_west = 1200 * SAMPLES * 2;
        data[south_west..south_west + 2].copy_from_slice(&100i16.to_be_bytes());

        // Row 1200, Col 1200 (south-east corner) = -5m
        let south_east = (1200 * SAMPLES + 1200) * 2;
        data[south_east..south_east + 2].copy_from_slice(&(-5i16).to_be_bytes());

        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_load_reference() {
        let dir = TempDir::new().unwrap();
        let path = create_test_tile(dir.path(), "N54W004.hgt");

        let tile = TileFileReference::from_file(&path).unwrap();
        assert_eq!(tile.resolution(), TileResolution::ThreeArcSecond);
        assert_eq!(tile.south_west(), coord(54.0, -4.0));
        assert_eq!(tile.path(), path.as_path());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = TileFileReference::from_file(dir.path().join("N54W004.hgt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = TileFileReference::new(
            dir.path().join("N54W004.hgt"),
            coord(54.0, -4.0),
            TileResolution::ThreeArcSecond,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_invalid_file_size() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; 1000]).unwrap();

        let result = TileFileReference::from_file_with_corner(file.path(), coord(0.0, 0.0));
        match result {
            Err(ElevationError::InvalidFileSize { size }) => assert_eq!(size, 1000),
            other => panic!("Expected InvalidFileSize error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_file_name() {
        let dir = TempDir::new().unwrap();
        let path = create_test_tile(dir.path(), "tile.hgt");

        let err = TileFileReference::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        // Explicit corner bypasses the name
        assert!(TileFileReference::from_file_with_corner(&path, coord(54.0, -4.0)).is_ok());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let tile =
            TileFileReference::from_file(create_test_tile(dir.path(), "N54W004.hgt")).unwrap();

        assert!(tile.contains(&coord(54.0, -4.0)));
        assert!(tile.contains(&coord(55.0, -3.0)));
        assert!(tile.contains(&coord(54.5, -3.5)));

        assert!(!tile.contains(&coord(53.999, -3.5)));
        assert!(!tile.contains(&coord(55.001, -3.5)));
        assert!(!tile.contains(&coord(54.5, -4.001)));
        assert!(!tile.contains(&coord(54.5, -2.999)));
    }

    #[test]
    fn test_index_of_corners() {
        let dir = TempDir::new().unwrap();
        let tile =
            TileFileReference::from_file(create_test_tile(dir.path(), "N54W004.hgt")).unwrap();

        // South-west corner -> last row, first column
        assert_eq!(tile.index_of(&coord(54.0, -4.0)).unwrap(), 1_441_200);
        // North-east corner -> first row, last column
        assert_eq!(tile.index_of(&coord(55.0, -3.0)).unwrap(), 1200);
        // North-west corner
        assert_eq!(tile.index_of(&coord(55.0, -4.0)).unwrap(), 0);
        // South-east corner
        assert_eq!(tile.index_of(&coord(54.0, -3.0)).unwrap(), 1200 * 1201 + 1200);
        // Center
        assert_eq!(tile.index_of(&coord(54.5, -3.5)).unwrap(), 600 * 1201 + 600);
    }

    #[test]
    fn test_index_of_outside_tile() {
        let dir = TempDir::new().unwrap();
        let tile =
            TileFileReference::from_file(create_test_tile(dir.path(), "N54W004.hgt")).unwrap();

        let err = tile.index_of(&coord(56.0, -3.5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_elevation_at() {
        let dir = TempDir::new().unwrap();
        let tile =
            TileFileReference::from_file(create_test_tile(dir.path(), "N54W004.hgt")).unwrap();

        assert_eq!(tile.elevation_at(&coord(54.0, -4.0)).unwrap(), 100);
        assert_eq!(tile.elevation_at(&coord(55.0, -4.0)).unwrap(), 1000);
        assert_eq!(tile.elevation_at(&coord(54.5, -3.5)).unwrap(), 500);
        assert_eq!(tile.elevation_at(&coord(54.0, -3.0)).unwrap(), -5);
        assert_eq!(tile.elevation_at(&coord(54.3, -3.7)).unwrap(), 0);
    }

    #[test]
    fn test_elevation_rounds_to_nearest_sample() {
        let dir = TempDir::new().unwrap();
        let tile =
            TileFileReference::from_file(create_test_tile(dir.path(), "N54W004.hgt")).unwrap();

        // Less than half a sample spacing from the center
        let offset = 0.4 / 1200.0;
        assert_eq!(
            tile.elevation_at(&coord(54.5 + offset, -3.5 - offset)).unwrap(),
            500
        );
    }

    #[test]
    fn test_one_arc_second_tile() {
        let dir = TempDir::new().unwrap();
        let mut data = vec![0u8; 3601 * 3601 * 2];
        let center = (1800 * 3601 + 1800) * 2;
        data[center..center + 2].copy_from_slice(&2500i16.to_be_bytes());
        let path = dir.path().join("N27E086.hgt");
        std::fs::write(&path, data).unwrap();

        let tile = TileFileReference::from_file(&path).unwrap();
        assert_eq!(tile.resolution(), TileResolution::OneArcSecond);
        assert_eq!(tile.elevation_at(&coord(27.5, 86.5)).unwrap(), 2500);
    }
}
