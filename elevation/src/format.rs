//! Tile format capability.
//!
//! Everything the reference cache needs to know about an on-disk grid format
//! is behind [`TileFormat`]. [`HgtFormat`] is the only implementation.

use std::path::Path;

use crate::coordinate::GeoCoordinate;
use crate::error::Result;
use crate::filename;
use crate::tile::TileFileReference;

/// Naming and loading rules for one binary grid format.
pub trait TileFormat: Send + Sync {
    /// File extension including the leading dot.
    fn extension(&self) -> &'static str;

    /// Load a reference to the tile file at `path`.
    fn load_reference(&self, path: &Path) -> Result<TileFileReference>;

    /// File name of the tile containing `coordinate`.
    fn name_for(&self, coordinate: &GeoCoordinate) -> String;

    /// South-west corner encoded in a tile file name.
    fn coordinate_for(&self, name: &str) -> Result<GeoCoordinate>;

    /// Whether `name` is a tile file name of this format.
    fn is_valid_name(&self, name: &str) -> bool;
}

/// SRTM-style `.hgt` tiles, e.g. `N54W004.hgt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HgtFormat;

impl TileFormat for HgtFormat {
    fn extension(&self) -> &'static str {
        filename::HGT_EXTENSION
    }

    fn load_reference(&self, path: &Path) -> Result<TileFileReference> {
        TileFileReference::from_file(path)
    }

    fn name_for(&self, coordinate: &GeoCoordinate) -> String {
        filename::file_name(coordinate)
    }

    fn coordinate_for(&self, name: &str) -> Result<GeoCoordinate> {
        filename::coordinate_for(name)
    }

    fn is_valid_name(&self, name: &str) -> bool {
        name.strip_suffix(filename::HGT_EXTENSION)
            .is_some_and(filename::is_valid_tile_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hgt_names() {
        let format = HgtFormat;
        let c = GeoCoordinate::new(54.4, -3.2).unwrap();

        assert_eq!(format.name_for(&c), "N54W004.hgt");
        assert_eq!(
            format.coordinate_for("N54W004.hgt").unwrap(),
            GeoCoordinate::new(54.0, -4.0).unwrap()
        );
    }

    #[test]
    fn test_is_valid_name() {
        let format = HgtFormat;

        assert!(format.is_valid_name("N54W004.hgt"));
        assert!(!format.is_valid_name("N54W004"));
        assert!(!format.is_valid_name("N54W004.hgt.zip"));
        assert!(!format.is_valid_name("readme.txt"));
    }
}
