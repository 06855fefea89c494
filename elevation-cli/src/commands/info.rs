use anyhow::{bail, Context, Result};
use elevation::{filename, GeoCoordinate, InMemoryTile, TileFileReference, TileResolution};
use std::path::PathBuf;

use super::{coverage, data_dir_or_env, format_size};

pub fn run(
    data_dir: Option<PathBuf>,
    tile: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<()> {
    let tile_path = tile_path(data_dir, tile, lat, lon)?;

    if !tile_path.exists() {
        bail!("Tile not found: {}", tile_path.display());
    }

    let reference = TileFileReference::from_file(&tile_path).context("Failed to read tile")?;
    let tile = InMemoryTile::load(&reference).context("Failed to load tile")?;
    let stats = tile.statistics();

    let file_size = std::fs::metadata(&tile_path)?.len();
    let corner = reference.south_west();
    let base_lat = corner.latitude() as i32;
    let base_lon = corner.longitude() as i32;

    let resolution = reference.resolution();
    let resolution_str = match resolution {
        TileResolution::OneArcSecond => "1 arc-second (~30m)",
        TileResolution::ThreeArcSecond => "3 arc-second (~90m)",
    };
    let samples = resolution.row_length();

    println!("Tile: {}", filename::file_name(&corner));
    println!("Path: {}", tile_path.display());
    println!();
    println!(
        "Resolution: {} ({}x{} samples)",
        resolution_str, samples, samples
    );
    println!("South-west corner: {}", corner);
    println!("Coverage: {}", coverage(base_lat, base_lon));
    println!("File size: {}", format_size(file_size));
    println!();

    if let (Some(min), Some(max)) = (stats.min, stats.max) {
        println!("Min elevation: {}m", min);
        println!("Max elevation: {}m", max);
    }

    if stats.void_count > 0 {
        let void_pct = (stats.void_count as f64 / tile.len() as f64) * 100.0;
        println!("Void samples: {} ({:.1}%)", stats.void_count, void_pct);
    }

    Ok(())
}

/// Work out which file the user means: a coordinate, a path, or a bare tile name.
fn tile_path(
    data_dir: Option<PathBuf>,
    tile: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<PathBuf> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        let coordinate = GeoCoordinate::new(lat, lon)?;
        return Ok(data_dir_or_env(data_dir)?.join(filename::file_name(&coordinate)));
    }

    let Some(tile) = tile else {
        bail!("Specify a tile name, a path, or --lat and --lon");
    };

    if tile.ends_with(".hgt") {
        return Ok(PathBuf::from(tile));
    }

    if !filename::is_valid_tile_name(&tile) {
        bail!("Invalid tile name: {} (expected e.g. N54W004)", tile);
    }

    Ok(data_dir_or_env(data_dir)?.join(format!("{}.hgt", tile)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_path_from_coordinate() {
        let path = tile_path(Some(PathBuf::from("/data")), None, Some(54.45), Some(-3.21)).unwrap();
        assert_eq!(path, PathBuf::from("/data/N54W004.hgt"));
    }

    #[test]
    fn test_tile_path_from_name_and_path() {
        let by_name = tile_path(Some(PathBuf::from("/data")), Some("S34E018".into()), None, None);
        assert_eq!(by_name.unwrap(), PathBuf::from("/data/S34E018.hgt"));

        let by_path = tile_path(None, Some("/tiles/N54W004.hgt".into()), None, None);
        assert_eq!(by_path.unwrap(), PathBuf::from("/tiles/N54W004.hgt"));
    }

    #[test]
    fn test_tile_path_rejects_bad_name() {
        assert!(tile_path(Some(PathBuf::from("/data")), Some("nowhere".into()), None, None).is_err());
    }
}
