pub mod batch;
pub mod info;
pub mod list;
pub mod profile;
pub mod query;

use anyhow::{Context, Result};
use elevation::{ElevationService, ElevationServiceBuilder};
use std::path::PathBuf;

const DATA_DIR_HINT: &str =
    "ELEVATION_DATA_DIR environment variable not set. Use --data-dir or set ELEVATION_DATA_DIR";

/// Resolve the data directory from the flag or the environment.
pub fn data_dir_or_env(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(dir),
        None => {
            let dir = std::env::var("ELEVATION_DATA_DIR").context(DATA_DIR_HINT)?;
            Ok(PathBuf::from(dir))
        }
    }
}

/// Build the elevation service shared by the query commands.
pub fn build_service(data_dir: Option<PathBuf>, cache_size: u64) -> Result<ElevationService> {
    let builder = match data_dir {
        Some(dir) => ElevationServiceBuilder::new(dir),
        None => ElevationServiceBuilder::from_env().context(DATA_DIR_HINT)?,
    };

    builder
        .cache_size(cache_size)
        .build()
        .context("Failed to create elevation service")
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Human readable extent of the tile anchored at `(lat, lon)`.
pub fn coverage(lat: i32, lon: i32) -> String {
    let lat_prefix = |v: i32| if v >= 0 { "N" } else { "S" };
    let lon_prefix = |v: i32| if v >= 0 { "E" } else { "W" };
    format!(
        "{}{:02} to {}{:02}, {}{:03} to {}{:03}",
        lat_prefix(lat),
        lat.abs(),
        lat_prefix(lat + 1),
        (lat + 1).abs(),
        lon_prefix(lon),
        lon.abs(),
        lon_prefix(lon + 1),
        (lon + 1).abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2_884_802), "2.75 MB");
    }

    #[test]
    fn test_coverage_crosses_equator() {
        assert_eq!(coverage(54, -4), "N54 to N55, W004 to W003");
        assert_eq!(coverage(-1, -1), "S01 to N00, W001 to E000");
    }

    #[test]
    fn test_build_service_missing_dir() {
        let err = build_service(Some(PathBuf::from("/definitely/not/here")), 10).err().unwrap();
        assert!(format!("{:#}", err).contains("/definitely/not/here"));
    }
}
