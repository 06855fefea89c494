//! Batch elevation queries over a directory of tiles.
//!
//! This module provides [`ElevationService`], the entry point used by the
//! HTTP service and the CLI. A batch query first resolves the distinct tiles
//! it needs through the [`TileReferenceCache`], then reads each coordinate's
//! sample from the first resolved tile that contains it.
//!
//! A missing tile fails the whole batch; no partial results are returned.
//!
//! ```ignore
//! use elevation::{parse_coordinate_list, ElevationServiceBuilder};
//!
//! let service = ElevationServiceBuilder::new("/data/hgt").build()?;
//! let coords = parse_coordinate_list("54.454225,-3.211586|54.5,-3.5")?;
//!
//! for point in service.profile(&coords)? {
//!     println!("{}m at {}m", point.elevation(), point.distance());
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheStats, TileReferenceCache, DEFAULT_CACHE_SIZE, DEFAULT_IDLE_TIMEOUT};
use crate::coordinate::GeoCoordinate;
use crate::error::{ElevationError, Result};
use crate::format::{HgtFormat, TileFormat};
use crate::point::{ElevationPoint, ElevationProfilePoint};
use crate::tile::TileFileReference;

/// A geographic bounding box for filtering tiles during preload.
///
/// Coordinates are in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    /// Minimum latitude (southern boundary).
    pub min_lat: f64,
    /// Minimum longitude (western boundary).
    pub min_lon: f64,
    /// Maximum latitude (northern boundary).
    pub max_lat: f64,
    /// Maximum longitude (eastern boundary).
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Check if this box overlaps the 1°×1° tile anchored at `south_west`.
    ///
    /// Touching edges do not count as an overlap.
    pub fn overlaps_tile(&self, south_west: &GeoCoordinate) -> bool {
        let south = south_west.latitude();
        let west = south_west.longitude();

        self.min_lat < south + 1.0
            && self.max_lat > south
            && self.min_lon < west + 1.0
            && self.max_lon > west
    }
}

/// Statistics from a preload operation.
#[derive(Debug, Clone, Default)]
pub struct PreloadStats {
    /// Number of tiles that matched the bounding box filter.
    pub tiles_matched: u64,
    /// Number of references loaded into the cache.
    pub tiles_loaded: u64,
    /// Number of tiles that were already cached.
    pub tiles_already_cached: u64,
    /// Number of tiles that failed to load.
    pub tiles_failed: u64,
    /// Total elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

/// Elevation queries against a directory of tiles, with reference caching.
///
/// # Example
///
/// ```ignore
/// use elevation::{ElevationService, GeoCoordinate};
///
/// let service = ElevationService::builder("/data/hgt").build()?;
///
/// let coords = [GeoCoordinate::new(54.4, -3.2)?, GeoCoordinate::new(54.5, -3.5)?];
/// for point in service.elevations(&coords)? {
///     println!("{}", point);
/// }
/// ```
pub struct ElevationService {
    cache: TileReferenceCache,
}

impl ElevationService {
    /// Create a builder for the tiles in `data_dir`.
    pub fn builder<P: AsRef<Path>>(data_dir: P) -> ElevationServiceBuilder {
        ElevationServiceBuilder::new(data_dir)
    }

    /// Elevation at a single coordinate.
    pub fn elevation(&self, coordinate: &GeoCoordinate) -> Result<ElevationPoint> {
        let reference = self.cache.get_or_load(&self.cache.format().name_for(coordinate))?;
        let elevation = elevation_from(std::slice::from_ref(&reference), coordinate)?;

        Ok(ElevationPoint::new(*coordinate, elevation))
    }

    /// Elevations for a batch of coordinates, in input order.
    ///
    /// # Errors
    ///
    /// Fails if any coordinate's tile is missing or unreadable.
    pub fn elevations(&self, coordinates: &[GeoCoordinate]) -> Result<Vec<ElevationPoint>> {
        let references = self.cache.resolve_all(coordinates)?;

        coordinates
            .iter()
            .map(|c| Ok(ElevationPoint::new(*c, elevation_from(&references, c)?)))
            .collect()
    }

    /// Elevation profile along `coordinates`.
    ///
    /// Each point carries the distance travelled from the first coordinate.
    /// Every segment is rounded to the nearest metre before it is added to
    /// the running total. An empty input yields an empty profile.
    pub fn profile(&self, coordinates: &[GeoCoordinate]) -> Result<Vec<ElevationProfilePoint>> {
        let references = self.cache.resolve_all(coordinates)?;

        let mut distance = 0.0;
        let mut previous: Option<&GeoCoordinate> = None;
        let mut profile = Vec::with_capacity(coordinates.len());

        for coordinate in coordinates {
            let elevation = elevation_from(&references, coordinate)?;

            if let Some(previous) = previous {
                distance += coordinate.distance_to(previous).round();
            }
            previous = Some(coordinate);

            profile.push(ElevationProfilePoint::new(*coordinate, elevation, distance));
        }

        Ok(profile)
    }

    /// Resolve the distinct tiles needed for `coordinates`.
    pub fn resolve_all(
        &self,
        coordinates: &[GeoCoordinate],
    ) -> Result<Vec<Arc<TileFileReference>>> {
        self.cache.resolve_all(coordinates)
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        self.cache.data_dir()
    }

    /// Get the maximum number of cached references.
    pub fn cache_capacity(&self) -> u64 {
        self.cache.capacity()
    }

    /// Get the idle period after which unused references are evicted.
    pub fn idle_timeout(&self) -> Duration {
        self.cache.idle_timeout()
    }

    /// Remove a tile (e.g. "N54W004.hgt") from the cache.
    ///
    /// Useful when a tile file has been replaced on disk.
    pub fn invalidate_tile(&self, name: &str) {
        self.cache.invalidate(name);
    }

    /// Clear all references from the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Scan the data directory for tile files.
    ///
    /// Returns a sorted list of file names (e.g., `["N54W004.hgt"]`). Files
    /// whose name is not a valid tile name are ignored.
    pub fn scan_tile_files(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(self.data_dir()) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let format = self.cache.format();
        let names: HashSet<String> = entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| format.is_valid_name(name))
            .collect();

        let mut result: Vec<String> = names.into_iter().collect();
        result.sort();
        result
    }

    /// Load references for the tiles in the data directory into the cache.
    ///
    /// With `bounds`, only tiles overlapping at least one box are loaded.
    /// Useful for warming the cache at startup.
    pub fn preload(&self, bounds: Option<&[BoundingBox]>) -> PreloadStats {
        let start = Instant::now();
        let mut stats = PreloadStats::default();

        for name in self.scan_tile_files() {
            let Ok(corner) = self.cache.format().coordinate_for(&name) else {
                continue;
            };

            if let Some(boxes) = bounds {
                if !boxes.iter().any(|b| b.overlaps_tile(&corner)) {
                    continue;
                }
            }

            stats.tiles_matched += 1;

            if self.cache.contains(&name) {
                stats.tiles_already_cached += 1;
                continue;
            }

            match self.cache.get_or_load(&name) {
                Ok(_) => stats.tiles_loaded += 1,
                Err(e) => {
                    tracing::warn!(tile = %name, error = %e, "Failed to preload tile");
                    stats.tiles_failed += 1;
                }
            }
        }

        stats.elapsed_ms = start.elapsed().as_millis() as u64;
        stats
    }
}

/// Read `coordinate` from the first reference that contains it.
///
/// Adjacent tiles share their edges, so a coordinate on an edge may be
/// contained by several references; the earliest one wins.
///
/// # Errors
///
/// Returns [`ElevationError::NoCoveringTile`] if no reference contains the
/// coordinate.
pub fn elevation_from(
    references: &[Arc<TileFileReference>],
    coordinate: &GeoCoordinate,
) -> Result<i16> {
    references
        .iter()
        .find(|r| r.contains(coordinate))
        .ok_or(ElevationError::NoCoveringTile {
            lat: coordinate.latitude(),
            lon: coordinate.longitude(),
        })?
        .elevation_at(coordinate)
}

/// Builder for creating [`ElevationService`] with custom configuration.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use elevation::ElevationServiceBuilder;
///
/// let service = ElevationServiceBuilder::new("/data/hgt")
///     .cache_size(500)
///     .idle_timeout(Duration::from_secs(300))
///     .build()?;
/// ```
pub struct ElevationServiceBuilder {
    data_dir: PathBuf,
    cache_size: u64,
    idle_timeout: Duration,
    format: Arc<dyn TileFormat>,
}

impl ElevationServiceBuilder {
    /// Create a new builder with the specified data directory.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            cache_size: DEFAULT_CACHE_SIZE,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            format: Arc::new(HgtFormat),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ELEVATION_DATA_DIR` | Directory containing .hgt files | Required |
    /// | `ELEVATION_CACHE_SIZE` | Maximum cached tile references | 1000 |
    /// | `ELEVATION_CACHE_IDLE_SECS` | Seconds before an unused reference is evicted | 60 |
    ///
    /// # Errors
    ///
    /// Returns an error if `ELEVATION_DATA_DIR` is not set.
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var("ELEVATION_DATA_DIR").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "ELEVATION_DATA_DIR environment variable not set",
            )
        })?;

        let cache_size: u64 = std::env::var("ELEVATION_CACHE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CACHE_SIZE);

        let idle_timeout = std::env::var("ELEVATION_CACHE_IDLE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_IDLE_TIMEOUT);

        Ok(Self::new(data_dir)
            .cache_size(cache_size)
            .idle_timeout(idle_timeout))
    }

    /// Set the data directory.
    ///
    /// Overrides the directory set in the constructor or from environment.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the maximum number of tile references to keep in cache.
    ///
    /// Default is 1000.
    pub fn cache_size(mut self, size: u64) -> Self {
        self.cache_size = size;
        self
    }

    /// Set the idle period after which an unused reference is evicted.
    ///
    /// Every cache hit restarts the period. Default is one minute.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Use a different tile format.
    pub fn format<F: TileFormat + 'static>(mut self, format: F) -> Self {
        self.format = Arc::new(format);
        self
    }

    /// Build the [`ElevationService`].
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::DataDirNotFound`] if the data directory does
    /// not exist.
    pub fn build(self) -> Result<ElevationService> {
        if !self.data_dir.is_dir() {
            return Err(ElevationError::DataDirNotFound {
                path: self.data_dir,
            });
        }

        Ok(ElevationService {
            cache: TileReferenceCache::new(
                self.data_dir,
                self.format,
                self.cache_size,
                self.idle_timeout,
            ),
        })
    }
}
