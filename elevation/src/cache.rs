//! Tile reference cache.
//!
//! [`TileReferenceCache`] maps tile file names to loaded
//! [`TileFileReference`]s so the file size and corner of a tile are only
//! resolved once while the tile is in use. Entries expire after a sliding
//! idle window that is refreshed on every hit.
//!
//! Concurrent misses for the same name are coalesced: one caller loads the
//! reference while the others wait for its result, so a tile is loaded at
//! most once at a time. Failed loads are not cached.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::coordinate::GeoCoordinate;
use crate::error::{ElevationError, Result};
use crate::format::TileFormat;
use crate::tile::TileFileReference;

/// Default idle period after which an unused reference is evicted.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default maximum number of cached references.
pub const DEFAULT_CACHE_SIZE: u64 = 1000;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of references currently in the cache.
    pub entry_count: u64,
    /// Number of lookups served from the cache.
    pub hit_count: u64,
    /// Number of lookups that found no cached reference.
    pub miss_count: u64,
    /// Number of references actually loaded from disk.
    ///
    /// Lower than `miss_count` when concurrent misses were coalesced.
    pub load_count: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// Cache of tile references for one data directory, keyed by file name.
pub struct TileReferenceCache {
    /// Directory containing the tile files.
    data_dir: PathBuf,
    /// Naming and loading rules for the tiles.
    format: Arc<dyn TileFormat>,
    /// Loaded references, keyed by file name (e.g. "N54W004.hgt").
    references: Cache<String, Arc<TileFileReference>>,
    idle_timeout: Duration,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    load_count: AtomicU64,
}

impl TileReferenceCache {
    /// Create an empty cache for the tiles in `data_dir`.
    pub fn new<P: AsRef<Path>>(
        data_dir: P,
        format: Arc<dyn TileFormat>,
        max_capacity: u64,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            format,
            references: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_idle(idle_timeout)
                .build(),
            idle_timeout,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            load_count: AtomicU64::new(0),
        }
    }

    /// Get the reference for tile file `name`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::DatasetNotFound`] if the file does not exist
    /// in the data directory, or the error from loading the reference.
    pub fn get_or_load(&self, name: &str) -> Result<Arc<TileFileReference>> {
        if let Some(reference) = self.references.get(name) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(tile = name, "Tile reference cache hit");
            return Ok(reference);
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(tile = name, "Tile reference cache miss");

        self.references
            .try_get_with(name.to_string(), || self.load(name))
            .map_err(|e| ElevationError::clone(&e))
    }

    /// Resolve the tiles needed for `coordinates`.
    ///
    /// Returns one reference per distinct tile file, in order of first use.
    /// Fails on the first tile that cannot be loaded.
    pub fn resolve_all(&self, coordinates: &[GeoCoordinate]) -> Result<Vec<Arc<TileFileReference>>> {
        let mut seen = HashSet::new();
        let mut references = Vec::new();

        for coordinate in coordinates {
            let name = self.format.name_for(coordinate);
            if !seen.insert(name.clone()) {
                continue;
            }
            references.push(self.get_or_load(&name)?);
        }

        Ok(references)
    }

    /// Whether a reference for `name` is currently cached.
    pub fn contains(&self, name: &str) -> bool {
        self.references.contains_key(name)
    }

    /// Remove the reference for `name`, if cached.
    pub fn invalidate(&self, name: &str) {
        self.references.invalidate(name);
    }

    /// Remove every cached reference.
    pub fn clear(&self) {
        self.references.invalidate_all();
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.references.entry_count(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            load_count: self.load_count.load(Ordering::Relaxed),
        }
    }

    /// Maximum number of cached references.
    pub fn capacity(&self) -> u64 {
        self.references.policy().max_capacity().unwrap_or(0)
    }

    /// Idle period after which an unused reference is evicted.
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Directory containing the tile files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The tile format used to name and load files.
    pub fn format(&self) -> &dyn TileFormat {
        self.format.as_ref()
    }

    fn load(&self, name: &str) -> Result<Arc<TileFileReference>> {
        self.load_count.fetch_add(1, Ordering::Relaxed);

        let path = self.data_dir.join(name);
        if !path.exists() {
            tracing::warn!(tile = name, path = %path.display(), "Dataset not available");
            return Err(ElevationError::DatasetNotFound {
                name: name.to_string(),
                path,
            });
        }

        let reference = self.format.load_reference(&path)?;
        tracing::debug!(
            tile = name,
            resolution = ?reference.resolution(),
            "Loaded tile reference"
        );

        Ok(Arc::new(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::format::HgtFormat;
    use std::sync::Barrier;
    use tempfile::TempDir;

    const SRTM3_SIZE: usize = 1201 * 1201 * 2;

    fn create_test_tile(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), vec![0u8; SRTM3_SIZE]).unwrap();
    }

    fn cache(dir: &Path, idle_timeout: Duration) -> TileReferenceCache {
        TileReferenceCache::new(dir, Arc::new(HgtFormat), 10, idle_timeout)
    }

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_miss_then_hit() {
        let dir = TempDir::new().unwrap();
        create_test_tile(dir.path(), "N54W004.hgt");
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);

        let first = cache.get_or_load("N54W004.hgt").unwrap();
        let second = cache.get_or_load("N54W004.hgt").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.load_count, 1);
        assert!(cache.contains("N54W004.hgt"));
    }

    #[test]
    fn test_missing_dataset() {
        let dir = TempDir::new().unwrap();
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);

        let err = cache.get_or_load("N54W004.hgt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(matches!(err, ElevationError::DatasetNotFound { .. }));
        assert!(!cache.contains("N54W004.hgt"));
    }

    #[test]
    fn test_failed_load_is_retried() {
        let dir = TempDir::new().unwrap();
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);

        assert!(cache.get_or_load("N54W004.hgt").is_err());

        create_test_tile(dir.path(), "N54W004.hgt");
        assert!(cache.get_or_load("N54W004.hgt").is_ok());
        assert_eq!(cache.stats().load_count, 2);
    }

    #[test]
    fn test_resolve_all_unique_in_order() {
        let dir = TempDir::new().unwrap();
        create_test_tile(dir.path(), "N54W004.hgt");
        create_test_tile(dir.path(), "N55W004.hgt");
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);

        let coords = [
            coord(55.5, -3.5),
            coord(54.4, -3.2),
            coord(55.1, -3.9),
            coord(54.9, -3.1),
        ];
        let references = cache.resolve_all(&coords).unwrap();

        assert_eq!(references.len(), 2);
        assert_eq!(references[0].south_west(), coord(55.0, -4.0));
        assert_eq!(references[1].south_west(), coord(54.0, -4.0));
        assert_eq!(cache.stats().load_count, 2);
    }

    #[test]
    fn test_resolve_all_fails_fast() {
        let dir = TempDir::new().unwrap();
        create_test_tile(dir.path(), "N54W004.hgt");
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);

        let coords = [coord(54.4, -3.2), coord(10.0, 10.0), coord(54.5, -3.5)];
        let err = cache.resolve_all(&coords).unwrap_err();

        match err {
            ElevationError::DatasetNotFound { name, .. } => assert_eq!(name, "N10E010.hgt"),
            other => panic!("Expected DatasetNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_all_empty() {
        let dir = TempDir::new().unwrap();
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);

        assert!(cache.resolve_all(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_misses_load_once() {
        let dir = TempDir::new().unwrap();
        create_test_tile(dir.path(), "N54W004.hgt");
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);
        let barrier = Barrier::new(8);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    cache.get_or_load("N54W004.hgt").unwrap();
                });
            }
        });

        let stats = cache.stats();
        assert_eq!(stats.load_count, 1);
        assert_eq!(stats.hit_count + stats.miss_count, 8);
    }

    #[test]
    fn test_idle_entries_expire() {
        let dir = TempDir::new().unwrap();
        create_test_tile(dir.path(), "N54W004.hgt");
        let cache = cache(dir.path(), Duration::from_millis(100));

        cache.get_or_load("N54W004.hgt").unwrap();
        std::thread::sleep(Duration::from_millis(400));
        cache.get_or_load("N54W004.hgt").unwrap();

        assert_eq!(cache.stats().load_count, 2);
    }

    #[test]
    fn test_hits_refresh_idle_window() {
        let dir = TempDir::new().unwrap();
        create_test_tile(dir.path(), "N54W004.hgt");
        let cache = cache(dir.path(), Duration::from_millis(500));

        cache.get_or_load("N54W004.hgt").unwrap();
        for _ in 0..8 {
            std::thread::sleep(Duration::from_millis(100));
            cache.get_or_load("N54W004.hgt").unwrap();
        }

        assert_eq!(cache.stats().load_count, 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let dir = TempDir::new().unwrap();
        create_test_tile(dir.path(), "N54W004.hgt");
        let cache = cache(dir.path(), DEFAULT_IDLE_TIMEOUT);

        cache.get_or_load("N54W004.hgt").unwrap();
        cache.invalidate("N54W004.hgt");
        cache.get_or_load("N54W004.hgt").unwrap();
        assert_eq!(cache.stats().load_count, 2);

        cache.clear();
        cache.get_or_load("N54W004.hgt").unwrap();
        assert_eq!(cache.stats().load_count, 3);
    }

    #[test]
    fn test_cache_stats() {
        let stats = CacheStats {
            entry_count: 5,
            hit_count: 80,
            miss_count: 20,
            load_count: 20,
        };
        assert_eq!(stats.hit_rate(), 0.8);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_configuration() {
        let dir = TempDir::new().unwrap();
        let cache = cache(dir.path(), Duration::from_secs(5));

        assert_eq!(cache.capacity(), 10);
        assert_eq!(cache.idle_timeout(), Duration::from_secs(5));
        assert_eq!(cache.data_dir(), dir.path());
        assert_eq!(cache.format().extension(), ".hgt");
    }
}
