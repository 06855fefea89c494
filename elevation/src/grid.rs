//! Fully decoded tiles for dense access.

use std::fs::File;

use memmap2::Mmap;

use crate::coordinate::GeoCoordinate;
use crate::error::{ElevationError, Result};
use crate::resolution::BYTES_PER_SAMPLE;
use crate::tile::{TileFileReference, VOID_VALUE};

/// A tile decoded into memory.
///
/// Useful when many samples from one tile are needed: after [`load`](Self::load)
/// no further I/O happens. At one arc-second a tile holds ~13M samples
/// (~26MB), so prefer [`TileFileReference::elevation_at`] for sparse queries.
#[derive(Debug, Clone)]
pub struct InMemoryTile {
    reference: TileFileReference,
    samples: Vec<i16>,
}

/// Summary of the samples in a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStatistics {
    /// Lowest non-void elevation, `None` if every sample is void.
    pub min: Option<i16>,
    /// Highest non-void elevation, `None` if every sample is void.
    pub max: Option<i16>,
    /// Number of samples equal to [`VOID_VALUE`].
    pub void_count: u64,
}

impl InMemoryTile {
    /// Decode every sample of the referenced file.
    ///
    /// Samples are read in file order (row-major, north to south) as
    /// big-endian `i16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its size no longer
    /// matches the reference's resolution.
    pub fn load(reference: &TileFileReference) -> Result<Self> {
        let file = File::open(reference.path())?;

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. The file is opened read-only and the mapping is
        // dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file)? };

        let resolution = reference.resolution();
        if mmap.len() as u64 != resolution.file_size() {
            return Err(ElevationError::InvalidFileSize {
                size: mmap.len() as u64,
            });
        }

        let samples: Vec<i16> = mmap
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        tracing::debug!(
            path = %reference.path().display(),
            samples = samples.len(),
            "Decoded tile into memory"
        );

        Ok(Self {
            reference: reference.clone(),
            samples,
        })
    }

    /// Elevation at `coordinate` in metres, without touching the file.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::OutOfRange`] if the tile does not contain
    /// `coordinate`.
    pub fn elevation_at(&self, coordinate: &GeoCoordinate) -> Result<i16> {
        let index = self.reference.index_of(coordinate)?;
        Ok(self.samples[index])
    }

    /// The reference this tile was loaded from.
    pub fn reference(&self) -> &TileFileReference {
        &self.reference
    }

    /// An independent copy of every sample, in file order.
    pub fn samples(&self) -> Vec<i16> {
        self.samples.clone()
    }

    /// Number of samples in the tile.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false` for a loaded tile.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Min/max elevation and void count over the whole tile.
    pub fn statistics(&self) -> TileStatistics {
        let mut stats = TileStatistics {
            min: None,
            max: None,
            void_count: 0,
        };

        for &sample in &self.samples {
            if sample == VOID_VALUE {
                stats.void_count += 1;
                continue;
            }
            stats.min = Some(stats.min.map_or(sample, |m| m.min(sample)));
            stats.max = Some(stats.max.map_or(sample, |m| m.max(sample)));
        }

        stats
    }
}
