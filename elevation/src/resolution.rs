//! Tile resolution detection.
//!
//! HGT tiles carry no header; the resolution is implied by the number of
//! samples in the file.

use crate::error::{ElevationError, Result};

/// Samples per row/column for one arc-second tiles.
const ONE_ARC_SECOND_ROW_LENGTH: usize = 3601;

/// Samples per row/column for three arc-second tiles.
const THREE_ARC_SECOND_ROW_LENGTH: usize = 1201;

/// Bytes per sample (big-endian `i16`).
pub const BYTES_PER_SAMPLE: usize = 2;

/// Sampling resolution of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileResolution {
    /// 1 arc-second (~30m), 3601×3601 samples
    OneArcSecond,
    /// 3 arc-second (~90m), 1201×1201 samples
    ThreeArcSecond,
}

impl TileResolution {
    /// Detect the resolution from the number of samples in a tile.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::UnsupportedSampleCount`] unless `count` is
    /// exactly 3601² or 1201².
    pub fn from_sample_count(count: u64) -> Result<Self> {
        [TileResolution::OneArcSecond, TileResolution::ThreeArcSecond]
            .into_iter()
            .find(|resolution| resolution.sample_count() == count)
            .ok_or(ElevationError::UnsupportedSampleCount { count })
    }

    /// Detect the resolution from a tile's length in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::InvalidFileSize`] unless `size` is exactly
    /// `rowLength² × 2` for one of the known resolutions.
    pub fn from_file_size(size: u64) -> Result<Self> {
        if size % BYTES_PER_SAMPLE as u64 != 0 {
            return Err(ElevationError::InvalidFileSize { size });
        }

        Self::from_sample_count(size / BYTES_PER_SAMPLE as u64)
            .map_err(|_| ElevationError::InvalidFileSize { size })
    }

    /// Number of samples per row (and per column).
    pub fn row_length(&self) -> usize {
        match self {
            TileResolution::OneArcSecond => ONE_ARC_SECOND_ROW_LENGTH,
            TileResolution::ThreeArcSecond => THREE_ARC_SECOND_ROW_LENGTH,
        }
    }

    /// Total number of samples in a tile.
    pub fn sample_count(&self) -> u64 {
        let row_length = self.row_length() as u64;
        row_length * row_length
    }

    /// Expected tile file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.sample_count() * BYTES_PER_SAMPLE as u64
    }

    /// Arc-seconds between adjacent samples.
    pub fn arc_seconds(&self) -> u32 {
        match self {
            TileResolution::OneArcSecond => 1,
            TileResolution::ThreeArcSecond => 3,
        }
    }

    /// Approximate sample spacing in metres.
    pub fn meters(&self) -> f64 {
        match self {
            TileResolution::OneArcSecond => 30.0,
            TileResolution::ThreeArcSecond => 90.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sample_count() {
        let three = TileResolution::from_sample_count(1201 * 1201).unwrap();
        assert_eq!(three, TileResolution::ThreeArcSecond);
        assert_eq!(three.row_length(), 1201);

        let one = TileResolution::from_sample_count(3601 * 3601).unwrap();
        assert_eq!(one, TileResolution::OneArcSecond);
        assert_eq!(one.row_length(), 3601);
    }

    #[test]
    fn test_from_sample_count_rejects_other_sizes() {
        for count in [0, 1, 1201 * 1201 - 1, 1201 * 1201 + 1, 3601 * 1201, 2401 * 2401] {
            assert!(
                matches!(
                    TileResolution::from_sample_count(count),
                    Err(ElevationError::UnsupportedSampleCount { .. })
                ),
                "count {} should be rejected",
                count
            );
        }
    }

    #[test]
    fn test_from_file_size() {
        assert_eq!(
            TileResolution::from_file_size(2_884_802).unwrap(),
            TileResolution::ThreeArcSecond
        );
        assert_eq!(
            TileResolution::from_file_size(25_934_402).unwrap(),
            TileResolution::OneArcSecond
        );

        // One byte short of a full sample
        assert!(matches!(
            TileResolution::from_file_size(2_884_801),
            Err(ElevationError::InvalidFileSize { size: 2_884_801 })
        ));
        assert!(TileResolution::from_file_size(1000).is_err());
    }

    #[test]
    fn test_resolution_info() {
        assert_eq!(TileResolution::OneArcSecond.file_size(), 25_934_402);
        assert_eq!(TileResolution::ThreeArcSecond.file_size(), 2_884_802);
        assert_eq!(TileResolution::OneArcSecond.arc_seconds(), 1);
        assert_eq!(TileResolution::ThreeArcSecond.meters(), 90.0);
    }
}
