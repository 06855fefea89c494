//! # Elevation - HGT terrain tile lookups
//!
//! Answers "what is the ground elevation at this coordinate?" from a directory
//! of 1°×1° `.hgt` terrain tiles.
//!
//! ## Features
//!
//! - **Sparse reads**: a point query reads a single sample from disk, tiles
//!   are never loaded whole unless asked for ([`InMemoryTile`])
//! - **Automatic Detection**: tile resolution (1" or 3") comes from the file size
//! - **Batching**: a batch query opens each distinct tile once
//! - **Reference cache**: tile metadata is cached with a sliding idle window
//!
//! ## Quick Start
//!
//! ```ignore
//! use elevation::{ElevationService, GeoCoordinate};
//!
//! let service = ElevationService::builder("/data/hgt").build()?;
//! let point = service.elevation(&GeoCoordinate::new(54.454225, -3.211586)?)?;
//! println!("Elevation: {}m", point.elevation());
//! ```
//!
//! ## HGT Data Format
//!
//! Tiles are headerless grids of 16-bit big-endian signed integers,
//! row-major, rows ordered north to south and columns west to east:
//!
//! - **1 arc-second**: 3601×3601 samples (~30m)
//! - **3 arc-second**: 1201×1201 samples (~90m)
//!
//! The file name encodes the south-west corner, e.g. `N54W004.hgt`.
//! The special value -32768 indicates void (no data); it is returned as-is.

pub mod cache;
pub mod coordinate;
pub mod error;
pub mod filename;
pub mod format;
pub mod grid;
pub mod point;
pub mod resolution;
pub mod service;
pub mod tile;

// Re-export main types at crate root for convenience
pub use cache::{CacheStats, TileReferenceCache};
pub use coordinate::{parse_coordinate_list, GeoCoordinate};
pub use error::{ElevationError, ErrorKind, Result};
pub use format::{HgtFormat, TileFormat};
pub use grid::{InMemoryTile, TileStatistics};
pub use point::{ElevationPoint, ElevationProfilePoint};
pub use resolution::TileResolution;
pub use service::{BoundingBox, ElevationService, ElevationServiceBuilder, PreloadStats};
pub use tile::{TileFileReference, VOID_VALUE};
