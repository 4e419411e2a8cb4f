//! # shiftgrid
//!
//! Datum shift grids: regular grids of coordinate offsets used to move
//! coordinates between two geodetic reference frames.
//!
//! This library provides the grid value type, a lossless 16-bit compression
//! of its samples, and the bilinear interpolation used during datum
//! transformations.
//!
//! ## Key Features
//!
//! - **Two representations, one behaviour**: [`DenseGrid`] keeps `f32` samples,
//!   [`QuantizedGrid`] keeps `i16` samples plus a scale and per-dimension averages;
//!   both are queried through [`GridStorage`]
//! - **All-or-nothing compression**: [`compression::compress`] only quantizes a
//!   grid when no sample loses precision, and otherwise returns the input as is
//! - **Total interpolation**: [`GridStorage::offset_at`] answers any coordinate,
//!   extrapolating linearly beyond the grid edges
//!
//! ## Example
//!
//! ```
//! use shiftgrid::{compression, DenseGrid, GridGeometry, GridMetadata};
//!
//! let geometry = GridGeometry::from_cell_size(0.0, 0.0, 1.0, 1.0, 3, 2)?;
//! let values = vec![0.00010, 0.00020, 0.00030, 0.00011, 0.00021, 0.00031];
//! let grid = DenseGrid::from_vecs(geometry, GridMetadata::default(), vec![values])?;
//!
//! let grid = compression::compress(grid, None, 1e-5);
//! assert!(grid.is_compressed());
//!
//! let offsets = grid.offset_at(1.0, 0.5);
//! assert!((offsets[0] - 0.000205).abs() < 1e-12);
//! # Ok::<(), shiftgrid::ShiftGridError>(())
//! ```

pub mod compression;
pub mod config;
pub mod error;
pub mod grid;
pub mod grid_loader;
pub mod interpolation;
pub mod logging;
pub mod numeric;

pub use compression::{compress, Compressor};
pub use config::Config;
pub use error::{Result, ShiftGridError};
pub use grid::{DenseGrid, GridGeometry, GridMetadata, GridStorage, QuantizedGrid, Unit};
pub use logging::{
    init_tracing, log_error, log_grid_load_stats, log_query_end, log_query_start,
    log_timed_operation,
};
