//! Datum shift grids.
//!
//! A [`GridStorage`] is either a [`DenseGrid`] of `f32` samples or a
//! [`QuantizedGrid`] of `i16` samples. Both answer the same queries with the
//! same bilinear arithmetic, so callers never need to know which one they hold.
//! Grids are immutable once built and can be shared across threads behind an
//! `Arc`.

pub mod dense;
pub mod geometry;
pub mod metadata;
pub mod quantized;

use ndarray::Array2;

pub use dense::DenseGrid;
pub use geometry::GridGeometry;
pub use metadata::{GridMetadata, Unit};
pub use quantized::QuantizedGrid;

use crate::error::{Result, ShiftGridError};
use crate::interpolation::{locate_cell, CellPosition};

/// A datum shift grid in one of its two representations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GridStorage {
    /// `f32` samples used as-is
    Dense(DenseGrid),
    /// `i16` samples decoded as `sample * scale + average[dim]`
    Quantized(QuantizedGrid),
}

impl GridStorage {
    pub fn geometry(&self) -> &GridGeometry {
        match self {
            GridStorage::Dense(grid) => grid.geometry(),
            GridStorage::Quantized(grid) => grid.geometry(),
        }
    }

    pub fn metadata(&self) -> &GridMetadata {
        match self {
            GridStorage::Dense(grid) => grid.metadata(),
            GridStorage::Quantized(grid) => grid.metadata(),
        }
    }

    /// Whether samples are stored as 16-bit fixed point.
    pub fn is_compressed(&self) -> bool {
        matches!(self, GridStorage::Quantized(_))
    }

    /// Number of offset components per node.
    pub fn shift_dimensions(&self) -> usize {
        match self {
            GridStorage::Dense(grid) => grid.shift_dimensions(),
            GridStorage::Quantized(grid) => grid.shift_dimensions(),
        }
    }

    /// A value close to the average offset in the given dimension.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= self.shift_dimensions()`.
    pub fn average_offset(&self, dim: usize) -> f64 {
        match self {
            GridStorage::Dense(grid) => grid.average_offset(dim),
            GridStorage::Quantized(grid) => grid.average_offset(dim),
        }
    }

    /// Decoded offset at an exact node.
    ///
    /// # Panics
    ///
    /// Panics if `dim`, `grid_x` or `grid_y` is out of range.
    pub fn cell_value(&self, dim: usize, grid_x: usize, grid_y: usize) -> f64 {
        match self {
            GridStorage::Dense(grid) => grid.cell_value(dim, grid_x, grid_y),
            GridStorage::Quantized(grid) => grid.cell_value(dim, grid_x, grid_y),
        }
    }

    /// Interpolated offsets at a source coordinate, one per shift dimension.
    ///
    /// Defined everywhere: coordinates outside the grid are extrapolated from
    /// the nearest border cell.
    pub fn offset_at(&self, x: f64, y: f64) -> Vec<f64> {
        let mut offsets = vec![0.0; self.shift_dimensions()];
        self.offset_into(x, y, &mut offsets);
        offsets
    }

    /// Like [`offset_at`](Self::offset_at), writing into a caller buffer.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is shorter than [`shift_dimensions`](Self::shift_dimensions).
    pub fn offset_into(&self, x: f64, y: f64, offsets: &mut [f64]) {
        let (gx, gy) = self.geometry().to_grid_space(x, y);
        self.interpolate_in_cell(gx, gy, offsets);
    }

    /// Interpolated offsets at fractional grid indices.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is shorter than [`shift_dimensions`](Self::shift_dimensions).
    pub fn interpolate_in_cell(&self, grid_x: f64, grid_y: f64, offsets: &mut [f64]) {
        let dims = self.shift_dimensions();
        assert!(
            offsets.len() >= dims,
            "offset buffer holds {} values, grid has {} dimensions",
            offsets.len(),
            dims
        );
        let cell = self.locate(grid_x, grid_y);
        match self {
            GridStorage::Dense(grid) => grid.interpolate_cell(&cell, &mut offsets[..dims]),
            GridStorage::Quantized(grid) => grid.interpolate_cell(&cell, &mut offsets[..dims]),
        }
    }

    /// Partial derivatives `[d/dgx, d/dgy]` of each interpolated offset,
    /// in offset units per cell, at fractional grid indices.
    pub fn derivative_in_cell(&self, grid_x: f64, grid_y: f64) -> Vec<[f64; 2]> {
        let cell = self.locate(grid_x, grid_y);
        match self {
            GridStorage::Dense(grid) => grid.gradient_cell(&cell),
            GridStorage::Quantized(grid) => grid.gradient_cell(&cell),
        }
    }

    /// Estimated precision of a cell value, when known.
    ///
    /// The metadata accuracy wins; a quantized grid without one reports half
    /// of its quantization step.
    pub fn cell_precision(&self) -> Option<f64> {
        match (self.metadata().accuracy, self) {
            (Some(accuracy), _) => Some(accuracy),
            (None, GridStorage::Quantized(grid)) => Some(grid.scale() / 2.0),
            (None, GridStorage::Dense(_)) => None,
        }
    }

    /// Bytes used by the sample arrays.
    pub fn memory_usage(&self) -> usize {
        match self {
            GridStorage::Dense(grid) => grid.memory_usage(),
            GridStorage::Quantized(grid) => grid.memory_usage(),
        }
    }

    fn locate(&self, grid_x: f64, grid_y: f64) -> CellPosition {
        let geometry = self.geometry();
        locate_cell(grid_x, grid_y, geometry.nx(), geometry.ny())
    }
}

impl From<DenseGrid> for GridStorage {
    fn from(grid: DenseGrid) -> Self {
        GridStorage::Dense(grid)
    }
}

impl From<QuantizedGrid> for GridStorage {
    fn from(grid: QuantizedGrid) -> Self {
        GridStorage::Quantized(grid)
    }
}

/// Validate sample arrays against a geometry, converting any array not in
/// standard layout so that it can be read as a flat row-major slice.
/// Arrays already in standard layout are returned untouched.
fn check_samples<T: Clone>(geometry: &GridGeometry, data: Vec<Array2<T>>) -> Result<Vec<Array2<T>>> {
    if data.is_empty() {
        return Err(ShiftGridError::DataShape {
            message: "A grid needs at least one shift dimension".to_string(),
        });
    }
    let expected = [geometry.ny(), geometry.nx()];
    data.into_iter()
        .enumerate()
        .map(|(dim, samples)| {
            if samples.shape() != expected {
                return Err(ShiftGridError::DataShape {
                    message: format!(
                        "Dimension {} has shape {:?}, expected {:?} (ny, nx)",
                        dim,
                        samples.shape(),
                        expected
                    ),
                });
            }
            if samples.is_standard_layout() {
                Ok(samples)
            } else {
                Ok(samples.as_standard_layout().into_owned())
            }
        })
        .collect()
}

/// Reshape flat row-major vectors into `(ny, nx)` arrays.
fn arrays_from_vecs<T>(geometry: &GridGeometry, samples: Vec<Vec<T>>) -> Result<Vec<Array2<T>>> {
    let shape = (geometry.ny(), geometry.nx());
    samples
        .into_iter()
        .enumerate()
        .map(|(dim, values)| {
            let len = values.len();
            Array2::from_shape_vec(shape, values).map_err(|_| ShiftGridError::DataShape {
                message: format!(
                    "Dimension {} has {} samples, expected {} ({}x{})",
                    dim,
                    len,
                    shape.0 * shape.1,
                    shape.1,
                    shape.0
                ),
            })
        })
        .collect()
}

/// Flat row-major view of a sample array.
#[inline]
fn sample_slice<T>(samples: &Array2<T>) -> &[T] {
    samples
        .as_slice()
        .expect("sample arrays are kept in standard layout")
}
