//! Uncompressed grids holding `f32` offsets.

use ndarray::Array2;
use once_cell::sync::OnceCell;
use std::hash::{Hash, Hasher};

use super::geometry::GridGeometry;
use super::metadata::GridMetadata;
use super::{check_samples, sample_slice};
use crate::error::Result;
use crate::interpolation::{bilinear, gradient, CellPosition};
use crate::numeric::float_to_double;

/// A datum shift grid with one `f32` array per shift dimension.
///
/// Arrays have shape `(ny, nx)` in standard (row-major) layout, so the flat
/// index of node `(gx, gy)` is `gx + gy * nx`.
#[derive(Debug, Clone)]
pub struct DenseGrid {
    geometry: GridGeometry,
    metadata: GridMetadata,
    data: Vec<Array2<f32>>,
    averages: OnceCell<Vec<f64>>,
}

impl DenseGrid {
    /// Build a grid, taking ownership of the sample arrays.
    pub fn new(geometry: GridGeometry, metadata: GridMetadata, data: Vec<Array2<f32>>) -> Result<Self> {
        let data = check_samples(&geometry, data)?;
        Ok(Self {
            geometry,
            metadata,
            data,
            averages: OnceCell::new(),
        })
    }

    /// Build a grid from flat row-major vectors, one per dimension.
    pub fn from_vecs(geometry: GridGeometry, metadata: GridMetadata, samples: Vec<Vec<f32>>) -> Result<Self> {
        let data = super::arrays_from_vecs(&geometry, samples)?;
        Self::new(geometry, metadata, data)
    }

    /// A new grid with the same geometry and metadata but different samples.
    pub fn with_data(&self, data: Vec<Array2<f32>>) -> Result<Self> {
        Self::new(self.geometry, self.metadata.clone(), data)
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    /// Sample arrays, one per dimension.
    pub fn data(&self) -> &[Array2<f32>] {
        &self.data
    }

    pub fn shift_dimensions(&self) -> usize {
        self.data.len()
    }

    /// Arithmetic mean of every sample in a dimension.
    ///
    /// Samples are widened through their decimal form, the same way the
    /// compressor reads them.
    ///
    /// Computed for all dimensions on first use and kept for the lifetime of
    /// the grid.
    pub fn average_offset(&self, dim: usize) -> f64 {
        let averages = self.averages.get_or_init(|| {
            self.data
                .iter()
                .map(|samples| {
                    let sum: f64 = samples.iter().map(|&v| float_to_double(v)).sum();
                    sum / samples.len() as f64
                })
                .collect()
        });
        averages[dim]
    }

    /// Offset stored at an exact node.
    pub fn cell_value(&self, dim: usize, grid_x: usize, grid_y: usize) -> f64 {
        self.data[dim][[grid_y, grid_x]] as f64
    }

    pub(crate) fn interpolate_cell(&self, cell: &CellPosition, offsets: &mut [f64]) {
        let nx = self.geometry.nx();
        for (offset, samples) in offsets.iter_mut().zip(&self.data) {
            *offset = bilinear(sample_slice(samples), nx, cell);
        }
    }

    pub(crate) fn gradient_cell(&self, cell: &CellPosition) -> Vec<[f64; 2]> {
        let nx = self.geometry.nx();
        self.data
            .iter()
            .map(|samples| gradient(sample_slice(samples), nx, cell))
            .collect()
    }

    /// Bytes used by the sample arrays.
    pub fn memory_usage(&self) -> usize {
        self.data.iter().map(|a| a.len() * std::mem::size_of::<f32>()).sum()
    }

}

impl PartialEq for DenseGrid {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.metadata == other.metadata
            && self.data.len() == other.data.len()
            && self.data.iter().zip(&other.data).all(|(a, b)| {
                a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.to_bits() == y.to_bits())
            })
    }
}

impl Eq for DenseGrid {}

impl Hash for DenseGrid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.geometry.hash(state);
        self.metadata.hash(state);
        for samples in &self.data {
            for value in samples.iter() {
                value.to_bits().hash(state);
            }
        }
    }
}
