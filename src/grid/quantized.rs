//! Grids stored as 16-bit fixed point.
//!
//! Each node holds `(value - average[dim]) / scale` rounded to an `i16`. Besides
//! halving memory, this often recovers precision: offsets published with at
//! most five decimal digits are represented exactly once `scale` is the
//! matching power of ten, where an `f32` could only approximate them.

use ndarray::Array2;
use std::hash::{Hash, Hasher};

use super::geometry::GridGeometry;
use super::metadata::GridMetadata;
use super::{check_samples, sample_slice};
use crate::error::{Result, ShiftGridError};
use crate::interpolation::{bilinear, gradient, CellPosition};
use crate::numeric::same_bits;

/// A datum shift grid with `i16` samples, per-dimension averages and a scale
/// shared by all dimensions.
#[derive(Debug, Clone)]
pub struct QuantizedGrid {
    geometry: GridGeometry,
    metadata: GridMetadata,
    data: Vec<Array2<i16>>,
    averages: Vec<f64>,
    scale: f64,
}

impl QuantizedGrid {
    /// Build a grid from already quantized samples.
    ///
    /// Grids are normally obtained from [`crate::compression::compress`],
    /// which also checks that no precision was lost.
    pub fn new(
        geometry: GridGeometry,
        metadata: GridMetadata,
        data: Vec<Array2<i16>>,
        averages: Vec<f64>,
        scale: f64,
    ) -> Result<Self> {
        let data = check_samples(&geometry, data)?;
        if averages.len() != data.len() {
            return Err(ShiftGridError::DataShape {
                message: format!(
                    "Expected {} averages, one per dimension, got {}",
                    data.len(),
                    averages.len()
                ),
            });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ShiftGridError::InvalidParameter {
                param: "scale".to_string(),
                message: format!("Quantization scale must be finite and positive, got {}", scale),
            });
        }
        Ok(Self {
            geometry,
            metadata,
            data,
            averages,
            scale,
        })
    }

    /// A new grid with the same geometry, metadata, averages and scale but
    /// different samples.
    pub fn with_data(&self, data: Vec<Array2<i16>>) -> Result<Self> {
        Self::new(
            self.geometry,
            self.metadata.clone(),
            data,
            self.averages.clone(),
            self.scale,
        )
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    /// Quantized samples, one array per dimension.
    pub fn data(&self) -> &[Array2<i16>] {
        &self.data
    }

    /// Factor applied to every sample before adding the average.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Per-dimension baselines, each a multiple of the scale when computed by
    /// the compressor.
    pub fn averages(&self) -> &[f64] {
        &self.averages
    }

    pub fn shift_dimensions(&self) -> usize {
        self.data.len()
    }

    pub fn average_offset(&self, dim: usize) -> f64 {
        self.averages[dim]
    }

    pub fn cell_value(&self, dim: usize, grid_x: usize, grid_y: usize) -> f64 {
        self.data[dim][[grid_y, grid_x]] as f64 * self.scale + self.averages[dim]
    }

    pub(crate) fn interpolate_cell(&self, cell: &CellPosition, offsets: &mut [f64]) {
        let nx = self.geometry.nx();
        for ((offset, samples), average) in offsets.iter_mut().zip(&self.data).zip(&self.averages) {
            *offset = bilinear(sample_slice(samples), nx, cell) * self.scale + average;
        }
    }

    pub(crate) fn gradient_cell(&self, cell: &CellPosition) -> Vec<[f64; 2]> {
        let nx = self.geometry.nx();
        self.data
            .iter()
            .map(|samples| {
                let [dx, dy] = gradient(sample_slice(samples), nx, cell);
                [dx * self.scale, dy * self.scale]
            })
            .collect()
    }

    pub fn memory_usage(&self) -> usize {
        self.data.iter().map(|a| a.len() * std::mem::size_of::<i16>()).sum()
    }
}

impl PartialEq for QuantizedGrid {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.metadata == other.metadata
            && self.data == other.data
            && same_bits(self.scale, other.scale)
            && self.averages.len() == other.averages.len()
            && self
                .averages
                .iter()
                .zip(&other.averages)
                .all(|(&a, &b)| same_bits(a, b))
    }
}

impl Eq for QuantizedGrid {}

impl Hash for QuantizedGrid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.geometry.hash(state);
        self.metadata.hash(state);
        self.data.hash(state);
        self.scale.to_bits().hash(state);
        for average in &self.averages {
            average.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> GridGeometry {
        GridGeometry::new(2, 2, 0.0, 0.0, 1.0, 1.0).unwrap()
    }

    fn samples() -> Vec<Array2<i16>> {
        vec![Array2::from_shape_vec((2, 2), vec![-2, 0, 1, 3]).unwrap()]
    }

    #[test]
    fn test_cell_value_decodes() {
        let grid =
            QuantizedGrid::new(geometry(), GridMetadata::default(), samples(), vec![0.5], 0.25).unwrap();
        assert_eq!(grid.cell_value(0, 0, 0), 0.0);
        assert_eq!(grid.cell_value(0, 1, 0), 0.5);
        assert_eq!(grid.cell_value(0, 0, 1), 0.75);
        assert_eq!(grid.cell_value(0, 1, 1), 1.25);
        assert_eq!(grid.average_offset(0), 0.5);
    }

    #[test]
    fn test_rejects_inconsistent_parameters() {
        let metadata = GridMetadata::default();
        assert!(QuantizedGrid::new(geometry(), metadata.clone(), samples(), vec![], 0.25).is_err());
        assert!(QuantizedGrid::new(geometry(), metadata.clone(), samples(), vec![0.0], 0.0).is_err());
        assert!(
            QuantizedGrid::new(geometry(), metadata.clone(), samples(), vec![0.0], f64::NAN).is_err()
        );
        assert!(QuantizedGrid::new(
            geometry(),
            metadata,
            vec![Array2::zeros((3, 2))],
            vec![0.0],
            1.0
        )
        .is_err());
    }

    #[test]
    fn test_with_data_keeps_parameters() {
        let grid =
            QuantizedGrid::new(geometry(), GridMetadata::default(), samples(), vec![0.5], 0.25).unwrap();
        let copy = grid.with_data(vec![Array2::from_elem((2, 2), 4)]).unwrap();
        assert_eq!(copy.scale(), grid.scale());
        assert_eq!(copy.averages(), grid.averages());
        assert_eq!(copy.cell_value(0, 1, 1), 1.5);
        assert_ne!(copy, grid);
    }

    #[test]
    fn test_half_the_memory_of_f32() {
        let grid =
            QuantizedGrid::new(geometry(), GridMetadata::default(), samples(), vec![0.5], 0.25).unwrap();
        assert_eq!(grid.memory_usage(), 8);
    }
}
