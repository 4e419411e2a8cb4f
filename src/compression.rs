//! Lossless re-encoding of dense grids as 16-bit fixed point.
//!
//! Compression is all-or-nothing: every sample of every dimension must survive
//! the round trip within the precision of the original `f32`, otherwise the
//! input grid is handed back untouched.

use ndarray::Array2;
use tracing::{debug, warn};

use crate::grid::{DenseGrid, GridStorage, QuantizedGrid};
use crate::numeric::{float_to_double, ulp};

/// Default quantization step, suited to offsets published with five
/// decimal digits.
pub const DEFAULT_SCALE: f64 = 1e-5;

/// Reusable compression settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Compressor {
    scale: f64,
    averages: Option<Vec<f64>>,
}

impl Compressor {
    /// A compressor with the given quantization step and computed averages.
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            averages: None,
        }
    }

    /// Use caller-supplied per-dimension averages instead of computing them.
    pub fn with_averages(mut self, averages: Vec<f64>) -> Self {
        self.averages = Some(averages);
        self
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Compress `grid`, or return it unchanged when it can not be represented
    /// without loss.
    pub fn compress(&self, grid: DenseGrid) -> GridStorage {
        compress(grid, self.averages.as_deref(), self.scale)
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}

/// Try to re-encode `grid` as a [`QuantizedGrid`].
///
/// Each value is stored as `round((v - average) / scale)` in an `i16`. When
/// `averages` is `None`, the average of each dimension is the mean offset
/// rounded to a multiple of `scale`. The attempt succeeds only if every sample
/// can be restored within one ULP of its `f32` value expressed in units of
/// `scale`; otherwise `GridStorage::Dense(grid)` is returned with the very same
/// sample buffers.
pub fn compress(grid: DenseGrid, averages: Option<&[f64]>, scale: f64) -> GridStorage {
    let dims = grid.shift_dimensions();
    if !(scale.is_finite() && scale > 0.0) {
        warn!(scale = scale, "Quantization scale must be finite and positive, keeping dense grid");
        return GridStorage::Dense(grid);
    }
    if let Some(averages) = averages {
        if averages.len() != dims {
            warn!(
                expected = dims,
                actual = averages.len(),
                "Averages do not match the shift dimensions, keeping dense grid"
            );
            return GridStorage::Dense(grid);
        }
    }

    let mut encoded = Vec::with_capacity(dims);
    let mut baselines = Vec::with_capacity(dims);
    for dim in 0..dims {
        // Baseline in quantization units, and the same baseline in offset units.
        let (average_q, average) = match averages {
            Some(averages) => (averages[dim] / scale, averages[dim]),
            None => {
                let steps = (grid.average_offset(dim) / scale).round_ties_even();
                (steps, steps * scale)
            }
        };
        match quantize(&grid.data()[dim], average_q, scale) {
            Some(samples) => encoded.push(samples),
            None => {
                debug!(
                    dimension = dim,
                    scale = scale,
                    "Grid values exceed 16-bit fixed-point precision, keeping dense grid"
                );
                return GridStorage::Dense(grid);
            }
        }
        baselines.push(average);
    }

    match QuantizedGrid::new(
        *grid.geometry(),
        grid.metadata().clone(),
        encoded,
        baselines,
        scale,
    ) {
        Ok(quantized) => {
            debug!(
                dimensions = dims,
                scale = scale,
                dense_bytes = grid.memory_usage(),
                quantized_bytes = quantized.memory_usage(),
                "Compressed datum shift grid"
            );
            GridStorage::Quantized(quantized)
        }
        // Unreachable with validated inputs, but never lose the grid.
        Err(e) => {
            warn!(error = %e, "Could not assemble quantized grid, keeping dense grid");
            GridStorage::Dense(grid)
        }
    }
}

/// Encode one dimension, or `None` as soon as a sample loses precision.
fn quantize(samples: &Array2<f32>, average_q: f64, scale: f64) -> Option<Array2<i16>> {
    let mut encoded = Vec::with_capacity(samples.len());
    for &value in samples.iter() {
        encoded.push(quantize_value(value, average_q, scale)?);
    }
    Array2::from_shape_vec(samples.raw_dim(), encoded).ok()
}

/// Quantize a single value, checking the residual against the value's own
/// precision.
#[inline]
fn quantize_value(value: f32, average_q: f64, scale: f64) -> Option<i16> {
    // Values usually come from decimal text and the scale is usually a power
    // of ten, so widening through the decimal representation keeps c exact.
    let mut c = float_to_double(value) / scale;
    let tolerance = ulp(c as f32) as f64;
    c -= average_q;
    let q = c.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16;
    let residual = c - q as f64;
    // Written so that NaN fails the check.
    if residual.abs() < tolerance {
        Some(q)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridGeometry, GridMetadata};

    fn dense(values: Vec<f32>) -> DenseGrid {
        let geometry = GridGeometry::new(3, 2, 0.0, 0.0, 1.0, 1.0).unwrap();
        DenseGrid::from_vecs(geometry, GridMetadata::default(), vec![values]).unwrap()
    }

    #[test]
    fn test_quantize_value_exact_decimal() {
        assert_eq!(quantize_value(0.00021, 0.0, 1e-5), Some(21));
        assert_eq!(quantize_value(0.00021, 20.0, 1e-5), Some(1));
        assert_eq!(quantize_value(-0.00513, 0.0, 1e-5), Some(-513));
    }

    #[test]
    fn test_quantize_value_rejects_extra_digits() {
        assert_eq!(quantize_value(0.123456, 0.0, 1e-5), None);
        assert_eq!(quantize_value(f32::NAN, 0.0, 1e-5), None);
    }

    #[test]
    fn test_quantize_value_rejects_overflow() {
        // 40000 steps do not fit in an i16
        assert_eq!(quantize_value(0.4, 0.0, 1e-5), None);
        assert_eq!(quantize_value(0.3, 0.0, 1e-5), Some(30000));
    }

    #[test]
    fn test_computed_average_is_multiple_of_scale() {
        let grid = dense(vec![0.00010, 0.00020, 0.00030, 0.00011, 0.00021, 0.00032]);
        let compressed = compress(grid, None, 1e-5);
        let GridStorage::Quantized(quantized) = compressed else {
            panic!("expected a quantized grid");
        };
        let steps = quantized.average_offset(0) / 1e-5;
        assert!((steps - steps.round()).abs() < 1e-9);
        assert!((quantized.average_offset(0) - 0.00021).abs() < 1e-12);
    }

    #[test]
    fn test_computed_average_ties_round_to_even() {
        // mean of 2.5 steps
        let grid = dense(vec![1.0, 2.0, 3.0, 4.0, 2.0, 3.0]);
        let GridStorage::Quantized(quantized) = compress(grid, None, 1.0) else {
            panic!("expected a quantized grid");
        };
        assert_eq!(quantized.averages(), &[2.0]);
        assert_eq!(quantized.data()[0].as_slice().unwrap(), &[-1i16, 0, 1, 2, 0, 1]);

        // mean of 3.5 steps
        let grid = dense(vec![2.0, 3.0, 4.0, 5.0, 3.0, 4.0]);
        let GridStorage::Quantized(quantized) = compress(grid, None, 1.0) else {
            panic!("expected a quantized grid");
        };
        assert_eq!(quantized.averages(), &[4.0]);
    }

    #[test]
    fn test_supplied_averages_used() {
        let grid = dense(vec![1.0, 1.5, 2.0, 2.5, 3.0, 3.5]);
        let compressed = Compressor::new(0.5).with_averages(vec![2.0]).compress(grid);
        let GridStorage::Quantized(quantized) = compressed else {
            panic!("expected a quantized grid");
        };
        assert_eq!(quantized.averages(), &[2.0]);
        assert_eq!(quantized.data()[0].as_slice().unwrap(), &[-2i16, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_invalid_inputs_keep_dense() {
        let grid = dense(vec![1.0, 1.5, 2.0, 2.5, 3.0, 3.5]);
        assert!(!compress(grid.clone(), None, 0.0).is_compressed());
        assert!(!compress(grid.clone(), None, f64::NAN).is_compressed());
        assert!(!compress(grid.clone(), Some(&[0.0, 0.0][..]), 0.5).is_compressed());
        assert!(compress(grid, Some(&[0.0][..]), 0.5).is_compressed());
    }

    #[test]
    fn test_default_compressor_scale() {
        assert_eq!(Compressor::default().scale(), DEFAULT_SCALE);
    }
}
