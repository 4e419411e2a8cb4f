//! Bilinear interpolation.
//!
//! This method performs linear interpolation in two dimensions using
//! the four grid nodes around the query. The kernel works on raw samples of
//! any numeric type; decoding to real units happens afterwards, so dense and
//! quantized grids share exactly the same arithmetic.

use super::common::{linear_weight, CellPosition};

/// Blend the four raw samples around `cell` in a row-major array of width `nx`.
///
/// Computes `(1-fy)*((1-fx)*p00 + fx*p10) + fy*((1-fx)*p01 + fx*p11)`.
#[inline]
pub fn bilinear<T>(values: &[T], nx: usize, cell: &CellPosition) -> f64
where
    T: Copy + Into<f64>,
{
    let p0 = cell.grid_x + cell.grid_y * nx;
    let p1 = p0 + nx;
    let (wx0, wx1) = linear_weight(cell.fx);
    let (wy0, wy1) = linear_weight(cell.fy);
    wy0 * (wx0 * values[p0].into() + wx1 * values[p0 + 1].into())
        + wy1 * (wx0 * values[p1].into() + wx1 * values[p1 + 1].into())
}

/// Partial derivatives of the bilinear surface with respect to grid x and y,
/// in raw sample units per cell.
#[inline]
pub fn gradient<T>(values: &[T], nx: usize, cell: &CellPosition) -> [f64; 2]
where
    T: Copy + Into<f64>,
{
    let p0 = cell.grid_x + cell.grid_y * nx;
    let p1 = p0 + nx;
    let p00: f64 = values[p0].into();
    let p10: f64 = values[p0 + 1].into();
    let p01: f64 = values[p1].into();
    let p11: f64 = values[p1 + 1].into();
    let (wx0, wx1) = linear_weight(cell.fx);
    let (wy0, wy1) = linear_weight(cell.fy);
    [
        wy0 * (p10 - p00) + wy1 * (p11 - p01),
        wx0 * (p01 - p00) + wx1 * (p11 - p10),
    ]
}
