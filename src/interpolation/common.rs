//! Cell location shared by the interpolation kernels.
//!
//! A query in grid space is split into the index of a base node and the
//! fractional position inside the cell that starts at that node.

/// Base node of the cell used for a query, and the position inside it.
///
/// `fx` and `fy` are usually in `[0, 1]`, but fall outside that range for
/// queries beyond the grid edge, which turns the kernel into a linear
/// extrapolation of the border cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPosition {
    pub grid_x: usize,
    pub grid_y: usize,
    pub fx: f64,
    pub fy: f64,
}

/// Locate the cell for fractional grid indices on an `nx` by `ny` grid.
///
/// The base index is clamped to `[0, n - 2]` so that a full 2x2
/// neighbourhood always exists. Fractions are measured from the clamped base.
#[inline]
pub fn locate_cell(gx: f64, gy: f64, nx: usize, ny: usize) -> CellPosition {
    let grid_x = clamp_cell(gx, nx);
    let grid_y = clamp_cell(gy, ny);
    CellPosition {
        grid_x,
        grid_y,
        fx: gx - grid_x as f64,
        fy: gy - grid_y as f64,
    }
}

/// Floor an index and clamp it to the first node of the last cell.
///
/// NaN maps to 0.
#[inline]
pub fn clamp_cell(index: f64, size: usize) -> usize {
    let last = size.saturating_sub(2) as i64;
    // `as` saturates for out-of-range floats.
    (index.floor() as i64).clamp(0, last) as usize
}

/// Get the weight for linear interpolation
pub fn linear_weight(fraction: f64) -> (f64, f64) {
    (1.0 - fraction, fraction)
}
