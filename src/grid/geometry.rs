//! Affine mapping between real-world coordinates and grid indices.

use std::hash::{Hash, Hasher};

use crate::error::{Result, ShiftGridError};
use crate::numeric::same_bits;

/// Placement of a regular grid in source coordinates.
///
/// `scale_x` and `scale_y` are stored as cells per coordinate unit, the
/// reciprocal of the cell size, so that the hot path multiplies instead of
/// dividing.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    nx: usize,
    ny: usize,
    x0: f64,
    y0: f64,
    scale_x: f64,
    scale_y: f64,
}

impl GridGeometry {
    /// Create a geometry from an origin and per-axis scales (cells per unit).
    pub fn new(nx: usize, ny: usize, x0: f64, y0: f64, scale_x: f64, scale_y: f64) -> Result<Self> {
        if nx < 2 || ny < 2 {
            return Err(ShiftGridError::InvalidGeometry {
                message: format!(
                    "Grid must have at least 2x2 nodes for interpolation, got {}x{}",
                    nx, ny
                ),
            });
        }
        if nx.checked_mul(ny).is_none() {
            return Err(ShiftGridError::InvalidGeometry {
                message: format!("Grid size {}x{} overflows", nx, ny),
            });
        }
        if !x0.is_finite() || !y0.is_finite() {
            return Err(ShiftGridError::InvalidGeometry {
                message: format!("Grid origin ({}, {}) must be finite", x0, y0),
            });
        }
        for (axis, scale) in [("x", scale_x), ("y", scale_y)] {
            if !scale.is_finite() || scale == 0.0 {
                return Err(ShiftGridError::InvalidGeometry {
                    message: format!("Scale along {} must be finite and nonzero, got {}", axis, scale),
                });
            }
        }
        Ok(Self {
            nx,
            ny,
            x0,
            y0,
            scale_x,
            scale_y,
        })
    }

    /// Create a geometry from the size of a cell in coordinate units.
    ///
    /// Negative sizes are allowed for grids whose rows or columns run
    /// towards decreasing coordinates.
    pub fn from_cell_size(
        x0: f64,
        y0: f64,
        cell_width: f64,
        cell_height: f64,
        nx: usize,
        ny: usize,
    ) -> Result<Self> {
        if cell_width == 0.0 || cell_height == 0.0 {
            return Err(ShiftGridError::InvalidGeometry {
                message: format!(
                    "Cell size must be nonzero, got {} x {}",
                    cell_width, cell_height
                ),
            });
        }
        Self::new(nx, ny, x0, y0, 1.0 / cell_width, 1.0 / cell_height)
    }

    /// Number of nodes along x.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of nodes along y.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Coordinate of node (0, 0).
    pub fn origin(&self) -> (f64, f64) {
        (self.x0, self.y0)
    }

    /// Cells per coordinate unit along each axis.
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Size of a cell in coordinate units.
    pub fn cell_size(&self) -> (f64, f64) {
        (1.0 / self.scale_x, 1.0 / self.scale_y)
    }

    /// Total number of nodes, which is the length of every sample array.
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Row-major index of a node.
    #[inline]
    pub fn index(&self, grid_x: usize, grid_y: usize) -> usize {
        grid_x + grid_y * self.nx
    }

    /// Convert a source coordinate to fractional grid indices.
    #[inline]
    pub fn to_grid_space(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.x0) * self.scale_x, (y - self.y0) * self.scale_y)
    }

    /// Convert fractional grid indices back to a source coordinate.
    pub fn to_coordinate_space(&self, grid_x: f64, grid_y: f64) -> (f64, f64) {
        (
            grid_x / self.scale_x + self.x0,
            grid_y / self.scale_y + self.y0,
        )
    }

    /// Bounding box `(xmin, ymin, xmax, ymax)` of the grid nodes.
    pub fn domain(&self) -> (f64, f64, f64, f64) {
        let (xa, ya) = self.to_coordinate_space(0.0, 0.0);
        let (xb, yb) = self.to_coordinate_space((self.nx - 1) as f64, (self.ny - 1) as f64);
        (xa.min(xb), ya.min(yb), xa.max(xb), ya.max(yb))
    }

    /// Whether a coordinate lies inside the nodes' bounding box.
    ///
    /// Queries outside the domain are still answered by extrapolation.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (xmin, ymin, xmax, ymax) = self.domain();
        x >= xmin && x <= xmax && y >= ymin && y <= ymax
    }
}

impl PartialEq for GridGeometry {
    fn eq(&self, other: &Self) -> bool {
        self.nx == other.nx
            && self.ny == other.ny
            && same_bits(self.x0, other.x0)
            && same_bits(self.y0, other.y0)
            && same_bits(self.scale_x, other.scale_x)
            && same_bits(self.scale_y, other.scale_y)
    }
}

impl Eq for GridGeometry {}

impl Hash for GridGeometry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nx.hash(state);
        self.ny.hash(state);
        self.x0.to_bits().hash(state);
        self.y0.to_bits().hash(state);
        self.scale_x.to_bits().hash(state);
        self.scale_y.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_grids() {
        assert!(GridGeometry::new(1, 5, 0.0, 0.0, 1.0, 1.0).is_err());
        assert!(GridGeometry::new(5, 1, 0.0, 0.0, 1.0, 1.0).is_err());
        assert!(GridGeometry::new(2, 2, 0.0, 0.0, 0.0, 1.0).is_err());
        assert!(GridGeometry::new(2, 2, 0.0, 0.0, 1.0, f64::NAN).is_err());
        assert!(GridGeometry::new(2, 2, f64::INFINITY, 0.0, 1.0, 1.0).is_err());
        assert!(GridGeometry::from_cell_size(0.0, 0.0, 0.0, 1.0, 3, 3).is_err());
        assert!(GridGeometry::new(2, 2, 0.0, 0.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_grid_space_round_trip() {
        let geometry = GridGeometry::from_cell_size(-10.0, 40.0, 0.25, 0.5, 9, 5).unwrap();
        let (gx, gy) = geometry.to_grid_space(-9.5, 41.0);
        assert!((gx - 2.0).abs() < 1e-12);
        assert!((gy - 2.0).abs() < 1e-12);

        let (x, y) = geometry.to_coordinate_space(gx, gy);
        assert!((x + 9.5).abs() < 1e-12);
        assert!((y - 41.0).abs() < 1e-12);
    }

    #[test]
    fn test_domain_with_negative_cell_height() {
        let geometry = GridGeometry::from_cell_size(0.0, 10.0, 1.0, -1.0, 3, 4).unwrap();
        assert_eq!(geometry.domain(), (0.0, 7.0, 2.0, 10.0));
        assert!(geometry.contains(1.0, 8.0));
        assert!(!geometry.contains(1.0, 11.0));
    }

    #[test]
    fn test_index_is_row_major() {
        let geometry = GridGeometry::new(4, 3, 0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(geometry.index(0, 0), 0);
        assert_eq!(geometry.index(3, 0), 3);
        assert_eq!(geometry.index(1, 2), 9);
        assert_eq!(geometry.cell_count(), 12);
    }

    #[test]
    fn test_equality_uses_bit_patterns() {
        let a = GridGeometry::new(3, 3, 0.0, 0.0, 1.0, 1.0).unwrap();
        let b = GridGeometry::new(3, 3, -0.0, 0.0, 1.0, 1.0).unwrap();
        let c = GridGeometry::new(3, 3, 0.0, 0.0, 1.0, 1.0).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
