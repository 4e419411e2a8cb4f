//! Interpolation of grid samples at fractional positions.
//!
//! [`common::locate_cell`] turns grid-space coordinates into a clamped base
//! node and in-cell fractions; [`bilinear::bilinear`] blends the four raw
//! samples of that cell.

pub mod bilinear;
pub mod common;

pub use bilinear::{bilinear, gradient};
pub use common::{locate_cell, CellPosition};
