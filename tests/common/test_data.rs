//! Test data generation utilities.
//!
//! Grids with known values, built the way a loader would build them: from
//! decimal text parsed into `f32`.

use std::path::{Path, PathBuf};

use shiftgrid::grid_loader::save_grid;
use shiftgrid::{DenseGrid, GridGeometry, GridMetadata, Unit};

/// Parse decimal text the way an ASCII grid reader would.
pub fn parse(text: &str) -> f32 {
    text.parse().unwrap()
}

/// Unit cells starting at the origin.
pub fn unit_geometry(nx: usize, ny: usize) -> GridGeometry {
    GridGeometry::from_cell_size(0.0, 0.0, 1.0, 1.0, nx, ny).unwrap()
}

/// The 3x2 single-dimension grid used in the end-to-end scenario.
pub fn three_by_two_grid() -> DenseGrid {
    let values = ["0.00010", "0.00020", "0.00030", "0.00011", "0.00021", "0.00031"]
        .iter()
        .map(|text| parse(text))
        .collect();
    DenseGrid::from_vecs(unit_geometry(3, 2), GridMetadata::default(), vec![values]).unwrap()
}

/// A grid of arc-second shifts written with five decimal digits.
///
/// Values stay within ±0.15 of a per-dimension baseline, so they fit 16-bit
/// fixed point at a scale of 1e-5.
pub fn five_digit_grid(nx: usize, ny: usize, dims: usize) -> DenseGrid {
    let geometry = GridGeometry::from_cell_size(-100.0, 30.0, 0.25, 0.25, nx, ny).unwrap();
    let samples = (0..dims)
        .map(|dim| {
            (0..nx * ny)
                .map(|i| {
                    let steps = ((i * 7919 + dim * 104729) % 30000) as f64 - 15000.0;
                    let baseline = 1.5 - dim as f64;
                    parse(&format!("{:.5}", baseline + steps * 1e-5))
                })
                .collect()
        })
        .collect();
    let metadata = GridMetadata::from_file("synthetic.gsb", Unit::ArcSecond);
    DenseGrid::from_vecs(geometry, metadata, samples).unwrap()
}

/// Two dimensions, each an exact plane in grid coordinates.
///
/// Dimension 0 is `gx + 10 * gy`, dimension 1 is `-2 * gx`.
pub fn plane_grid(nx: usize, ny: usize) -> DenseGrid {
    let mut d0 = Vec::with_capacity(nx * ny);
    let mut d1 = Vec::with_capacity(nx * ny);
    for gy in 0..ny {
        for gx in 0..nx {
            d0.push((gx + 10 * gy) as f32);
            d1.push(-2.0 * gx as f32);
        }
    }
    DenseGrid::from_vecs(unit_geometry(nx, ny), GridMetadata::default(), vec![d0, d1]).unwrap()
}

/// Write a grid document into `dir` and return its path.
pub fn write_grid_file(dir: &Path, name: &str, grid: &DenseGrid) -> PathBuf {
    let path = dir.join(name);
    save_grid(grid, &path).unwrap();
    path
}
