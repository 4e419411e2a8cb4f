//! JSON interchange for dense grids.
//!
//! Real grid formats (NTv2, NADCON, ...) are read elsewhere; this module only
//! moves an already decoded grid in and out of a small JSON document so that
//! the command-line tool and tests have something to feed the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, ShiftGridError};
use crate::grid::{DenseGrid, GridGeometry, GridMetadata};

/// Placement of the grid, described by cell size rather than scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryDocument {
    pub nx: usize,
    pub ny: usize,
    pub x0: f64,
    pub y0: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

/// A dense grid as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDocument {
    pub geometry: GeometryDocument,

    #[serde(default)]
    pub metadata: GridMetadata,

    /// One row-major array of `nx * ny` values per shift dimension
    pub samples: Vec<Vec<f32>>,
}

impl GridDocument {
    /// Describe an existing grid.
    pub fn from_grid(grid: &DenseGrid) -> Self {
        let geometry = grid.geometry();
        let (x0, y0) = geometry.origin();
        let (cell_width, cell_height) = geometry.cell_size();
        Self {
            geometry: GeometryDocument {
                nx: geometry.nx(),
                ny: geometry.ny(),
                x0,
                y0,
                cell_width,
                cell_height,
            },
            metadata: grid.metadata().clone(),
            samples: grid.data().iter().map(|a| a.iter().copied().collect()).collect(),
        }
    }

    /// Validate the document and build the grid it describes.
    pub fn into_grid(self) -> Result<DenseGrid> {
        let g = &self.geometry;
        let geometry =
            GridGeometry::from_cell_size(g.x0, g.y0, g.cell_width, g.cell_height, g.nx, g.ny)?;
        DenseGrid::from_vecs(geometry, self.metadata, self.samples)
    }
}

/// Load a grid document from a JSON file.
///
/// When the document lists no source files, the path it was read from is
/// recorded in the grid metadata.
pub fn load_grid(path: &Path) -> Result<DenseGrid> {
    if !path.exists() {
        return Err(ShiftGridError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let mut document: GridDocument = serde_json::from_str(&content)?;
    debug!(
        "Parsed grid document {} with {} dimensions",
        path.display(),
        document.samples.len()
    );

    if document.metadata.files.is_empty() {
        document.metadata.files.push(path.to_path_buf());
    }

    let grid = document.into_grid()?;
    info!(
        "Loaded {}x{} grid from {}",
        grid.geometry().nx(),
        grid.geometry().ny(),
        path.display()
    );
    Ok(grid)
}

/// Write a grid document as pretty-printed JSON.
pub fn save_grid(grid: &DenseGrid, path: &Path) -> Result<()> {
    let document = GridDocument::from_grid(grid);
    let json = serde_json::to_string_pretty(&document)?;
    std::fs::write(path, json)?;
    Ok(())
}
