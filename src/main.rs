//! shiftgrid - inspect and query a datum shift grid
//!
//! Loads a JSON grid document, optionally compresses it, and prints a JSON
//! report with the offsets at the requested coordinates.

use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use shiftgrid::grid_loader::load_grid;
use shiftgrid::{
    init_tracing, log_error, log_grid_load_stats, log_query_end, log_query_start,
    log_timed_operation, Config, GridStorage,
};

/// Offsets reported for one query point
#[derive(Debug, Serialize)]
struct PointReport {
    x: f64,
    y: f64,
    inside: bool,
    offsets: Vec<f64>,
}

/// Summary printed to stdout
#[derive(Debug, Serialize)]
struct GridReport {
    nx: usize,
    ny: usize,
    shift_dimensions: usize,
    compressed: bool,
    scale: Option<f64>,
    averages: Vec<f64>,
    unit: &'static str,
    memory_bytes: usize,
    cell_precision: Option<f64>,
    points: Vec<PointReport>,
}

fn main() -> anyhow::Result<()> {
    // Load configuration
    let (config, grid_path) = Config::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    init_tracing(&config.log_level);
    info!("Starting shiftgrid v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let dense = load_grid(&grid_path)
        .map_err(|e| {
            log_error(&e, "grid_load");
            e
        })
        .with_context(|| format!("Failed to load grid {}", grid_path.display()))?;

    let grid = if config.compression.enabled {
        let compressor = config.compression.compressor();
        log_timed_operation("compress", || compressor.compress(dense))
    } else {
        GridStorage::Dense(dense)
    };
    if config.compression.enabled && !grid.is_compressed() {
        info!(
            scale = config.compression.scale,
            "Grid kept as 32-bit floats, values need more precision than the scale allows"
        );
    }
    log_grid_load_stats(&grid_path.display().to_string(), &grid);

    // Shared read-only from here on
    let grid = Arc::new(grid);

    let start = Instant::now();
    log_query_start(config.query.points.len());
    let points: Vec<PointReport> = config
        .query
        .points
        .iter()
        .map(|&[x, y]| PointReport {
            x,
            y,
            inside: grid.geometry().contains(x, y),
            offsets: grid.offset_at(x, y),
        })
        .collect();
    let outside = points.iter().filter(|p| !p.inside).count();
    log_query_end(start, points.len(), outside);

    let report = GridReport {
        nx: grid.geometry().nx(),
        ny: grid.geometry().ny(),
        shift_dimensions: grid.shift_dimensions(),
        compressed: grid.is_compressed(),
        scale: match &*grid {
            GridStorage::Quantized(quantized) => Some(quantized.scale()),
            GridStorage::Dense(_) => None,
        },
        averages: (0..grid.shift_dimensions())
            .map(|dim| grid.average_offset(dim))
            .collect(),
        unit: grid.metadata().translation_unit.symbol(),
        memory_bytes: grid.memory_usage(),
        cell_precision: grid.cell_precision(),
        points,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
