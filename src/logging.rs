//! Logging utilities for shiftgrid.
//!
//! This module provides structured logging functionality so that grid loading,
//! compression and queries leave searchable records.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::grid::GridStorage;

/// Initialize the tracing subscriber with the given log level
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log the start of a batch of offset queries
pub fn log_query_start(point_count: usize) {
    debug!(operation = "query", points = point_count, "Starting query batch");
}

/// Log the end of a batch of offset queries
///
/// Points outside the grid domain are still answered by extrapolation from
/// the border cells, so they are reported as a warning rather than an error.
pub fn log_query_end(start_time: Instant, point_count: usize, outside: usize) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if outside == 0 {
        info!(
            operation = "query",
            points = point_count,
            duration_ms = duration_ms,
            "Query batch completed"
        );
    } else {
        warn!(
            operation = "query",
            points = point_count,
            extrapolated = outside,
            duration_ms = duration_ms,
            "Query batch completed with points outside the grid"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = Uuid::new_v4();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        "Starting operation"
    );

    let result = f();

    let duration = start.elapsed();

    info!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = duration.as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log detailed information about a loaded grid
pub fn log_grid_load_stats(file_path: &str, grid: &GridStorage) {
    let geometry = grid.geometry();
    let (xmin, ymin, xmax, ymax) = geometry.domain();
    info!(
        operation = "grid_load",
        file_path = file_path,
        nx = geometry.nx(),
        ny = geometry.ny(),
        shift_dimensions = grid.shift_dimensions(),
        compressed = grid.is_compressed(),
        domain = %format!("[{}, {}] x [{}, {}]", xmin, xmax, ymin, ymax),
        memory_kb = grid.memory_usage() / 1024,
        "Grid loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::ShiftGridError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_log_timed_operation() {
        // This is more of a functional test to ensure it doesn't panic
        let result = log_timed_operation("test_operation", || {
            // Simulate some work
            std::thread::sleep(Duration::from_millis(1));
            42
        });

        assert_eq!(result, 42);
    }

    #[test]
    fn test_log_query_batch() {
        let start = Instant::now();
        log_query_start(3);
        log_query_end(start, 3, 0);
        log_query_end(start, 3, 2);
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("debug");
        init_tracing("info");
    }
}
