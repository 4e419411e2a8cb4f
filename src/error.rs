//! Error types for shiftgrid.
//!
//! Only caller bugs are errors here: malformed geometry, sample arrays of the
//! wrong shape, bad configuration. Precision loss during compression and
//! queries outside the grid are handled locally and never surface as errors.

use thiserror::Error;

/// The main error type for shiftgrid operations.
#[derive(Error, Debug)]
pub enum ShiftGridError {
    /// Grid geometry violating the construction contract
    #[error("Invalid grid geometry: {message}")]
    InvalidGeometry { message: String },

    /// Sample arrays inconsistent with the geometry or with each other
    #[error("Invalid grid data: {message}")]
    DataShape { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with ShiftGridError
pub type Result<T> = std::result::Result<T, ShiftGridError>;
