//! Configuration management for the shiftgrid command-line tool.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compression::{Compressor, DEFAULT_SCALE};
use crate::error::{Result, ShiftGridError};

/// Command-line arguments for shiftgrid
#[derive(Parser, Debug)]
#[command(name = "shiftgrid")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON grid document to load
    pub grid_file: PathBuf,

    /// Quantization step used when compressing the grid
    #[arg(short, long, env = "SHIFTGRID_SCALE")]
    pub scale: Option<f64>,

    /// Keep the grid as 32-bit floats
    #[arg(long, env = "SHIFTGRID_NO_COMPRESS")]
    pub no_compress: bool,

    /// Coordinate to evaluate, as "x,y" (repeatable)
    #[arg(short = 'a', long = "at", value_name = "X,Y")]
    pub points: Vec<String>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "SHIFTGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SHIFTGRID_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Compression configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Whether to attempt 16-bit compression at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Quantization step
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Per-dimension averages (None = computed from the grid)
    #[serde(default)]
    pub averages: Option<Vec<f64>>,
}

impl CompressionConfig {
    /// Build the compressor described by this configuration.
    pub fn compressor(&self) -> Compressor {
        let compressor = Compressor::new(self.scale);
        match &self.averages {
            Some(averages) => compressor.with_averages(averages.clone()),
            None => compressor,
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Coordinates at which to report offsets
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Compression configuration
    #[serde(default)]
    pub compression: CompressionConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, PathBuf)> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, PathBuf)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(scale) = args.scale {
            config.compression.scale = scale;
        }
        if args.no_compress {
            config.compression.enabled = false;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        for point in &args.points {
            config.query.points.push(parse_point(point)?);
        }

        Ok((config, args.grid_file))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.compression = other.compression;
        self.query.points.extend(other.query.points);
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let scale = self.compression.scale;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ShiftGridError::Config {
                message: format!("Compression scale must be finite and positive, got {}", scale),
            });
        }

        if let Some(averages) = &self.compression.averages {
            if averages.iter().any(|a| !a.is_finite()) {
                return Err(ShiftGridError::Config {
                    message: "Compression averages must be finite".to_string(),
                });
            }
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ShiftGridError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        if let Some([x, y]) = self
            .query
            .points
            .iter()
            .find(|[x, y]| !x.is_finite() || !y.is_finite())
        {
            return Err(ShiftGridError::Config {
                message: format!("Query point ({}, {}) must be finite", x, y),
            });
        }

        Ok(())
    }
}

/// Parse an "x,y" pair given on the command line
pub fn parse_point(text: &str) -> Result<[f64; 2]> {
    let invalid = || ShiftGridError::InvalidParameter {
        param: "at".to_string(),
        message: format!("Expected \"x,y\", got \"{}\"", text),
    };
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok([x, y])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compression: CompressionConfig::default(),
            query: QueryConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            scale: default_scale(),
            averages: None,
        }
    }
}

// Default value functions for serde
fn default_enabled() -> bool {
    true
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_log_level() -> String {
    "info".to_string()
}
