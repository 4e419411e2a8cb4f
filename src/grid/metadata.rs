//! Descriptive header shared by every grid representation.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Unit of the offsets stored in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Unit {
    Degree,
    /// NADCON and NTv2 grids store angular shifts in arc-seconds.
    #[default]
    ArcSecond,
    Metre,
    /// Dimensionless values, e.g. a scale difference.
    Unity,
}

impl Unit {
    /// Short symbol for reports.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Degree => "°",
            Unit::ArcSecond => "″",
            Unit::Metre => "m",
            Unit::Unity => "",
        }
    }
}

/// Where a grid came from and how to read its values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridMetadata {
    /// Files the grid was loaded from, in loading order
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Unit of the offset values
    #[serde(default)]
    pub translation_unit: Unit,

    /// Estimated accuracy of the offsets, in `translation_unit`
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl GridMetadata {
    /// Metadata for a grid read from a single file.
    pub fn from_file(path: impl Into<PathBuf>, translation_unit: Unit) -> Self {
        Self {
            files: vec![path.into()],
            translation_unit,
            accuracy: None,
        }
    }

    /// Returns a copy with the given accuracy estimate.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }
}

// Accuracy is an estimate and does not identify a grid.
impl PartialEq for GridMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.files == other.files && self.translation_unit == other.translation_unit
    }
}

impl Eq for GridMetadata {}

impl Hash for GridMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.files.hash(state);
        self.translation_unit.hash(state);
    }
}
