//! Configuration Module
//! Column selection and run options, read from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The four columns mapped onto the output dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSelection {
    pub x: String,
    pub y: String,
    pub z: String,
    pub scalar: String,
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self::new("MONTHLY_PAYMENT", "INTEREST_RATE", "LOAN_AMOUNT", "TIME_LATE")
    }
}

impl ColumnSelection {
    pub fn new(
        x: impl Into<String>,
        y: impl Into<String>,
        z: impl Into<String>,
        scalar: impl Into<String>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
            scalar: scalar.into(),
        }
    }

    /// Names in output order: x, y, z, scalar.
    pub fn names(&self) -> [&str; 4] {
        [
            self.x.as_str(),
            self.y.as_str(),
            self.z.as_str(),
            self.scalar.as_str(),
        ]
    }
}

/// Options for one loader run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatConfig {
    pub columns: ColumnSelection,
    /// Normalized scalar above which a record counts as late.
    pub late_threshold: f64,
}

impl Default for SplatConfig {
    fn default() -> Self {
        Self {
            columns: ColumnSelection::default(),
            late_threshold: 0.0,
        }
    }
}

impl SplatConfig {
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let text = fs::read_to_string(config_path)
            .with_context(|| format!("Cannot read config {}", config_path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", config_path.display()))
    }
}
