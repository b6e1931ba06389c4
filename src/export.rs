//! Export Module
//! Writes the normalized dataset as CSV and a JSON summary report.

use crate::config::ColumnSelection;
use crate::data::{ColumnTable, PointDataset};
use crate::stats::{ColumnStats, StatsCalculator};
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summary of one load, written alongside the exported points.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub source: PathBuf,
    pub record_count: usize,
    pub selection: ColumnSelection,
    /// Statistics of the raw (unnormalized) selected columns.
    pub columns: Vec<ColumnStats>,
    pub late_threshold: f64,
    pub late_count: usize,
}

impl DatasetReport {
    pub fn new(
        source: &Path,
        table: &ColumnTable,
        dataset: &PointDataset,
        late_threshold: f64,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            record_count: dataset.len(),
            selection: dataset.selection().clone(),
            columns: StatsCalculator::compute_selection_stats(table, dataset.selection()),
            late_threshold,
            late_count: dataset.filter_by_scalar(late_threshold).len(),
        }
    }
}

/// Write points and scalars as CSV with a `x,y,z,scalar` header.
pub fn write_csv(dataset: &PointDataset, output_path: &Path) -> Result<(), ExportError> {
    let mut df = dataset.to_dataframe()?;
    let mut file = File::create(output_path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

pub fn write_report(report: &DatasetReport, output_path: &Path) -> Result<(), ExportError> {
    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
