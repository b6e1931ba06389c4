//! Data Processor Module
//! Normalizes the selected columns and assembles the point dataset.

use super::dataset::PointDataset;
use super::loader::ColumnTable;
use crate::config::ColumnSelection;
use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ProcessorError {
    #[error("Column {0} not found in input")]
    MissingColumn(String),
    #[error("Column {name} has {found} values, expected at least {expected}")]
    ShortColumn {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Handles normalization and dataset assembly.
pub struct DataProcessor;

impl DataProcessor {
    /// Smallest and largest value, or `None` for an empty slice.
    pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
        let (&first, rest) = values.split_first()?;
        Some(
            rest.iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Rescale values into [0, 1] using their own min and max.
    ///
    /// A constant column has no range, so every output is 0. When `hi - lo` overflows, values are halved before the
    /// subtraction so the extremes still map to exactly 0 and 1.
    pub fn normalize(values: &[f64]) -> Vec<f64> {
        let Some((lo, hi)) = Self::value_range(values) else {
            return Vec::new();
        };
        if hi == lo {
            return vec![0.0; values.len()];
        }

        let range = hi - lo;
        if range.is_finite() {
            values.iter().map(|v| (v - lo) / range).collect()
        } else {
            let (half_lo, half_range) = (lo / 2.0, hi / 2.0 - lo / 2.0);
            values.iter().map(|v| (v / 2.0 - half_lo) / half_range).collect()
        }
    }

    /// Look up a selected column and check it covers every record.
    pub fn selected_column<'a>(
        table: &'a ColumnTable,
        name: &str,
    ) -> Result<&'a [f64], ProcessorError> {
        let values = table
            .column(name)
            .ok_or_else(|| ProcessorError::MissingColumn(name.to_string()))?;

        let expected = table.record_count();
        if values.len() < expected {
            return Err(ProcessorError::ShortColumn {
                name: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        if values.len() > expected {
            warn!(
                "Column {} has {} values; only the first {} become points",
                name,
                values.len(),
                expected
            );
        }

        Ok(values)
    }

    /// Build the normalized point dataset from four selected columns.
    pub fn build_dataset(
        table: &ColumnTable,
        selection: &ColumnSelection,
    ) -> Result<PointDataset, ProcessorError> {
        let columns = selection
            .names()
            .iter()
            .map(|name| Self::selected_column(table, name))
            .collect::<Result<Vec<_>, _>>()?;

        let normalized: Vec<Vec<f64>> = columns
            .par_iter()
            .map(|values| Self::normalize(values))
            .collect();

        let n = table.record_count();
        let [x, y, z, s] = [&normalized[0], &normalized[1], &normalized[2], &normalized[3]];
        let points = (0..n).map(|i| [x[i], y[i], z[i]]).collect();
        let scalars = s[..n].to_vec();

        debug!(
            "Built {} points from {} / {} / {} with scalar {}",
            n, selection.x, selection.y, selection.z, selection.scalar
        );

        Ok(PointDataset::new(selection.clone(), points, scalars))
    }
}
