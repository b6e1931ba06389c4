//! Point Dataset Module
//! Normalized points with one scalar per point.

use crate::config::ColumnSelection;
use polars::prelude::*;

/// One point per record, built from three normalized columns, plus the
/// normalized scalar column. Record `i` is point `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDataset {
    selection: ColumnSelection,
    points: Vec<[f64; 3]>,
    scalars: Vec<f64>,
}

impl PointDataset {
    pub fn new(selection: ColumnSelection, points: Vec<[f64; 3]>, scalars: Vec<f64>) -> Self {
        debug_assert_eq!(points.len(), scalars.len());
        Self {
            selection,
            points,
            scalars,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    pub fn scalars(&self) -> &[f64] {
        &self.scalars
    }

    /// Columns this dataset was built from.
    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let (first, rest) = self.points.split_first()?;
        Some(rest.iter().fold((*first, *first), |(mut lo, mut hi), p| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
            (lo, hi)
        }))
    }

    /// Keep the records whose scalar is strictly above `threshold`.
    pub fn filter_by_scalar(&self, threshold: f64) -> PointDataset {
        let (points, scalars) = self
            .points
            .iter()
            .zip(&self.scalars)
            .filter(|(_, s)| **s > threshold)
            .map(|(p, &s)| (*p, s))
            .unzip();

        PointDataset::new(self.selection.clone(), points, scalars)
    }

    /// Convert to a DataFrame with columns `x`, `y`, `z`, `scalar`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let axis = |i: usize| -> Vec<f64> { self.points.iter().map(|p| p[i]).collect() };

        DataFrame::new(vec![
            Column::new("x".into(), axis(0)),
            Column::new("y".into(), axis(1)),
            Column::new("z".into(), axis(2)),
            Column::new("scalar".into(), self.scalars.clone()),
        ])
    }
}
