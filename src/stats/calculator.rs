//! Statistics Calculator Module
//! Descriptive statistics for the raw columns of a loaded table.

use crate::config::ColumnSelection;
use crate::data::ColumnTable;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column_name: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub p95: f64,
    pub p05: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            column_name: String::new(),
            count: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            variance: f64::NAN,
            p95: f64::NAN,
            p05: f64::NAN,
        }
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = values.mean();
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        // Sample variance; a single value has none.
        let variance = if n > 1 { values.variance() } else { 0.0 };

        ColumnStats {
            column_name: String::new(),
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            std: variance.sqrt(),
            variance,
            p95: Self::percentile(&sorted, 95.0),
            p05: Self::percentile(&sorted, 5.0),
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    /// Feeds the p05/p95 tails of the raw-column report, where `sorted_values`
    /// is one column sorted with `total_cmp`.
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    fn named_stats(table: &ColumnTable, name: &str) -> Option<ColumnStats> {
        let values = table.column(name)?;
        let mut stats = Self::compute_descriptive_stats(values);
        stats.column_name = name.to_string();
        Some(stats)
    }

    /// Compute statistics for every column, in input order.
    pub fn compute_table_stats_parallel(table: &ColumnTable) -> Vec<ColumnStats> {
        table
            .column_names()
            .par_iter()
            .filter_map(|name| Self::named_stats(table, name))
            .collect()
    }

    /// Compute statistics for the selected columns present in the table,
    /// in x, y, z, scalar order.
    pub fn compute_selection_stats(
        table: &ColumnTable,
        selection: &ColumnSelection,
    ) -> Vec<ColumnStats> {
        selection
            .names()
            .par_iter()
            .filter_map(|name| Self::named_stats(table, name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_table;
    use approx::assert_relative_eq;

    #[test]
    fn descriptive_stats_of_small_sample() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0, 5.0]);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_relative_eq!(stats.mean, 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats.median, 3.0);
        assert_relative_eq!(stats.variance, 2.5, epsilon = 1e-12);
        assert_relative_eq!(stats.std, 2.5_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.p95, 4.8, epsilon = 1e-12);
        assert_relative_eq!(stats.p05, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn even_count_median_averages_middle_pair() {
        let stats = StatsCalculator::compute_descriptive_stats(&[10.0, 2.0, 4.0, 8.0]);
        assert_relative_eq!(stats.median, 6.0);
    }

    #[test]
    fn single_value_has_zero_spread() {
        let stats = StatsCalculator::compute_descriptive_stats(&[42.0]);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.p95, 42.0);
    }

    #[test]
    fn empty_values_give_nan_stats() {
        let stats = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.min.is_nan());
    }

    #[test]
    fn table_stats_follow_column_order() {
        let table = parse_table("NUMBER_POINTS 2\nB\n1 3\nA\n2 2\nC\n0 10\n".as_bytes()).unwrap();
        let stats = StatsCalculator::compute_table_stats_parallel(&table);
        let names: Vec<&str> = stats.iter().map(|s| s.column_name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
        assert_relative_eq!(stats[2].mean, 5.0);
    }

    #[test]
    fn selection_stats_skip_absent_columns() {
        let table = parse_table("NUMBER_POINTS 1\nX\n1\nS\n2\n".as_bytes()).unwrap();
        let stats =
            StatsCalculator::compute_selection_stats(&table, &ColumnSelection::new("X", "Y", "Z", "S"));
        let names: Vec<&str> = stats.iter().map(|s| s.column_name.as_str()).collect();
        assert_eq!(names, ["X", "S"]);
    }
}
