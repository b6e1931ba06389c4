//! Stats module - Column statistics

mod calculator;

pub use calculator::{ColumnStats, StatsCalculator};
