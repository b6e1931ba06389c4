//! Finance Splat - multivariate financial data loader
//!
//! Reads the `NUMBER_POINTS` column-block data format, maps three columns
//! onto space and one onto a scalar, and normalizes each into [0, 1].

pub mod config;
pub mod data;
pub mod export;
pub mod stats;

pub use config::{ColumnSelection, SplatConfig};
pub use data::{read_financial_data, DataError, PointDataset};
