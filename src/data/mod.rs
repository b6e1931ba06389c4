//! Data module - financial table loading and processing

mod dataset;
mod loader;
mod processor;

pub use dataset::PointDataset;
pub use loader::{parse_table, read_table, ColumnTable, DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError};

use crate::config::ColumnSelection;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Read a data file and build the normalized dataset for `selection`.
pub fn read_financial_data(
    file_path: impl AsRef<Path>,
    selection: &ColumnSelection,
) -> Result<PointDataset, DataError> {
    let table = read_table(file_path.as_ref())?;
    Ok(DataProcessor::build_dataset(&table, selection)?)
}
