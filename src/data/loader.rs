//! Financial Data Loader Module
//! Parses the `NUMBER_POINTS` column-block text format into a column table.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read input: {0}")]
    Read(#[from] io::Error),
    #[error("No record count declaration found (expected `NUMBER_POINTS <n>`)")]
    MissingRecordCount,
    #[error("Invalid number of points: {0}")]
    InvalidRecordCount(i64),
}

/// Named numeric columns parsed from one input file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTable {
    record_count: usize,
    columns: HashMap<String, Vec<f64>>,
    order: Vec<String>,
}

impl ColumnTable {
    pub fn new(record_count: usize) -> Self {
        Self {
            record_count,
            columns: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Number of records declared by the `NUMBER_POINTS` line.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in the order they first appeared in the input.
    pub fn column_names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Store a column. A repeated name replaces the earlier block.
    pub fn insert(&mut self, name: String, values: Vec<f64>) {
        debug!("Column {} holds {} values", name, values.len());
        if self.columns.insert(name.clone(), values).is_some() {
            warn!("Column {} appears more than once; keeping the last block", name);
        } else {
            self.order.push(name);
        }
    }
}

/// The column currently receiving values while the input is scanned.
#[derive(Default)]
struct OpenColumn {
    name: Option<String>,
    values: Vec<f64>,
}

impl OpenColumn {
    fn close_into(&mut self, table: &mut ColumnTable) {
        let values = std::mem::take(&mut self.values);
        match self.name.take() {
            Some(name) => table.insert(name, values),
            None if !values.is_empty() => {
                warn!(
                    "Discarding {} values that precede the first column name",
                    values.len()
                );
            }
            None => {}
        }
    }
}

/// Parse a single value token. Only finite decimal numbers count, so a
/// column named `NAN` or `INF` is still read as a name.
fn parse_value(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Match a `<token> <integer>` line and return the integer.
fn parse_record_count(line: &str) -> Option<i64> {
    let mut tokens = line.split_whitespace();
    tokens.next()?;
    tokens.next()?.parse::<i64>().ok()
}

/// Lines of a reader, decoded lossily. Stray non-UTF-8 bytes (Latin-1
/// headers and the like) become U+FFFD inside a token instead of a read error.
struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(String::from_utf8_lossy(&self.buf).into_owned())),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Parse the column-block format from any buffered reader.
///
/// Lines are skipped until the first `<token> <integer>` declaration. After
/// that, a line starting with a number extends the open column and a line
/// starting with anything else opens a new column under that name.
pub fn parse_table<R: BufRead>(reader: R) -> Result<ColumnTable, LoaderError> {
    let mut lines = LossyLines {
        reader,
        buf: Vec::new(),
    };

    let mut declared = None;
    for line in lines.by_ref() {
        if let Some(count) = parse_record_count(&line?) {
            declared = Some(count);
            break;
        }
    }

    let declared = declared.ok_or(LoaderError::MissingRecordCount)?;
    let record_count = usize::try_from(declared)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(LoaderError::InvalidRecordCount(declared))?;

    let mut table = ColumnTable::new(record_count);
    let mut open = OpenColumn::default();

    for line in lines {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };

        match parse_value(first) {
            Some(value) => {
                open.values.push(value);
                for token in tokens {
                    match parse_value(token) {
                        Some(value) => open.values.push(value),
                        None => {
                            warn!("Ignoring trailing non-numeric token {:?} on data line", token);
                            break;
                        }
                    }
                }
            }
            None => {
                open.close_into(&mut table);
                open.name = Some(first.to_string());
            }
        }
    }
    open.close_into(&mut table);

    Ok(table)
}

/// Open, parse and close a data file.
pub fn read_table(file_path: &Path) -> Result<ColumnTable, LoaderError> {
    let file = File::open(file_path).map_err(|source| LoaderError::Open {
        path: file_path.to_path_buf(),
        source,
    })?;
    parse_table(BufReader::new(file))
}

/// Loads financial data files and keeps the most recent table.
pub struct DataLoader {
    table: Option<ColumnTable>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            table: None,
            file_path: None,
        }
    }

    /// Load a data file, replacing any previously loaded table.
    pub fn load_file(&mut self, file_path: impl AsRef<Path>) -> Result<&ColumnTable, LoaderError> {
        let file_path = file_path.as_ref();
        self.file_path = Some(file_path.to_path_buf());
        self.table = None;

        let table = read_table(file_path)?;
        info!(
            "Loaded {} columns, {} records from {}",
            table.len(),
            table.record_count(),
            file_path.display()
        );

        Ok(&*self.table.insert(table))
    }

    /// Get list of column names from the loaded table.
    pub fn get_columns(&self) -> Vec<String> {
        self.table
            .as_ref()
            .map(|table| table.column_names().to_vec())
            .unwrap_or_default()
    }

    /// Get the declared record count.
    pub fn get_record_count(&self) -> usize {
        self.table.as_ref().map(ColumnTable::record_count).unwrap_or(0)
    }

    pub fn get_table(&self) -> Option<&ColumnTable> {
        self.table.as_ref()
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}
