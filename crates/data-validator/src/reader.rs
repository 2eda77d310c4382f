//! Raw CSV Loading

use crate::error::DataError;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Tokens read as missing values
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null"];

/// Untyped table exactly as read from disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Header names, trimmed
    pub headers: Vec<String>,
    /// Cells per row, `None` for missing values
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create a raw table from already split cells
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// Read delimited text with a header row
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    if MISSING_TOKENS.contains(&cell) {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        debug!("Read {} rows x {} columns", rows.len(), headers.len());
        Ok(Self { headers, rows })
    }

    /// Read a delimited file with a header row
    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, DataError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file, delimiter)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Index of a header, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}
