//! Typed Column Table

use crate::error::DataError;
use serde::{Deserialize, Serialize};

/// Values of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Integer(Vec<i64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell rendered as text
    pub fn cell(&self, row: usize) -> String {
        match self {
            ColumnData::Integer(values) => values[row].to_string(),
            ColumnData::Text(values) => values[row].clone(),
        }
    }

    fn take(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Integer(values) => ColumnData::Integer(rows.iter().map(|&r| values[r]).collect()),
            ColumnData::Text(values) => ColumnData::Text(rows.iter().map(|&r| values[r].clone()).collect()),
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn integer(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Integer(values),
        }
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<S>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values.into_iter().map(Into::into).collect()),
        }
    }
}

/// Column-oriented table of validated records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Create a table, checking that every column has the same length
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != n_rows) {
            return Err(DataError::ShapeMismatch {
                column: bad.name.clone(),
                expected: n_rows,
                actual: bad.data.len(),
            });
        }
        Ok(Self { columns, n_rows })
    }

    /// Columns already known to hold `n_rows` values each
    pub(crate) fn from_parts(columns: Vec<Column>, n_rows: usize) -> Self {
        Self { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Integer values of a column, `None` if absent or textual
    pub fn integers(&self, name: &str) -> Option<&[i64]> {
        match &self.column(name)?.data {
            ColumnData::Integer(values) => Some(values),
            ColumnData::Text(_) => None,
        }
    }

    /// Text values of a column, `None` if absent or numeric
    pub fn text(&self, name: &str) -> Option<&[String]> {
        match &self.column(name)?.data {
            ColumnData::Text(values) => Some(values),
            ColumnData::Integer(_) => None,
        }
    }

    /// New table holding the given rows, in the given order
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.take(rows),
                })
                .collect(),
            n_rows: rows.len(),
        }
    }

    /// Copy of the table without the named column
    pub fn without_column(&self, name: &str) -> Table {
        Table {
            columns: self.columns.iter().filter(|c| c.name != name).cloned().collect(),
            n_rows: self.n_rows,
        }
    }

    /// One row rendered as text cells, in column order
    pub fn row_cells(&self, row: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.data.cell(row)).collect()
    }
}
