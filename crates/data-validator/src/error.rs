//! Validation Error Types

use std::fmt;
use thiserror::Error;

/// Number of offending values kept per failure for display
const MAX_EXAMPLES: usize = 5;

/// A rule a cell, column, or row can break
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Column absent from the header
    MissingColumn,
    /// Empty cell in a non-nullable column
    NotNullable,
    /// Cell cannot be read as an integer
    NotInteger,
    /// Integer outside its closed interval
    OutOfRange { min: i64, max: i64 },
    /// Text outside the column's allowed values
    NotInSet { allowed: Vec<String> },
    /// Exact copy of an earlier row
    DuplicateRow,
    /// Every cell of the row is empty
    EmptyRow,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::MissingColumn => write!(f, "column is missing"),
            Rule::NotNullable => write!(f, "null values are not allowed"),
            Rule::NotInteger => write!(f, "values must be integers"),
            Rule::OutOfRange { min, max } => write!(f, "values must be in [{}, {}]", min, max),
            Rule::NotInSet { allowed } => write!(f, "values must be one of {:?}", allowed),
            Rule::DuplicateRow => write!(f, "duplicate rows found"),
            Rule::EmptyRow => write!(f, "empty rows found"),
        }
    }
}

/// One failing rule together with every row that breaks it
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    /// Offending column, `None` for row-level rules
    pub column: Option<String>,
    /// The broken rule
    pub rule: Rule,
    /// Zero-based data row indices, ascending
    pub rows: Vec<usize>,
    /// A few of the offending raw values
    pub examples: Vec<String>,
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{}: {}", column, self.rule)?,
            None => write!(f, "{}", self.rule)?,
        }
        if !self.rows.is_empty() {
            write!(f, " (rows {:?})", self.rows)?;
        }
        if !self.examples.is_empty() {
            write!(f, " e.g. {:?}", self.examples)?;
        }
        Ok(())
    }
}

/// Batch report of every schema violation found in a single pass
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{}", render(&self.failures))]
pub struct SchemaViolation {
    pub failures: Vec<RuleFailure>,
}

impl SchemaViolation {
    /// Record one offending row for a (column, rule) pair, merging with earlier hits
    pub(crate) fn record(&mut self, column: Option<&str>, rule: Rule, row: Option<usize>, value: Option<&str>) {
        let position = self
            .failures
            .iter()
            .position(|f| f.column.as_deref() == column && f.rule == rule);

        let failure = match position {
            Some(idx) => &mut self.failures[idx],
            None => {
                self.failures.push(RuleFailure {
                    column: column.map(str::to_string),
                    rule,
                    rows: Vec::new(),
                    examples: Vec::new(),
                });
                let last = self.failures.len() - 1;
                &mut self.failures[last]
            }
        };

        if let Some(row) = row {
            failure.rows.push(row);
        }
        if let Some(value) = value {
            if failure.examples.len() < MAX_EXAMPLES && !failure.examples.iter().any(|e| e == value) {
                failure.examples.push(value.to_string());
            }
        }
    }

    /// Whether no rule failed
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Find the failure for a column and rule
    pub fn find(&self, column: &str, rule: &Rule) -> Option<&RuleFailure> {
        self.failures
            .iter()
            .find(|f| f.column.as_deref() == Some(column) && &f.rule == rule)
    }

    /// Total number of offending rows across all failures
    pub fn offending_rows(&self) -> usize {
        self.failures.iter().map(|f| f.rows.len()).sum()
    }
}

fn render(failures: &[RuleFailure]) -> String {
    let mut out = format!("Schema violation: {} failing rule(s)", failures.len());
    for failure in failures {
        out.push_str(&format!("\n  - {}", failure));
    }
    out
}

/// Errors while loading, validating, or splitting data
#[derive(Debug, Error)]
pub enum DataError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Columns of different lengths
    #[error("Column {column} has {actual} rows, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Split parameters cannot produce two non-empty subsets
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// Records broke the schema
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}
