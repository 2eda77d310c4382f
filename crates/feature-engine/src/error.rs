//! Transformation Error Types

use thiserror::Error;

/// Errors while fitting or applying a transformation plan
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Transform requested before any fit
    #[error("Transformer is not fitted; call fit before transform")]
    NotFitted,

    /// Column named by the plan is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Column holds the wrong kind of values
    #[error("Column {column} must hold {expected} values")]
    WrongColumnType {
        column: String,
        expected: &'static str,
    },

    /// Binary column value outside its two-value domain
    #[error("Column {column} has unknown category {value:?}")]
    UnknownCategory { column: String, value: String },

    /// Nothing to fit on
    #[error("Cannot fit a transformer on an empty table")]
    EmptyTable,

    /// Feature names and values disagree
    #[error("Invalid feature matrix: {0}")]
    Shape(String),
}
