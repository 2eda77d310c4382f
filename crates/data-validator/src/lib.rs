//! Data Validation and Splitting
//!
//! Loads raw student records, checks them against the fixed student schema,
//! and partitions the validated table into training and test sets.

mod error;
mod reader;
mod schema;
mod split;
mod table;
mod validator;

pub use error::{DataError, Rule, RuleFailure, SchemaViolation};
pub use reader::RawTable;
pub use schema::{ColumnKind, ColumnSpec, Schema, TARGET};
pub use split::{train_test_split, DatasetSplit, SplitConfig};
pub use table::{Column, ColumnData, Table};
pub use validator::Validator;
