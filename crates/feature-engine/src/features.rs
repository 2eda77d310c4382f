//! Transformed Feature Matrix

use crate::error::TransformError;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Named numeric features, one row per record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Create a matrix whose column count matches the names
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self, TransformError> {
        if names.len() != values.ncols() {
            return Err(TransformError::Shape(format!(
                "{} names for {} columns",
                names.len(),
                values.ncols()
            )));
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    /// Position of a feature by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// View of one feature's values
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name).map(|idx| self.values.column(idx))
    }

    /// Matrix restricted to the given rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            names: self.names.clone(),
            values: self.values.select(Axis(0), rows),
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Array2<f64>) {
        (self.names, self.values)
    }
}
