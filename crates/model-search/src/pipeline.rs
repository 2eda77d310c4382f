//! Fitted Prediction Pipeline

use crate::ridge::RidgeModel;
use crate::SearchError;
use data_validator::Table;
use feature_engine::FittedTransformer;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Fitted transformer followed by a fitted ridge model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradePipeline {
    pub transformer: FittedTransformer,
    pub model: RidgeModel,
}

impl GradePipeline {
    pub fn new(transformer: FittedTransformer, model: RidgeModel) -> Result<Self, SearchError> {
        if transformer.n_features() != model.n_features() {
            return Err(SearchError::InvalidConfig(format!(
                "transformer emits {} features but model has {} coefficients",
                transformer.n_features(),
                model.n_features()
            )));
        }
        Ok(Self { transformer, model })
    }

    /// Predict the target for every row of a validated table
    pub fn predict(&self, table: &Table) -> Result<Array1<f64>, SearchError> {
        let features = self.transformer.apply(table)?;
        Ok(self.model.predict(features.values())?)
    }

    /// Target column of a validated table
    pub fn target(&self, table: &Table) -> Result<Array1<f64>, SearchError> {
        Ok(self.transformer.target(table)?)
    }

    pub fn feature_names(&self) -> &[String] {
        self.transformer.feature_names()
    }

    /// Coefficients paired with their transformed feature names
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        self.feature_names()
            .iter()
            .cloned()
            .zip(self.model.coefficients.iter().copied())
            .collect()
    }
}
