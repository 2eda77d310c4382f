//! Evaluator
//!
//! Applies a fitted pipeline to held-out data and reports regression
//! metrics alongside the strongest positive coefficients.

mod evaluation;
pub mod metrics;

pub use evaluation::{evaluate, top_coefficients, Evaluation, FeatureCoefficient, TOP_COEFFICIENTS};
pub use metrics::RegressionMetrics;

use model_search::SearchError;
use thiserror::Error;

/// Errors during evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Pipeline failed on test data: {0}")]
    Pipeline(#[from] SearchError),
    #[error("Length mismatch: {actual} actual values, {predicted} predictions")]
    LengthMismatch { actual: usize, predicted: usize },
    #[error("Cannot evaluate on zero rows")]
    Empty,
}
