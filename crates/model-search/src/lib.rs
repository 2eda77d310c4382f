//! Hyperparameter Search Engine
//!
//! Ridge regression fitted on transformed student features, tuned by a
//! cross-validated randomized search over the regularization strength.

mod folds;
mod pipeline;
mod ridge;
mod search;

pub use folds::{Fold, KFold};
pub use pipeline::GradePipeline;
pub use ridge::{Ridge, RidgeModel};
pub use search::{CandidateScore, RandomizedSearch, SearchConfig, SearchResult};

use feature_engine::TransformError;
use thiserror::Error;

/// Numerical failures while fitting or applying a ridge model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("Design matrix has {rows} rows but target has {targets}")]
    ShapeMismatch { rows: usize, targets: usize },
    #[error("Model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("Cannot fit on an empty design matrix")]
    Empty,
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
    #[error("Regularization strength must be finite and non-negative, got {0}")]
    InvalidAlpha(f64),
    #[error("Normal equations are not positive definite (pivot {pivot})")]
    NotPositiveDefinite { pivot: usize },
}

/// Errors raised by the search engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("Model fit failed: {0}")]
    Fit(#[from] FitError),
    #[error("Transformation failed: {0}")]
    Transform(#[from] TransformError),
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
}
