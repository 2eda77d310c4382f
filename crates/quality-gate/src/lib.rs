//! Correlation Guard
//!
//! Data-quality gate run on the transformed training set. Rejects feature
//! sets that leak the label or carry near-duplicate features, using a
//! pluggable association score.

mod association;
mod guard;
mod tree;

pub use association::{AssociationScore, PredictivePowerScore};
pub use guard::{CorrelationGuard, CorrelationReport, FeatureScore, GateFailure, GuardConfig, PairScore};
pub use tree::SingleFeatureTree;

use thiserror::Error;

/// Errors raised by the correlation guard
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataQualityError {
    #[error("{0}")]
    Gate(GateFailure),
    #[error("Feature matrix has {features} rows but target has {target}")]
    LengthMismatch { features: usize, target: usize },
}
