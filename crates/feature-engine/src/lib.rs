//! Feature Engineering Engine
//!
//! Column-group transformation plan for student records: standard scaling,
//! robust scaling, binary and one-hot encoding, and integer passthrough.
//! A plan is fit once on training data into an immutable
//! [`FittedTransformer`] that is then applied to any table.

mod encoding;
mod error;
mod features;
pub mod statistics;
mod transformer;

pub use encoding::{BinaryColumn, CategoryVocabulary};
pub use error::TransformError;
pub use features::FeatureMatrix;
pub use statistics::ColumnSummary;
pub use transformer::{FeatureTransformer, FittedTransformer, ScaleParams, TransformPlan};
