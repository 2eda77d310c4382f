//! Storage Layer
//!
//! Persists fitted artifacts in a versioned postcard envelope and writes
//! the pipeline's CSV tables.

mod artifact;
mod tables;

pub use artifact::{
    decode_artifact, encode_artifact, load_artifact, save_artifact, Artifact, ArtifactHeader, ArtifactKind,
    FORMAT_VERSION, MAGIC,
};
pub use tables::{
    write_coefficients, write_cv_results, write_features, write_metrics, write_predictions, write_table,
};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] postcard::Error),
    #[error("Not a pipeline artifact (bad magic bytes)")]
    BadMagic,
    #[error("Unsupported artifact format version {found} (expected {expected})")]
    VersionMismatch { expected: u16, found: u16 },
    #[error("Expected a {expected} artifact, found {found}")]
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    #[error("Length mismatch writing {table}: {left} vs {right} rows")]
    LengthMismatch { table: &'static str, left: usize, right: usize },
}
