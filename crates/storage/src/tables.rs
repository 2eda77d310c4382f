//! CSV Table Output

use crate::StorageError;
use data_validator::Table;
use evaluator::{FeatureCoefficient, RegressionMetrics};
use feature_engine::FeatureMatrix;
use model_search::CandidateScore;
use ndarray::Array1;
use std::fs;
use std::path::Path;
use tracing::debug;

fn writer(path: &Path, delimiter: u8) -> Result<csv::Writer<fs::File>, StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(csv::WriterBuilder::new().delimiter(delimiter).from_path(path)?)
}

fn finish(mut writer: csv::Writer<fs::File>, path: &Path, rows: usize) -> Result<(), StorageError> {
    writer.flush()?;
    debug!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}

/// Write a typed table with its header row
pub fn write_table(path: impl AsRef<Path>, table: &Table, delimiter: u8) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut w = writer(path, delimiter)?;
    w.write_record(table.column_names())?;
    for row in 0..table.n_rows() {
        w.write_record(table.row_cells(row))?;
    }
    finish(w, path, table.n_rows())
}

/// Write transformed features with the target appended as the last column
pub fn write_features(
    path: impl AsRef<Path>,
    features: &FeatureMatrix,
    target_name: &str,
    target: &Array1<f64>,
) -> Result<(), StorageError> {
    let path = path.as_ref();
    if features.n_rows() != target.len() {
        return Err(StorageError::LengthMismatch {
            table: "features",
            left: features.n_rows(),
            right: target.len(),
        });
    }

    let mut w = writer(path, b',')?;
    w.write_record(features.names().iter().map(String::as_str).chain([target_name]))?;
    for (row, y) in features.values().rows().into_iter().zip(target.iter()) {
        w.write_record(row.iter().chain([y]).map(f64::to_string))?;
    }
    finish(w, path, features.n_rows())
}

/// `MAE,RMSE,R2` with a single data row
pub fn write_metrics(path: impl AsRef<Path>, metrics: &RegressionMetrics) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut w = writer(path, b',')?;
    w.write_record(["MAE", "RMSE", "R2"])?;
    w.write_record([metrics.mae, metrics.rmse, metrics.r2].map(|v| v.to_string()))?;
    finish(w, path, 1)
}

pub fn write_coefficients(path: impl AsRef<Path>, coefficients: &[FeatureCoefficient]) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut w = writer(path, b',')?;
    w.write_record(["feature", "coefficient"])?;
    for c in coefficients {
        w.write_record([c.feature.clone(), c.coefficient.to_string()])?;
    }
    finish(w, path, coefficients.len())
}

/// One row per search candidate, in draw order
pub fn write_cv_results(path: impl AsRef<Path>, candidates: &[CandidateScore]) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut w = writer(path, b',')?;
    w.write_record(["alpha", "mean_test_score", "std_test_score", "rank_test_score"])?;
    for c in candidates {
        w.write_record([
            c.alpha.to_string(),
            c.mean_test_score.to_string(),
            c.std_test_score.to_string(),
            c.rank.to_string(),
        ])?;
    }
    finish(w, path, candidates.len())
}

pub fn write_predictions(
    path: impl AsRef<Path>,
    actual: &Array1<f64>,
    predicted: &Array1<f64>,
) -> Result<(), StorageError> {
    let path = path.as_ref();
    if actual.len() != predicted.len() {
        return Err(StorageError::LengthMismatch {
            table: "predictions",
            left: actual.len(),
            right: predicted.len(),
        });
    }
    let mut w = writer(path, b',')?;
    w.write_record(["actual", "predicted"])?;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        w.write_record([a.to_string(), p.to_string()])?;
    }
    finish(w, path, actual.len())
}
