//! Pipeline Evaluation

use crate::metrics::RegressionMetrics;
use crate::EvaluationError;
use data_validator::Table;
use model_search::GradePipeline;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Coefficients reported per evaluation
pub const TOP_COEFFICIENTS: usize = 5;

/// One model coefficient and the transformed feature it weighs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCoefficient {
    pub feature: String,
    pub coefficient: f64,
}

/// Held-out predictions, their metrics and the largest coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub actual: Array1<f64>,
    pub predictions: Array1<f64>,
    pub metrics: RegressionMetrics,
    pub top_coefficients: Vec<FeatureCoefficient>,
}

/// The `k` largest coefficients by signed value, descending.
///
/// Equal coefficients keep feature order.
pub fn top_coefficients(pipeline: &GradePipeline, k: usize) -> Vec<FeatureCoefficient> {
    let mut coefficients: Vec<FeatureCoefficient> = pipeline
        .coefficients()
        .into_iter()
        .map(|(feature, coefficient)| FeatureCoefficient { feature, coefficient })
        .collect();
    coefficients.sort_by(|a, b| b.coefficient.total_cmp(&a.coefficient));
    coefficients.truncate(k);
    coefficients
}

/// Predict a validated test table and score the predictions
pub fn evaluate(pipeline: &GradePipeline, test: &Table) -> Result<Evaluation, EvaluationError> {
    if test.n_rows() == 0 {
        return Err(EvaluationError::Empty);
    }
    let actual = pipeline.target(test)?;
    let predictions = pipeline.predict(test)?;
    let metrics = RegressionMetrics::compute(&actual.to_vec(), &predictions.to_vec())?;

    info!(
        "Evaluated {} rows: MAE {:.4}, RMSE {:.4}, R2 {:.4}",
        test.n_rows(),
        metrics.mae,
        metrics.rmse,
        metrics.r2
    );

    Ok(Evaluation {
        actual,
        predictions,
        metrics,
        top_coefficients: top_coefficients(pipeline, TOP_COEFFICIENTS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::Column;
    use feature_engine::TransformPlan;
    use model_search::RidgeModel;
    use ndarray::array;

    fn plan() -> TransformPlan {
        TransformPlan {
            standard: Vec::new(),
            robust: Vec::new(),
            binary: Vec::new(),
            nominal: vec!["job".into()],
            target: "G3".into(),
        }
    }

    fn table() -> Table {
        Table::new(vec![
            Column::integer("G2", vec![10, 12, 8]),
            Column::text("job", vec!["health", "other", "teacher"]),
            Column::integer("G3", vec![11, 12, 9]),
        ])
        .unwrap()
    }

    /// Features: job_health, job_other, job_teacher, G2
    fn pipeline(coefficients: Array1<f64>, intercept: f64) -> GradePipeline {
        let transformer = plan().fit(&table()).unwrap();
        let model = RidgeModel {
            alpha: 1.0,
            coefficients,
            intercept,
        };
        GradePipeline::new(transformer, model).unwrap()
    }

    #[test]
    fn test_evaluate_hand_built_pipeline() {
        // prediction = G2 + 1
        let evaluation = evaluate(&pipeline(array![0.0, 0.0, 0.0, 1.0], 1.0), &table()).unwrap();
        assert_eq!(evaluation.predictions.to_vec(), vec![11.0, 13.0, 9.0]);
        assert_eq!(evaluation.actual.to_vec(), vec![11.0, 12.0, 9.0]);
        assert!((evaluation.metrics.mae - 1.0 / 3.0).abs() < 1e-12);
        assert!((evaluation.metrics.rmse - (1.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(evaluation.metrics.r2 < 1.0);
    }

    #[test]
    fn test_top_coefficients_sorted_by_signed_value() {
        let pipeline = pipeline(array![-3.0, 0.5, 2.0, 0.5], 0.0);
        let top = top_coefficients(&pipeline, 3);
        let names: Vec<&str> = top.iter().map(|c| c.feature.as_str()).collect();
        assert_eq!(names, vec!["job_teacher", "job_other", "G2"]);
        assert_eq!(top[0].coefficient, 2.0);
        assert_eq!(top_coefficients(&pipeline, TOP_COEFFICIENTS).len(), 4);
    }

    #[test]
    fn test_empty_test_table() {
        let empty = table().take_rows(&[]);
        assert_eq!(
            evaluate(&pipeline(array![0.0, 0.0, 0.0, 1.0], 0.0), &empty).unwrap_err(),
            EvaluationError::Empty
        );
    }

    #[test]
    fn test_missing_target_surfaces_pipeline_error() {
        let table = table().without_column("G3");
        assert!(matches!(
            evaluate(&pipeline(array![0.0, 0.0, 0.0, 1.0], 0.0), &table),
            Err(EvaluationError::Pipeline(_))
        ));
    }
}
