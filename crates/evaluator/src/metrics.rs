//! Regression Metrics

use crate::EvaluationError;
use serde::{Deserialize, Serialize};

/// Held-out error summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self, EvaluationError> {
        Ok(Self {
            mae: mean_absolute_error(actual, predicted)?,
            rmse: root_mean_squared_error(actual, predicted)?,
            r2: r2_score(actual, predicted)?,
        })
    }
}

fn check(actual: &[f64], predicted: &[f64]) -> Result<(), EvaluationError> {
    if actual.len() != predicted.len() {
        return Err(EvaluationError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(EvaluationError::Empty);
    }
    Ok(())
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, EvaluationError> {
    check(actual, predicted)?;
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum();
    Ok(sum / actual.len() as f64)
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64, EvaluationError> {
    check(actual, predicted)?;
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    Ok((sum / actual.len() as f64).sqrt())
}

/// Coefficient of determination.
///
/// A constant `actual` has no variance to explain: the score is 1 when the
/// predictions match exactly and 0 otherwise, so it is always finite.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64, EvaluationError> {
    check(actual, predicted)?;
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let actual = [3.0, 5.0, 7.0, 9.0];
        let predicted = [4.0, 5.0, 6.0, 11.0];
        let metrics = RegressionMetrics::compute(&actual, &predicted).unwrap();
        assert_eq!(metrics.mae, 1.0);
        // squared errors 1, 0, 1, 4
        assert!((metrics.rmse - 1.5f64.sqrt()).abs() < 1e-12);
        // ss_tot = 20
        assert!((metrics.r2 - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_predictions() {
        let actual = [1.0, 2.0, 3.0];
        let metrics = RegressionMetrics::compute(&actual, &actual).unwrap();
        assert_eq!(metrics, RegressionMetrics { mae: 0.0, rmse: 0.0, r2: 1.0 });
    }

    #[test]
    fn test_constant_truth_stays_finite() {
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 4.0]).unwrap(), 1.0);
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_mismatch_and_empty() {
        assert_eq!(
            mean_absolute_error(&[1.0], &[1.0, 2.0]).unwrap_err(),
            EvaluationError::LengthMismatch { actual: 1, predicted: 2 }
        );
        assert_eq!(r2_score(&[], &[]).unwrap_err(), EvaluationError::Empty);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_rmse_bounds_mae(pairs in proptest::collection::vec((-20.0f64..20.0, -20.0f64..20.0), 1..50)) {
                let (actual, predicted): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
                let metrics = RegressionMetrics::compute(&actual, &predicted).unwrap();
                prop_assert!(metrics.mae >= 0.0);
                prop_assert!(metrics.rmse + 1e-9 >= metrics.mae);
                prop_assert!(metrics.r2 <= 1.0 + 1e-12);
                prop_assert!(metrics.r2.is_finite());
            }
        }
    }
}
