//! Ridge Regression

use crate::FitError;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// L2-regularized least squares estimator.
///
/// Minimizes `||y - Xw - b||² + alpha * ||w||²`. The intercept is not
/// penalized: inputs are centered before solving and `b` is recovered from
/// the means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ridge {
    pub alpha: f64,
    pub fit_intercept: bool,
}

impl Default for Ridge {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
        }
    }
}

impl Ridge {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Solve the normal equations for one design matrix
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<RidgeModel, FitError> {
        let (n_samples, n_features) = x.dim();
        if n_samples != y.len() {
            return Err(FitError::ShapeMismatch {
                rows: n_samples,
                targets: y.len(),
            });
        }
        if n_samples == 0 {
            return Err(FitError::Empty);
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(FitError::InvalidAlpha(self.alpha));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite("features"));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite("target"));
        }

        let (x_mean, y_mean) = if self.fit_intercept {
            (
                x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(n_features)),
                y.mean().unwrap_or(0.0),
            )
        } else {
            (Array1::zeros(n_features), 0.0)
        };
        let x_c = x - &x_mean.view().insert_axis(Axis(0));
        let y_c = y - y_mean;

        let mut xtx = x_c.t().dot(&x_c);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_c.t().dot(&y_c);

        let coefficients = cholesky_solve(&xtx, &xty)?;
        let intercept = y_mean - coefficients.dot(&x_mean);
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(FitError::NonFinite("solution"));
        }

        Ok(RidgeModel {
            alpha: self.alpha,
            coefficients,
            intercept,
        })
    }
}

/// Fitted ridge coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeModel {
    pub alpha: f64,
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

impl RidgeModel {
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, FitError> {
        if x.ncols() != self.n_features() {
            return Err(FitError::FeatureCount {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

/// Solve the symmetric positive-definite system `a * x = b` by Cholesky
/// decomposition `a = L * L^T`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, FitError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return Err(FitError::NotPositiveDefinite { pivot: i });
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L * z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T * x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}
