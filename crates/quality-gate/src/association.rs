//! Feature Association Scores

use crate::tree::SingleFeatureTree;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Directional strength with which one variable predicts another.
///
/// Scores lie in `[0, 1]`; 0 means no predictive power and 1 means `y` is
/// fully determined by `x`.
pub trait AssociationScore: Send + Sync {
    /// Short name used in reports
    fn name(&self) -> &'static str;

    /// How well `x` predicts `y`
    fn score(&self, x: &[f64], y: &[f64]) -> f64;
}

/// Predictive power score for numeric targets.
///
/// Cross-validates a single-feature regression tree against a baseline that
/// always predicts the median target, both measured by mean absolute error:
/// `pps = max(0, 1 - mae_model / mae_baseline)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictivePowerScore {
    /// Cross-validation folds (clamped to the row count)
    pub cv_folds: usize,
    /// Rows scored at most, drawn after shuffling
    pub sample_size: usize,
    /// Seed for the row shuffle
    pub seed: u64,
}

impl Default for PredictivePowerScore {
    fn default() -> Self {
        Self {
            cv_folds: 4,
            sample_size: 5000,
            seed: 123,
        }
    }
}

impl PredictivePowerScore {
    fn cross_validated_mae(&self, x: &[f64], y: &[f64]) -> f64 {
        let n = x.len();
        let folds = self.cv_folds.clamp(2, n);
        let mut total = 0.0;
        let mut start = 0;

        for fold in 0..folds {
            let size = n / folds + usize::from(fold < n % folds);
            let end = start + size;

            let (train_x, train_y): (Vec<f64>, Vec<f64>) = (0..n)
                .filter(|i| *i < start || *i >= end)
                .map(|i| (x[i], y[i]))
                .unzip();
            let tree = SingleFeatureTree::fit(&train_x, &train_y);

            let fold_mae = (start..end).map(|i| (tree.predict(x[i]) - y[i]).abs()).sum::<f64>() / size as f64;
            total += fold_mae;
            start = end;
        }

        total / folds as f64
    }
}

impl AssociationScore for PredictivePowerScore {
    fn name(&self) -> &'static str {
        "predictive_power_score"
    }

    fn score(&self, x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return 0.0;
        }
        if x == y {
            return 1.0;
        }
        if y.iter().all(|v| *v == y[0]) {
            return 0.0;
        }

        let mut rows: Vec<usize> = (0..x.len()).collect();
        rows.shuffle(&mut ChaCha8Rng::seed_from_u64(self.seed));
        rows.truncate(self.sample_size.max(2));
        let xs: Vec<f64> = rows.iter().map(|&i| x[i]).collect();
        let ys: Vec<f64> = rows.iter().map(|&i| y[i]).collect();

        let mut sorted = ys.clone();
        sorted.sort_by(f64::total_cmp);
        let median = feature_engine::statistics::quantile_sorted(&sorted, 0.5);
        let baseline = ys.iter().map(|v| (v - median).abs()).sum::<f64>() / ys.len() as f64;
        if baseline == 0.0 {
            return 0.0;
        }

        let model = self.cross_validated_mae(&xs, &ys);
        if model >= baseline {
            0.0
        } else {
            1.0 - model / baseline
        }
    }
}
