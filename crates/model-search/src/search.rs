//! Randomized Hyperparameter Search

use crate::folds::KFold;
use crate::pipeline::GradePipeline;
use crate::ridge::Ridge;
use crate::SearchError;
use data_validator::Table;
use feature_engine::TransformPlan;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Search space and cross-validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of alpha values drawn
    pub n_iter: usize,
    /// Requested folds; clamped to the training row count
    pub cv_folds: usize,
    pub alpha_min: f64,
    pub alpha_max: f64,
    pub seed: u64,
    /// Shuffle rows before cutting folds (seeded by `seed`)
    pub shuffle_folds: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            n_iter: 100,
            cv_folds: 10,
            alpha_min: 1e-3,
            alpha_max: 1e3,
            seed: 123,
            shuffle_folds: false,
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<(), SearchError> {
        if self.n_iter == 0 {
            return Err(SearchError::InvalidConfig("n_iter must be at least 1".into()));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min.is_finite()) {
            return Err(SearchError::InvalidConfig(format!(
                "alpha_min must be positive, got {}",
                self.alpha_min
            )));
        }
        if !(self.alpha_max >= self.alpha_min && self.alpha_max.is_finite()) {
            return Err(SearchError::InvalidConfig(format!(
                "alpha range [{}, {}] is empty",
                self.alpha_min, self.alpha_max
            )));
        }
        Ok(())
    }
}

/// Cross-validated score of one sampled alpha
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub alpha: f64,
    /// Mean negative MAE over folds
    pub mean_test_score: f64,
    /// Population standard deviation of the fold scores
    pub std_test_score: f64,
    /// 1 for the best mean score; equal scores share a rank
    pub rank: usize,
}

/// Outcome of a search: the refitted best pipeline and every candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub pipeline: GradePipeline,
    pub best_alpha: f64,
    /// Best mean negative MAE
    pub best_score: f64,
    pub n_folds: usize,
    /// In draw order
    pub candidates: Vec<CandidateScore>,
}

impl SearchResult {
    /// Cross-validated MAE of the selected alpha
    pub fn best_mae(&self) -> f64 {
        -self.best_score
    }
}

struct FoldData {
    x_train: Array2<f64>,
    y_train: Array1<f64>,
    x_test: Array2<f64>,
    y_test: Array1<f64>,
}

/// Randomized search over ridge `alpha`, scored by k-fold negative MAE
#[derive(Debug, Clone, Default)]
pub struct RandomizedSearch {
    config: SearchConfig,
}

impl RandomizedSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Alpha candidates, log-uniform over the configured range, in draw order
    pub fn sample_alphas(&self) -> Vec<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let (lo, hi) = (self.config.alpha_min.ln(), self.config.alpha_max.ln());
        (0..self.config.n_iter)
            .map(|_| if lo < hi { rng.gen_range(lo..hi).exp() } else { self.config.alpha_min })
            .collect()
    }

    /// Tune `alpha` on the training table, then refit the transformer and the
    /// best model on all of it.
    ///
    /// Each fold refits the transformer on its own training rows, so held-out
    /// rows never inform scaling or vocabularies. The first candidate with the
    /// highest mean score wins.
    pub fn fit(&self, plan: &TransformPlan, estimator: &Ridge, table: &Table) -> Result<SearchResult, SearchError> {
        self.config.validate()?;

        let mut kfold = KFold::new(self.config.cv_folds);
        if self.config.shuffle_folds {
            kfold = kfold.shuffled(self.config.seed);
        }
        let folds = kfold.split(table.n_rows())?;
        let n_folds = folds.len();

        info!(
            "Randomized search: {} candidates x {} folds on {} rows",
            self.config.n_iter,
            n_folds,
            table.n_rows()
        );

        let fold_data = folds
            .par_iter()
            .map(|fold| {
                let train = table.take_rows(&fold.train);
                let test = table.take_rows(&fold.test);
                let fitted = plan.fit(&train)?;
                Ok(FoldData {
                    x_train: fitted.apply(&train)?.into_parts().1,
                    y_train: fitted.target(&train)?,
                    x_test: fitted.apply(&test)?.into_parts().1,
                    y_test: fitted.target(&test)?,
                })
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        let alphas = self.sample_alphas();
        let scores = alphas
            .par_iter()
            .map(|&alpha| {
                let ridge = estimator.with_alpha(alpha);
                fold_data
                    .iter()
                    .map(|fold| {
                        let model = ridge.fit(&fold.x_train, &fold.y_train)?;
                        let predictions = model.predict(&fold.x_test)?;
                        Ok(-mean_absolute_error(&fold.y_test, &predictions))
                    })
                    .collect::<Result<Vec<f64>, SearchError>>()
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        let summaries: Vec<(f64, f64)> = scores.iter().map(|s| mean_and_std(s)).collect();
        let candidates: Vec<CandidateScore> = alphas
            .iter()
            .zip(&summaries)
            .map(|(&alpha, &(mean, std))| CandidateScore {
                alpha,
                mean_test_score: mean,
                std_test_score: std,
                rank: 1 + summaries.iter().filter(|(other, _)| *other > mean).count(),
            })
            .collect();

        let mut best = 0;
        for (idx, candidate) in candidates.iter().enumerate() {
            debug!(
                "alpha={:.6} mean={:.4} std={:.4}",
                candidate.alpha, candidate.mean_test_score, candidate.std_test_score
            );
            if candidate.mean_test_score > candidates[best].mean_test_score {
                best = idx;
            }
        }
        let best_alpha = candidates[best].alpha;
        let best_score = candidates[best].mean_test_score;

        let transformer = plan.fit(table)?;
        let x = transformer.apply(table)?;
        let y = transformer.target(table)?;
        let model = estimator.with_alpha(best_alpha).fit(x.values(), &y)?;
        let pipeline = GradePipeline::new(transformer, model)?;

        info!(
            "Best alpha {:.6} with CV MAE {:.4} ({} features)",
            best_alpha,
            -best_score,
            pipeline.feature_names().len()
        );

        Ok(SearchResult {
            pipeline,
            best_alpha,
            best_score,
            n_folds,
            candidates,
        })
    }
}

fn mean_absolute_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let n = actual.len().max(1) as f64;
    actual.iter().zip(predicted.iter()).map(|(a, p)| (a - p).abs()).sum::<f64>() / n
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
