//! Correlation Guard Policy

use crate::association::{AssociationScore, PredictivePowerScore};
use crate::DataQualityError;
use feature_engine::FeatureMatrix;
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Guard thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Feature/label scores must stay strictly below this
    pub label_threshold: f64,
    /// Feature pairs scoring above this count as redundant
    pub pair_threshold: f64,
    /// Redundant pairs tolerated
    pub max_pairs_above: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            label_threshold: 0.9,
            pair_threshold: 0.92,
            max_pairs_above: 0,
        }
    }
}

/// Association between one feature and the label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub feature: String,
    pub score: f64,
}

/// Association between two features, the stronger of both directions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub first: String,
    pub second: String,
    pub score: f64,
}

/// Every score computed by one guard run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub scorer: String,
    pub label_scores: Vec<FeatureScore>,
    pub pair_scores: Vec<PairScore>,
}

impl CorrelationReport {
    /// Features whose label score reaches the threshold
    pub fn leaking(&self, config: &GuardConfig) -> Vec<FeatureScore> {
        self.label_scores
            .iter()
            .filter(|s| s.score >= config.label_threshold)
            .cloned()
            .collect()
    }

    /// Feature pairs scoring above the pair threshold
    pub fn redundant(&self, config: &GuardConfig) -> Vec<PairScore> {
        self.pair_scores
            .iter()
            .filter(|s| s.score > config.pair_threshold)
            .cloned()
            .collect()
    }
}

/// Every offending feature and pair found by a failed guard run
#[derive(Debug, Clone, PartialEq)]
pub struct GateFailure {
    pub leaking: Vec<FeatureScore>,
    pub redundant: Vec<PairScore>,
    pub config: GuardConfig,
}

impl fmt::Display for GateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Data quality gate failed")?;
        if !self.leaking.is_empty() {
            write!(
                f,
                "\n  feature/label score >= {} (possible target leakage):",
                self.config.label_threshold
            )?;
            for s in &self.leaking {
                write!(f, "\n    - {}: {:.3}", s.feature, s.score)?;
            }
        }
        if self.redundant.len() > self.config.max_pairs_above {
            write!(
                f,
                "\n  {} feature pair(s) above {} (at most {} allowed):",
                self.redundant.len(),
                self.config.pair_threshold,
                self.config.max_pairs_above
            )?;
            for s in &self.redundant {
                write!(f, "\n    - {} ~ {}: {:.3}", s.first, s.second, s.score)?;
            }
        }
        Ok(())
    }
}

/// Feature/label and feature/feature association gate
pub struct CorrelationGuard<S: AssociationScore = PredictivePowerScore> {
    scorer: S,
    config: GuardConfig,
}

impl<S: AssociationScore> CorrelationGuard<S> {
    pub fn new(scorer: S, config: GuardConfig) -> Self {
        Self { scorer, config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Score every feature against the label and every feature pair
    pub fn score(&self, features: &FeatureMatrix, target: &Array1<f64>) -> Result<CorrelationReport, DataQualityError> {
        if features.n_rows() != target.len() {
            return Err(DataQualityError::LengthMismatch {
                features: features.n_rows(),
                target: target.len(),
            });
        }

        let columns: Vec<Vec<f64>> = features.values().columns().into_iter().map(|c| c.to_vec()).collect();
        let target = target.to_vec();
        let names = features.names();

        let label_scores = columns
            .par_iter()
            .zip(names.par_iter())
            .map(|(column, name)| FeatureScore {
                feature: name.clone(),
                score: self.scorer.score(column, &target),
            })
            .collect();

        let pairs: Vec<(usize, usize)> = (0..columns.len())
            .flat_map(|i| (i + 1..columns.len()).map(move |j| (i, j)))
            .collect();

        let pair_scores = pairs
            .par_iter()
            .map(|&(i, j)| PairScore {
                first: names[i].clone(),
                second: names[j].clone(),
                score: self
                    .scorer
                    .score(&columns[i], &columns[j])
                    .max(self.scorer.score(&columns[j], &columns[i])),
            })
            .collect();

        Ok(CorrelationReport {
            scorer: self.scorer.name().to_string(),
            label_scores,
            pair_scores,
        })
    }

    /// Run the gate; any leaking feature or too many redundant pairs is fatal
    pub fn check(&self, features: &FeatureMatrix, target: &Array1<f64>) -> Result<CorrelationReport, DataQualityError> {
        let report = self.score(features, target)?;
        let leaking = report.leaking(&self.config);
        let redundant = report.redundant(&self.config);

        info!(
            "Correlation guard ({}): {} features, {} pairs, {} leaking, {} redundant",
            report.scorer,
            report.label_scores.len(),
            report.pair_scores.len(),
            leaking.len(),
            redundant.len()
        );

        if !leaking.is_empty() || redundant.len() > self.config.max_pairs_above {
            let failure = GateFailure {
                leaking,
                redundant,
                config: self.config.clone(),
            };
            warn!("{}", failure);
            return Err(DataQualityError::Gate(failure));
        }

        Ok(report)
    }
}

impl Default for CorrelationGuard<PredictivePowerScore> {
    fn default() -> Self {
        Self::new(PredictivePowerScore::default(), GuardConfig::default())
    }
}
