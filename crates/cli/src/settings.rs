//! Layered Pipeline Configuration

use config::{Config, ConfigError, Environment, File};
use data_validator::SplitConfig;
use model_search::SearchConfig;
use quality_gate::{GuardConfig, PredictivePowerScore};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of configuration environment variables, e.g. `GRADE__SEARCH__N_ITER`
pub const ENV_PREFIX: &str = "GRADE";

/// Every tunable setting of a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub split: SplitConfig,
    pub search: SearchConfig,
    pub quality: GuardConfig,
    pub pps: PredictivePowerScore,
}

impl PipelineConfig {
    /// Layer defaults, an optional TOML file and `GRADE__*` variables
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&PipelineConfig::default())?);
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Use one seed for the split, the search and the guard
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split.seed = seed;
        self.search.seed = seed;
        self.pps.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.split.seed, 123);
        assert_eq!(config.split.train_fraction, 0.7);
        assert_eq!(config.search.n_iter, 100);
        assert_eq!(config.search.cv_folds, 10);
        assert_eq!(config.quality.label_threshold, 0.9);
        assert_eq!(config.quality.pair_threshold, 0.92);
        assert_eq!(config.quality.max_pairs_above, 0);
        assert_eq!(config.pps.cv_folds, 4);
        assert_eq!(config.pps.sample_size, 5000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(&path, "[search]\nn_iter = 7\nalpha_max = 10.0\n\n[quality]\nmax_pairs_above = 2\n").unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.search.n_iter, 7);
        assert_eq!(config.search.alpha_max, 10.0);
        assert_eq!(config.search.cv_folds, 10);
        assert_eq!(config.quality.max_pairs_above, 2);
        assert_eq!(config.split, PipelineConfig::default().split);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PipelineConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_seed_applies_everywhere() {
        let config = PipelineConfig::default().with_seed(9);
        assert_eq!((config.split.seed, config.search.seed, config.pps.seed), (9, 9, 9));
    }
}
