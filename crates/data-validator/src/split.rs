//! Seeded Train/Test Split

use crate::error::DataError;
use crate::table::Table;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Split configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Share of rows assigned to training (0-1, exclusive)
    pub train_fraction: f64,
    /// Seed for the row permutation
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.7,
            seed: 123,
        }
    }
}

/// Training and test partitions of one table
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub train: Table,
    pub test: Table,
    /// Source row of each training row
    pub train_indices: Vec<usize>,
    /// Source row of each test row
    pub test_indices: Vec<usize>,
}

/// Partition a table into training and test subsets.
///
/// `floor(train_fraction * n)` rows go to training and the rest to test.
/// The permutation depends only on the seed and the row count.
pub fn train_test_split(table: &Table, config: &SplitConfig) -> Result<DatasetSplit, DataError> {
    if !(config.train_fraction > 0.0 && config.train_fraction < 1.0) {
        return Err(DataError::InvalidSplit(format!(
            "train fraction {} must be in (0, 1)",
            config.train_fraction
        )));
    }

    let n = table.n_rows();
    let n_train = (config.train_fraction * n as f64).floor() as usize;
    let n_test = n - n_train;
    if n_train == 0 || n_test == 0 {
        return Err(DataError::InvalidSplit(format!(
            "{} rows with train fraction {} leaves an empty subset",
            n, config.train_fraction
        )));
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    permutation.shuffle(&mut rng);

    let test_indices = permutation[..n_test].to_vec();
    let train_indices = permutation[n_test..].to_vec();

    info!("Split {} rows: train={}, test={} (seed={})", n, n_train, n_test, config.seed);

    Ok(DatasetSplit {
        train: table.take_rows(&train_indices),
        test: table.take_rows(&test_indices),
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use std::collections::HashSet;

    fn table(n: usize) -> Table {
        Table::new(vec![Column::integer("id", (0..n as i64).collect())]).unwrap()
    }

    #[test]
    fn test_five_rows_split_three_two() {
        let split = train_test_split(&table(5), &SplitConfig::default()).unwrap();
        assert_eq!(split.train.n_rows(), 3);
        assert_eq!(split.test.n_rows(), 2);
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let split = train_test_split(&table(100), &SplitConfig::default()).unwrap();
        let train: HashSet<_> = split.train_indices.iter().copied().collect();
        let test: HashSet<_> = split.test_indices.iter().copied().collect();
        assert_eq!(train.len(), 70);
        assert_eq!(test.len(), 30);
        assert!(train.is_disjoint(&test));
    }

    #[test]
    fn test_split_is_stable_for_seed() {
        let config = SplitConfig { train_fraction: 0.7, seed: 7 };
        let a = train_test_split(&table(40), &config).unwrap();
        let b = train_test_split(&table(40), &config).unwrap();
        assert_eq!(a.train_indices, b.train_indices);
        assert_eq!(a.train, b.train);

        let other = train_test_split(&table(40), &SplitConfig { seed: 8, ..config }).unwrap();
        assert_ne!(a.train_indices, other.train_indices);
    }

    #[test]
    fn test_rows_follow_indices() {
        let split = train_test_split(&table(10), &SplitConfig::default()).unwrap();
        let ids: Vec<usize> = split.test.integers("id").unwrap().iter().map(|&v| v as usize).collect();
        assert_eq!(ids, split.test_indices);
    }

    #[test]
    fn test_degenerate_splits_rejected() {
        assert!(train_test_split(&table(1), &SplitConfig::default()).is_err());
        let bad = SplitConfig { train_fraction: 1.0, seed: 1 };
        assert!(matches!(
            train_test_split(&table(10), &bad),
            Err(DataError::InvalidSplit(_))
        ));
    }
}
