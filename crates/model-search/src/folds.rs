//! K-Fold Cross-Validation Splits

use crate::SearchError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// One train/test partition of row indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub index: usize,
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// K-fold splitter.
///
/// Rows are cut into `n_splits` contiguous test blocks; the first
/// `n % n_splits` blocks hold one extra row. Unshuffled by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KFold {
    pub n_splits: usize,
    pub shuffle: bool,
    pub seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            seed: 0,
        }
    }

    pub fn shuffled(self, seed: u64) -> Self {
        Self {
            shuffle: true,
            seed,
            ..self
        }
    }

    /// Folds actually produced for `n_samples` rows
    pub fn effective_splits(&self, n_samples: usize) -> usize {
        self.n_splits.min(n_samples)
    }

    /// Partition `0..n_samples`; asking for more folds than rows yields one
    /// fold per row
    pub fn split(&self, n_samples: usize) -> Result<Vec<Fold>, SearchError> {
        if self.n_splits < 2 {
            return Err(SearchError::InvalidConfig(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if n_samples < 2 {
            return Err(SearchError::InvalidConfig(format!(
                "cross-validation needs at least 2 rows, got {}",
                n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            indices.shuffle(&mut ChaCha8Rng::seed_from_u64(self.seed));
        }

        let k = self.effective_splits(n_samples);
        let mut folds = Vec::with_capacity(k);
        let mut current = 0;
        for index in 0..k {
            let size = n_samples / k + usize::from(index < n_samples % k);
            let test = indices[current..current + size].to_vec();
            let train = indices[..current]
                .iter()
                .chain(indices[current + size..].iter())
                .copied()
                .collect();
            folds.push(Fold { index, train, test });
            current += size;
        }

        Ok(folds)
    }
}

impl Default for KFold {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_sizes_front_loaded() {
        let folds = KFold::new(3).split(10).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(folds[0].test, vec![0, 1, 2, 3]);
        assert_eq!(folds[1].train, vec![0, 1, 2, 3, 7, 8, 9]);
    }

    #[test]
    fn test_clamped_to_row_count() {
        let folds = KFold::new(10).split(3).unwrap();
        assert_eq!(folds.len(), 3);
        assert!(folds.iter().all(|f| f.test.len() == 1 && f.train.len() == 2));
    }

    #[test]
    fn test_shuffled_is_seeded() {
        let a = KFold::new(4).shuffled(7).split(20).unwrap();
        let b = KFold::new(4).shuffled(7).split(20).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, KFold::new(4).split(20).unwrap());
    }

    #[test]
    fn test_invalid_requests() {
        assert!(KFold::new(1).split(10).is_err());
        assert!(KFold::new(5).split(1).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_every_row_tested_exactly_once(n in 2usize..200, k in 2usize..15, seed in any::<u64>()) {
                let folds = KFold::new(k).shuffled(seed).split(n).unwrap();
                let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.iter().copied()).collect();
                seen.sort_unstable();
                prop_assert_eq!(seen, (0..n).collect::<Vec<_>>());
                for fold in &folds {
                    prop_assert_eq!(fold.train.len() + fold.test.len(), n);
                }
            }
        }
    }
}
