//! Single-Feature Regression Tree

/// Fully grown regression tree over one feature.
///
/// Grown without depth or leaf-size limits, every distinct feature value
/// ends in a leaf predicting the mean target seen at that value. Split
/// thresholds lie halfway between neighbouring values and ties go left, so
/// prediction is a lookup of the nearest training value.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleFeatureTree {
    /// Distinct training values, ascending
    values: Vec<f64>,
    /// Mean target for each distinct value
    leaf_means: Vec<f64>,
}

impl SingleFeatureTree {
    /// Fit on paired feature and target values
    pub fn fit(x: &[f64], y: &[f64]) -> Self {
        let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut values = Vec::new();
        let mut leaf_means = Vec::new();
        let mut start = 0;
        while start < pairs.len() {
            let value = pairs[start].0;
            let end = start + pairs[start..].iter().take_while(|p| p.0 == value).count();
            let sum: f64 = pairs[start..end].iter().map(|p| p.1).sum();
            values.push(value);
            leaf_means.push(sum / (end - start) as f64);
            start = end;
        }

        Self { values, leaf_means }
    }

    /// Predict the target for one feature value
    pub fn predict(&self, x: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let upper = self.values.partition_point(|v| *v < x);
        if upper == 0 {
            return self.leaf_means[0];
        }
        if upper == self.values.len() {
            return self.leaf_means[upper - 1];
        }
        if self.values[upper] == x {
            return self.leaf_means[upper];
        }
        let lower = upper - 1;
        let threshold = (self.values[lower] + self.values[upper]) / 2.0;
        if x <= threshold {
            self.leaf_means[lower]
        } else {
            self.leaf_means[upper]
        }
    }

    /// Number of leaves
    pub fn n_leaves(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_means_per_distinct_value() {
        let tree = SingleFeatureTree::fit(&[1.0, 1.0, 3.0], &[2.0, 4.0, 10.0]);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(1.0), 3.0);
        assert_eq!(tree.predict(3.0), 10.0);
    }

    #[test]
    fn test_nearest_value_with_ties_going_left() {
        let tree = SingleFeatureTree::fit(&[0.0, 10.0], &[1.0, 5.0]);
        assert_eq!(tree.predict(4.9), 1.0);
        assert_eq!(tree.predict(5.0), 1.0);
        assert_eq!(tree.predict(5.1), 5.0);
        assert_eq!(tree.predict(-100.0), 1.0);
        assert_eq!(tree.predict(100.0), 5.0);
    }

    #[test]
    fn test_empty_tree_predicts_zero() {
        let tree = SingleFeatureTree::fit(&[], &[]);
        assert_eq!(tree.predict(1.0), 0.0);
    }
}
