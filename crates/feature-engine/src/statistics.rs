//! Column Statistics

/// Summary statistics of a numeric column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSummary {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Median (50th percentile)
    pub median: f64,
    /// 25th percentile
    pub q1: f64,
    /// 75th percentile
    pub q3: f64,
}

impl ColumnSummary {
    /// Compute summary statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            mean: mean(values),
            std_dev: std_dev(values),
            median: quantile_sorted(&sorted, 0.5),
            q1: quantile_sorted(&sorted, 0.25),
            q3: quantile_sorted(&sorted, 0.75),
        }
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Quantile of sorted values with linear interpolation between neighbours
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let position = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = position.floor() as usize;
            let hi = position.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (position - lo as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = ColumnSummary::compute(&values);
        assert!((stats.mean - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_dev() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_quartiles_interpolate() {
        // Absence counts from the student fixture
        let stats = ColumnSummary::compute(&[4.0, 2.0, 10.0, 0.0, 25.0]);
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 10.0);
        assert_eq!(stats.iqr(), 8.0);

        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile_sorted(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile_sorted(&sorted, 0.75) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_values() {
        let stats = ColumnSummary::compute(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(quantile_sorted(&[], 0.5), 0.0);
    }
}
