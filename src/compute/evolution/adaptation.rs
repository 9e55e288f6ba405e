//! Success-history adaptation of the differential weight distribution.

/// Stand-in denominator when the successful weights sum to zero.
pub const LEHMER_EPSILON: f64 = 1e-4;

/// Lehmer mean `sum(f^2) / sum(f)` with a guarded denominator.
///
/// An empty list, or one summing to zero, yields 0 rather than a division error.
pub fn lehmer_mean(values: &[f64]) -> f64 {
    let sum_sq: f64 = values.iter().map(|f| f * f).sum();
    let mut sum: f64 = values.iter().sum();
    if sum == 0.0 {
        sum = LEHMER_EPSILON;
    }
    sum_sq / sum
}

/// Location `muF` of the weight distribution and the weights that won this generation.
#[derive(Debug, Clone)]
pub struct WeightAdapter {
    mu_f: f64,
    c: f64,
    successes: Vec<f64>,
}

impl WeightAdapter {
    pub fn new(mu_f: f64, c: f64) -> Self {
        Self {
            mu_f,
            c,
            successes: Vec::new(),
        }
    }

    /// Current location parameter.
    #[inline]
    pub fn mu_f(&self) -> f64 {
        self.mu_f
    }

    /// Weights recorded since the last update.
    pub fn successes(&self) -> &[f64] {
        &self.successes
    }

    /// Remember a weight whose challenger replaced its incumbent.
    pub fn record_success(&mut self, f: f64) {
        self.successes.push(f);
    }

    /// `muF <- (1 - c) * muF + c * lehmer_mean(successes)`, then forget the successes.
    pub fn update(&mut self) -> f64 {
        let mean = lehmer_mean(&self.successes);
        self.mu_f = (1.0 - self.c) * self.mu_f + self.c * mean;
        self.successes.clear();
        self.mu_f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lehmer_mean() {
        assert!((lehmer_mean(&[0.5]) - 0.5).abs() < 1e-12);
        // (0.25 + 1.0) / 1.5
        assert!((lehmer_mean(&[0.5, 1.0]) - 1.25 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_lehmer_mean_empty_is_finite() {
        let mean = lehmer_mean(&[]);
        assert!(mean.is_finite());
        assert_eq!(mean, 0.0);
    }

    #[test]
    fn test_update_low_pass() {
        let mut adapter = WeightAdapter::new(0.5, 0.1);
        adapter.record_success(0.9);
        let mu_f = adapter.update();
        assert!((mu_f - (0.9 * 0.5 + 0.1 * 0.9)).abs() < 1e-12);
        assert!(adapter.successes().is_empty());
    }

    #[test]
    fn test_update_without_successes_stays_finite() {
        let mut adapter = WeightAdapter::new(0.5, 0.1);
        for _ in 0..1000 {
            let mu_f = adapter.update();
            assert!(mu_f.is_finite());
            assert!(mu_f >= 0.0);
        }
    }
}
