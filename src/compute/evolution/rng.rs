//! Seedable random source for every stochastic step of the controller.

use rand::prelude::*;
use rand_distr::{Cauchy, CauchyError};

use crate::schema::{STRATVAL_MAX, STRATVAL_MIN};

/// Scale of the Cauchy distribution the differential weight is drawn from.
pub const WEIGHT_SCALE: f64 = 0.1;

/// Random number generator wrapper for DE operations.
pub struct DeRng {
    rng: StdRng,
}

impl DeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform strategy value in `[-1, 1]`.
    pub fn uniform_stratval(&mut self) -> f64 {
        self.rng.gen_range(STRATVAL_MIN..=STRATVAL_MAX)
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Pick one element uniformly.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut self.rng).copied()
    }

    /// Draw a differential weight from `Cauchy(mu_f, 0.1)`.
    ///
    /// Non-positive draws are rejected and redrawn, and the accepted value is
    /// capped at 1. The loop is blocking and terminates almost surely: every
    /// draw is positive with probability at least one half for `mu_f >= 0`,
    /// and strictly positive probability for any finite `mu_f`.
    pub fn sample_weight(&mut self, mu_f: f64) -> Result<f64, CauchyError> {
        let cauchy = Cauchy::new(mu_f, WEIGHT_SCALE)?;
        loop {
            let value: f64 = self.rng.sample(cauchy);
            if value > 0.0 {
                return Ok(value.min(1.0));
            }
        }
    }

    /// Standard normal sample.
    pub fn standard_normal(&mut self) -> f64 {
        self.rng.sample(rand_distr::StandardNormal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_seeded_reproducible() {
        let mut a = DeRng::new(7);
        let mut b = DeRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.uniform_stratval(), b.uniform_stratval());
            assert_eq!(a.sample_weight(0.5).unwrap(), b.sample_weight(0.5).unwrap());
        }
    }

    #[test]
    fn test_uniform_stratval_bounds() {
        let mut rng = DeRng::new(1);
        for _ in 0..1000 {
            let v = rng.uniform_stratval();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = DeRng::new(1);
        assert_eq!(rng.choose::<f64>(&[]), None);
        assert_eq!(rng.choose(&[3.0]), Some(3.0));
    }

    proptest! {
        #[test]
        fn weight_always_in_unit_interval(mu_f in -1.0f64..2.0, seed in any::<u64>()) {
            let mut rng = DeRng::new(seed);
            for _ in 0..32 {
                let f = rng.sample_weight(mu_f).unwrap();
                prop_assert!(f > 0.0 && f <= 1.0, "F = {}", f);
            }
        }
    }
}
