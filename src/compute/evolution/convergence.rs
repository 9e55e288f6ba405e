//! Guard against a population that has collapsed onto a single value.

use crate::schema::PopulationState;

use super::rng::DeRng;

/// Population standard deviation below which the population counts as converged.
pub const CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// Reseed one random slot with a uniform value if the population has collapsed.
///
/// Returns the index of the reseeded slot, if any.
pub fn guard_convergence(population: &mut PopulationState, rng: &mut DeRng) -> Option<usize> {
    let (_, std) = population.stratval_stats();
    if std >= CONVERGENCE_THRESHOLD {
        return None;
    }
    let index = rng.index(population.len());
    let value = rng.uniform_stratval();
    population.set_stratval(index, value);
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverse_population_untouched() {
        let mut pop = PopulationState::from_values(&[-0.5, 0.0, 0.5, 0.9]).unwrap();
        let before = pop.stratvals();
        let mut rng = DeRng::new(2);
        assert_eq!(guard_convergence(&mut pop, &mut rng), None);
        assert_eq!(pop.stratvals(), before);
    }

    #[test]
    fn test_collapsed_population_reseeded() {
        for seed in 0..16 {
            let mut pop = PopulationState::from_values(&[0.42; 5]).unwrap();
            let mut rng = DeRng::new(seed);
            let index = guard_convergence(&mut pop, &mut rng).unwrap();
            assert!(index < 5);
            assert!(pop.stratval_stats().1 > 0.0);
            assert!((-1.0..=1.0).contains(&pop.stratval(index)));
        }
    }

    #[test]
    fn test_nearly_collapsed_population_reseeded() {
        let mut pop = PopulationState::from_values(&[0.1, 0.10001, 0.1, 0.09999]).unwrap();
        let mut rng = DeRng::new(9);
        assert!(guard_convergence(&mut pop, &mut rng).is_some());
    }
}
