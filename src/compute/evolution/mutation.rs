//! JADE "current-to-pbest/1" mutation with an archive-augmented difference term.

use crate::schema::{PopulationState, clip_stratval};

use super::archive::StrategyArchive;
use super::rng::DeRng;

/// A freshly synthesized challenger and the donors it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mutant {
    /// Incumbent for the next generation.
    pub s0_index: usize,
    /// Donor drawn from the elite set.
    pub s_best: f64,
    /// Incumbent value.
    pub s0: f64,
    /// Second population donor.
    pub s1: f64,
    /// Donor drawn from the remaining population and the archive.
    pub s2: f64,
    /// Clipped challenger value.
    pub value: f64,
}

/// Slot indices ranked by pps, best first, truncated to `count` (at least one).
///
/// Ties keep index order.
pub fn elite_indices(population: &PopulationState, count: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..population.len()).collect();
    ranked.sort_by(|&a, &b| population.slot(b).pps.total_cmp(&population.slot(a).pps));
    ranked.truncate(count.max(1));
    ranked
}

/// `s0 + F * (s_best - s0) + F * (s1 - s2)`, clipped to `[-1, 1]`.
#[inline]
pub fn jade_value(s0: f64, s_best: f64, s1: f64, s2: f64, f: f64) -> f64 {
    clip_stratval(s0 + f * (s_best - s0) + f * (s1 - s2))
}

/// Build the next challenger.
///
/// Every slot is shuffled; the incumbent is the first slot in that order other
/// than `snew_index`, whose value is about to be replaced. `s1` is the next slot
/// in the order, and `s2` comes from the slots after it pooled with the archive.
pub fn mutate(
    population: &PopulationState,
    archive: &StrategyArchive,
    snew_index: usize,
    f: f64,
    elite_count: usize,
    rng: &mut DeRng,
) -> Mutant {
    let elite = elite_indices(population, elite_count);
    let best_index = rng.choose(&elite).unwrap_or(elite[0]);
    let s_best = population.stratval(best_index);

    let mut order: Vec<usize> = (0..population.len()).collect();
    rng.shuffle(&mut order);

    let first = order.iter().position(|&i| i != snew_index).unwrap_or(0);
    let s0_index = order.remove(first);
    let s0 = population.stratval(s0_index);
    let s1 = population.stratval(order[0]);

    let pool: Vec<f64> = order[1..]
        .iter()
        .map(|&i| population.stratval(i))
        .chain(archive.values().iter().copied())
        .collect();
    // k >= 4 leaves at least two population values in the pool
    let s2 = rng.choose(&pool).unwrap_or(s1);

    Mutant {
        s0_index,
        s_best,
        s0,
        s1,
        s2,
        value: jade_value(s0, s_best, s1, s2, f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn population(values: &[f64], pps: &[f64]) -> PopulationState {
        let mut pop = PopulationState::from_values(values).unwrap();
        for (i, &p) in pps.iter().enumerate() {
            pop.slot_mut(i).pps = p;
        }
        pop
    }

    #[test]
    fn test_elite_ranks_by_pps() {
        // Values deliberately disagree with the pps ordering.
        let pop = population(&[0.9, -0.5, 0.1, 0.7], &[0.0, 5.0, 3.0, -1.0]);
        assert_eq!(elite_indices(&pop, 2), vec![1, 2]);
        assert_eq!(elite_indices(&pop, 0), vec![1]);
        assert_eq!(elite_indices(&pop, 4), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_jade_value() {
        assert!((jade_value(0.0, 0.5, 0.2, 0.1, 0.5) - 0.3).abs() < 1e-12);
        assert_eq!(jade_value(0.9, 1.0, 1.0, -1.0, 1.0), 1.0);
        assert_eq!(jade_value(-0.9, -1.0, -1.0, 1.0, 1.0), -1.0);
    }

    #[test]
    fn test_mutate_roles() {
        let pop = population(&[-0.6, -0.2, 0.2, 0.6], &[1.0, 2.0, 3.0, 4.0]);
        let archive = StrategyArchive::new(4);
        let mut rng = DeRng::new(11);
        for _ in 0..64 {
            let m = mutate(&pop, &archive, 3, 0.5, 1, &mut rng);
            assert_ne!(m.s0_index, 3);
            assert_eq!(m.s0, pop.stratval(m.s0_index));
            assert_ne!(m.s1, m.s0);
            // Elite of one: slot 3 has the best pps.
            assert_eq!(m.s_best, 0.6);
            assert!(pop.stratvals().contains(&m.s2));
            assert_eq!(m.value, jade_value(m.s0, m.s_best, m.s1, m.s2, 0.5));
        }
    }

    #[test]
    fn test_mutate_draws_from_archive() {
        let pop = population(&[0.0, 0.1, 0.2, 0.3], &[0.0; 4]);
        let mut archive = StrategyArchive::new(4);
        for _ in 0..4 {
            archive.push(-0.75);
        }
        let mut rng = DeRng::new(5);
        let used_archive = (0..200).any(|_| mutate(&pop, &archive, 3, 0.5, 2, &mut rng).s2 == -0.75);
        assert!(used_archive);
    }

    #[test]
    fn test_challenger_slot_is_a_donor() {
        let pop = population(&[0.0, 0.1, 0.2, -0.9], &[0.0; 4]);
        let archive = StrategyArchive::new(4);
        let mut rng = DeRng::new(17);
        let draws = 3000;
        let (mut as_s1, mut as_s2) = (0, 0);
        for _ in 0..draws {
            let m = mutate(&pop, &archive, 3, 0.5, 2, &mut rng);
            assert_ne!(m.s0_index, 3);
            if m.s1 == -0.9 {
                as_s1 += 1;
            }
            if m.s2 == -0.9 {
                as_s2 += 1;
            }
        }
        // Expected share is one third for each role.
        assert!(as_s1 > draws / 5, "s1 from challenger slot {as_s1}/{draws}");
        assert!(as_s2 > draws / 5, "s2 from challenger slot {as_s2}/{draws}");
    }

    proptest! {
        #[test]
        fn mutant_stays_in_bounds(
            values in proptest::collection::vec(-1.0f64..=1.0, 4..12),
            f in 0.001f64..=1.0,
            seed in any::<u64>(),
        ) {
            let pop = PopulationState::from_values(&values).unwrap();
            let archive = StrategyArchive::new(values.len());
            let mut rng = DeRng::new(seed);
            let snew = values.len() - 1;
            let m = mutate(&pop, &archive, snew, f, 2, &mut rng);
            prop_assert!((-1.0..=1.0).contains(&m.value));
            prop_assert!(m.s0_index != snew);
        }
    }
}
