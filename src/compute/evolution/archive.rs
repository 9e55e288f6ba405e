//! Archive of strategy values discarded by selection.

use super::rng::DeRng;

/// Bounded multiset of losing strategy values.
///
/// Entries are appended freely during a generation and trimmed back to
/// `max_size` by [`StrategyArchive::prune`].
#[derive(Debug, Clone, Default)]
pub struct StrategyArchive {
    values: Vec<f64>,
    max_size: usize,
}

impl StrategyArchive {
    /// Create an empty archive bounded to `max_size` entries after pruning.
    pub fn new(max_size: usize) -> Self {
        Self {
            values: Vec::with_capacity(max_size + 1),
            max_size,
        }
    }

    /// Add a discarded value.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Evict uniformly at random until at most `max_size` entries remain.
    ///
    /// Returns the number of evicted entries.
    pub fn prune(&mut self, rng: &mut DeRng) -> usize {
        if self.values.len() <= self.max_size {
            return 0;
        }
        let evicted = self.values.len() - self.max_size;
        rng.shuffle(&mut self.values);
        self.values.truncate(self.max_size);
        evicted
    }

    /// Archived values, in no particular order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Bound enforced by pruning.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get archive size.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if archive is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_under_bound_is_noop() {
        let mut archive = StrategyArchive::new(4);
        let mut rng = DeRng::new(3);
        archive.push(0.1);
        archive.push(0.2);
        assert_eq!(archive.prune(&mut rng), 0);
        assert_eq!(archive.values(), &[0.1, 0.2]);
    }

    #[test]
    fn test_prune_truncates_to_bound() {
        let mut archive = StrategyArchive::new(4);
        let mut rng = DeRng::new(3);
        let inserted = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        for v in inserted {
            archive.push(v);
        }
        assert_eq!(archive.prune(&mut rng), 2);
        assert_eq!(archive.len(), 4);
        assert!(archive.values().iter().all(|v| inserted.contains(v)));
    }

    #[test]
    fn test_prune_is_not_oldest_first() {
        // Over many seeds, the oldest entry must sometimes survive.
        let mut survived = false;
        for seed in 0..32 {
            let mut archive = StrategyArchive::new(4);
            let mut rng = DeRng::new(seed);
            for i in 0..5 {
                archive.push(i as f64);
            }
            archive.prune(&mut rng);
            if archive.values().contains(&0.0) {
                survived = true;
                break;
            }
        }
        assert!(survived);
    }
}
