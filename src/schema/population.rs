//! Population of strategy slots owned by the host trading strategy.

use serde::{Deserialize, Serialize};

/// Lower bound of the evolvable strategy value.
pub const STRATVAL_MIN: f64 = -1.0;
/// Upper bound of the evolvable strategy value.
pub const STRATVAL_MAX: f64 = 1.0;

/// Clip a strategy value to `[-1, 1]`.
#[inline]
pub fn clip_stratval(value: f64) -> f64 {
    value.clamp(STRATVAL_MIN, STRATVAL_MAX)
}

/// One candidate strategy and its most recent evaluation.
///
/// The strategy value only changes through [`PopulationState::set_stratval`],
/// which keeps it in `[-1, 1]`; the host is free to write `profit` and `pps`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategySlot {
    stratval: f64,
    start_t: f64,
    /// Profit realized since `start_t`.
    pub profit: f64,
    /// Profit per simulated time unit since `start_t`.
    pub pps: f64,
}

impl StrategySlot {
    /// Create a dormant slot holding `stratval`.
    pub fn new(stratval: f64) -> Self {
        Self {
            stratval: clip_stratval(stratval),
            start_t: 0.0,
            profit: 0.0,
            pps: 0.0,
        }
    }

    /// The evolvable parameter, in `[-1, 1]`.
    #[inline]
    pub fn stratval(&self) -> f64 {
        self.stratval
    }

    /// Simulation time at which the slot last became active.
    #[inline]
    pub fn start_t(&self) -> f64 {
        self.start_t
    }

    /// Start a fresh evaluation window at `time`.
    pub fn restart(&mut self, time: f64) {
        self.start_t = time;
        self.profit = 0.0;
        self.pps = 0.0;
    }
}

/// The host-owned population plus the index of the live slot.
///
/// Exactly one slot is active at a time; `activate` is the only way to move it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationState {
    slots: Vec<StrategySlot>,
    active: usize,
}

impl PopulationState {
    /// Build a population from initial strategy values; slot 0 starts active.
    ///
    /// Returns `None` for an empty value list.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            slots: values.iter().copied().map(StrategySlot::new).collect(),
            active: 0,
        })
    }

    /// Number of slots (k).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false for a constructed population.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the live slot.
    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The live slot.
    pub fn active(&self) -> &StrategySlot {
        &self.slots[self.active]
    }

    /// Mutable access to the live slot, for profit bookkeeping.
    pub fn active_mut(&mut self) -> &mut StrategySlot {
        &mut self.slots[self.active]
    }

    /// Make `index` the live slot and restart its evaluation window at `time`.
    pub fn activate(&mut self, index: usize, time: f64) {
        self.active = index;
        self.slots[index].restart(time);
    }

    /// All slots in order.
    pub fn slots(&self) -> &[StrategySlot] {
        &self.slots
    }

    /// Slot by index.
    pub fn slot(&self, index: usize) -> &StrategySlot {
        &self.slots[index]
    }

    /// Mutable slot by index.
    pub fn slot_mut(&mut self, index: usize) -> &mut StrategySlot {
        &mut self.slots[index]
    }

    /// Strategy value of a slot.
    #[inline]
    pub fn stratval(&self, index: usize) -> f64 {
        self.slots[index].stratval
    }

    /// Overwrite a slot's strategy value, clipped to `[-1, 1]`.
    pub fn set_stratval(&mut self, index: usize, value: f64) {
        self.slots[index].stratval = clip_stratval(value);
    }

    /// Snapshot of every strategy value.
    pub fn stratvals(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.stratval).collect()
    }

    /// Index of the slot with the highest pps (first one on ties).
    pub fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.pps > self.slots[best].pps {
                best = i;
            }
        }
        best
    }

    /// Mean and population standard deviation of the strategy values.
    pub fn stratval_stats(&self) -> (f64, f64) {
        let n = self.slots.len() as f64;
        let mean = self.slots.iter().map(|s| s.stratval).sum::<f64>() / n;
        let variance = self
            .slots
            .iter()
            .map(|s| (s.stratval - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, variance.sqrt())
    }
}
