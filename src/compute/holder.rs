//! Host trading strategy that owns the population and feeds profit to the controller.

use crate::schema::{DeConfig, DeSession, DeState, PopulationState};

use super::evolution::{AdaptiveDe, DeError, DeRng};

/// A trading strategy whose single parameter is tuned by [`AdaptiveDe`].
///
/// The holder owns the population, credits realized profit to the live slot,
/// and exposes the live strategy value for quoting.
pub struct StrategyHolder {
    population: PopulationState,
    de: AdaptiveDe,
}

impl StrategyHolder {
    /// Seed `k` uniform strategy values and start evaluating slot 0 at `time`.
    ///
    /// Slot `k - 1` is reserved as the first challenger.
    pub fn new(config: DeConfig, time: f64) -> Result<Self, DeError> {
        config.validate()?;

        let mut rng = match config.random_seed {
            Some(seed) => DeRng::new(seed.wrapping_add(1)),
            None => DeRng::random(),
        };
        let values: Vec<f64> = (0..config.k).map(|_| rng.uniform_stratval()).collect();
        let population = PopulationState::from_values(&values).ok_or(DeError::PopulationTooSmall {
            k: values.len(),
        })?;

        let session = DeSession::new(0, config.k - 1);
        Self::with_population(config, population, session, time)
    }

    /// Adopt an existing population, activating the slot the session starts with.
    pub fn with_population(
        config: DeConfig,
        mut population: PopulationState,
        session: DeSession,
        time: f64,
    ) -> Result<Self, DeError> {
        let first = match session.state {
            DeState::EvaluatingS0 => session.s0_index,
            DeState::EvaluatingSNew => session.snew_index,
        };
        if first >= population.len() {
            return Err(DeError::InvalidSession(format!(
                "slot {first} out of range for k={}",
                population.len()
            )));
        }
        population.activate(first, time);
        let de = AdaptiveDe::new(config, session, &population)?;
        Ok(Self { population, de })
    }

    /// Rebuild a holder from persisted session parts.
    ///
    /// `state_name` is the serialized scheduler state (`"active_s0"` or
    /// `"active_snew"`).
    pub fn resume(
        config: DeConfig,
        population: PopulationState,
        s0_index: usize,
        snew_index: usize,
        state_name: &str,
        time: f64,
    ) -> Result<Self, DeError> {
        let session = DeSession::from_parts(s0_index, snew_index, state_name)?;
        Self::with_population(config, population, session, time)
    }

    /// Run one scheduler tick and return the live strategy value.
    pub fn respond(&mut self, time: f64) -> Result<f64, DeError> {
        self.de.on_tick(&mut self.population, time)?;
        Ok(self.stratval())
    }

    /// Credit `profit` realized at `time` to the live slot and refresh its pps.
    pub fn bookkeep(&mut self, time: f64, profit: f64) {
        let slot = self.population.active_mut();
        slot.profit += profit;
        let elapsed = time - slot.start_t();
        slot.pps = if elapsed > 0.0 {
            slot.profit / elapsed
        } else {
            0.0
        };
    }

    /// Live strategy value.
    pub fn stratval(&self) -> f64 {
        self.population.active().stratval()
    }

    /// The population.
    pub fn population(&self) -> &PopulationState {
        &self.population
    }

    /// The controller.
    pub fn controller(&self) -> &AdaptiveDe {
        &self.de
    }
}
