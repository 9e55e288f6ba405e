//! Online adaptive DE controller: evaluation scheduling, selection and generation turnover.

use log::{debug, info, warn};

use crate::schema::{
    DeConfig, DeHistory, DeSession, DeState, GenerationReport, MIN_POPULATION, PopulationState,
};

use super::DeError;
use super::adaptation::WeightAdapter;
use super::archive::StrategyArchive;
use super::convergence::guard_convergence;
use super::mutation::mutate;
use super::rng::DeRng;

/// JADE-style controller that tunes one strategy value from live profit feedback.
///
/// Only one candidate can trade at a time, so each generation evaluates exactly
/// one pair: the incumbent `s0` for `wait_time`, then the challenger `s_new` for
/// `wait_time`. The population itself belongs to the host and is passed into
/// every tick.
pub struct AdaptiveDe {
    config: DeConfig,
    rng: DeRng,
    session: DeSession,
    archive: StrategyArchive,
    weights: WeightAdapter,
    f: f64,
    generation: usize,
    history: DeHistory,
}

impl AdaptiveDe {
    /// Create a controller for a host population.
    ///
    /// The host must already hold `config.k` slots, with `session.snew_index`
    /// pre-populated and distinct from `session.s0_index`, and the slot matching
    /// the session phase active.
    pub fn new(
        config: DeConfig,
        session: DeSession,
        population: &PopulationState,
    ) -> Result<Self, DeError> {
        config.validate()?;

        if population.len() != config.k {
            return Err(DeError::PopulationMismatch {
                expected: config.k,
                actual: population.len(),
            });
        }
        if session.s0_index >= config.k || session.snew_index >= config.k {
            return Err(DeError::InvalidSession(format!(
                "indices s0={} snew={} out of range for k={}",
                session.s0_index, session.snew_index, config.k
            )));
        }
        if session.s0_index == session.snew_index {
            return Err(DeError::InvalidSession(format!(
                "s0 and snew share slot {}",
                session.s0_index
            )));
        }
        let expected_active = match session.state {
            DeState::EvaluatingS0 => session.s0_index,
            DeState::EvaluatingSNew => session.snew_index,
        };
        if population.active_index() != expected_active {
            return Err(DeError::InvalidSession(format!(
                "slot {} is active but state {} expects slot {}",
                population.active_index(),
                session.state,
                expected_active
            )));
        }

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let rng = DeRng::new(seed);
        let archive = StrategyArchive::new(config.k);
        let weights = WeightAdapter::new(config.mu_f, config.c);
        let f = config.f;

        Ok(Self {
            config,
            rng,
            session,
            archive,
            weights,
            f,
            generation: 0,
            history: DeHistory::default(),
        })
    }

    /// Advance the scheduler at simulation time `time`.
    ///
    /// Returns the index of the slot that is live after the tick. Nothing
    /// happens until the live slot has been active for `wait_time`.
    pub fn on_tick(&mut self, population: &mut PopulationState, time: f64) -> Result<usize, DeError> {
        if population.len() < MIN_POPULATION {
            return Err(DeError::PopulationTooSmall {
                k: population.len(),
            });
        }
        if population.len() != self.config.k {
            return Err(DeError::PopulationMismatch {
                expected: self.config.k,
                actual: population.len(),
            });
        }

        let elapsed = time - population.active().start_t();
        if elapsed < self.config.wait_time {
            return Ok(population.active_index());
        }

        match self.session.state {
            DeState::EvaluatingS0 => {
                debug!(
                    "t={time}: s0 (slot {}) judged at pps={:.6}, switching to s_new (slot {})",
                    self.session.s0_index,
                    population.slot(self.session.s0_index).pps,
                    self.session.snew_index
                );
                population.activate(self.session.snew_index, time);
                self.session.state = DeState::EvaluatingSNew;
            }
            DeState::EvaluatingSNew => {
                self.complete_generation(population, time)?;
            }
        }

        Ok(population.active_index())
    }

    /// Selection, mutation, convergence guard and adaptation for a judged pair.
    fn complete_generation(
        &mut self,
        population: &mut PopulationState,
        time: f64,
    ) -> Result<(), DeError> {
        let s0_index = self.session.s0_index;
        let snew_index = self.session.snew_index;
        let s0_pps = population.slot(s0_index).pps;
        let snew_pps = population.slot(snew_index).pps;
        let f_used = self.f;

        let replaced = self.select(population);

        self.f = self.rng.sample_weight(self.weights.mu_f())?;
        let mutant = mutate(
            population,
            &self.archive,
            snew_index,
            self.f,
            self.config.elite_count(),
            &mut self.rng,
        );
        self.session.s0_index = mutant.s0_index;
        population.set_stratval(snew_index, mutant.value);

        let reseeded = guard_convergence(population, &mut self.rng);
        if let Some(index) = reseeded {
            warn!(
                "t={time}: population converged, reseeded slot {index} with {:.6}",
                population.stratval(index)
            );
        }

        population.activate(self.session.s0_index, time);
        self.session.state = DeState::EvaluatingS0;

        let mu_f = self.adapt();
        self.generation += 1;

        let (_, diversity) = population.stratval_stats();
        let report = GenerationReport {
            generation: self.generation,
            time,
            s0_index,
            snew_index,
            s0_pps,
            snew_pps,
            replaced,
            f_used,
            f_next: self.f,
            next_s0_index: self.session.s0_index,
            challenger: population.stratval(snew_index),
            reseeded,
            mu_f,
            archive_len: self.archive.len(),
            stratvals: population.stratvals(),
        };
        info!(
            "gen {}: {} (s0 pps={:.6}, s_new pps={:.6}), F={:.4}, muF={:.4}, next s0=slot {}, challenger={:.6}",
            report.generation,
            if replaced { "challenger won" } else { "incumbent held" },
            s0_pps,
            snew_pps,
            report.f_next,
            mu_f,
            report.next_s0_index,
            report.challenger
        );
        self.history.push(report, diversity);

        Ok(())
    }

    /// Keep the better of `s0` and `s_new`; ties go to the challenger.
    fn select(&mut self, population: &mut PopulationState) -> bool {
        let s0_index = self.session.s0_index;
        let snew_index = self.session.snew_index;

        if population.slot(snew_index).pps >= population.slot(s0_index).pps {
            self.archive.push(population.stratval(s0_index));
            let challenger = population.stratval(snew_index);
            population.set_stratval(s0_index, challenger);
            self.weights.record_success(self.f);
            true
        } else {
            false
        }
    }

    /// Prune the archive and move `muF` toward the Lehmer mean of this generation's successes.
    fn adapt(&mut self) -> f64 {
        let evicted = self.archive.prune(&mut self.rng);
        if evicted > 0 {
            debug!("archive pruned by {evicted} to {}", self.archive.len());
        }
        self.weights.update()
    }

    /// Controller configuration.
    pub fn config(&self) -> &DeConfig {
        &self.config
    }

    /// Current session state.
    pub fn session(&self) -> &DeSession {
        &self.session
    }

    /// Archive of discarded values.
    pub fn archive(&self) -> &StrategyArchive {
        &self.archive
    }

    /// Weight that produced the challenger currently under test.
    pub fn f(&self) -> f64 {
        self.f
    }

    /// Location of the weight distribution.
    pub fn mu_f(&self) -> f64 {
        self.weights.mu_f()
    }

    /// Completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Per-generation history.
    pub fn history(&self) -> &DeHistory {
        &self.history
    }
}
