//! Adaptive differential evolution for online strategy tuning.
//!
//! A single scalar strategy value is tuned from realized profit, one
//! candidate pair at a time, because only one strategy can be live in the
//! market at once.
//!
//! # Overview
//!
//! - **Controller** (`controller`): two-phase evaluation scheduler, selection
//!   and generation turnover
//! - **Mutation** (`mutation`): JADE current-to-pbest/1 with archive
//! - **Adaptation** (`adaptation`): Lehmer-mean update of the weight location
//! - **Convergence guard** (`convergence`): reseeds a collapsed population
//! - **Archive** (`archive`): bounded pool of discarded values
//!
//! # Example
//!
//! ```rust,no_run
//! use jade_trader::compute::evolution::AdaptiveDe;
//! use jade_trader::schema::{DeConfig, DeSession, PopulationState};
//!
//! let config = DeConfig { random_seed: Some(7), wait_time: 60.0, ..Default::default() };
//! let mut population = PopulationState::from_values(&[-0.5, 0.0, 0.5, 0.9]).unwrap();
//! population.activate(0, 0.0);
//!
//! let mut de = AdaptiveDe::new(config, DeSession::new(0, 3), &population).unwrap();
//! for step in 1..=600 {
//!     let time = step as f64;
//!     population.active_mut().pps = 0.01; // host bookkeeping goes here
//!     de.on_tick(&mut population, time).unwrap();
//! }
//! println!("muF after {} generations: {:.3}", de.generation(), de.mu_f());
//! ```

mod adaptation;
mod archive;
mod controller;
mod convergence;
mod mutation;
mod rng;

pub use adaptation::{LEHMER_EPSILON, WeightAdapter, lehmer_mean};
pub use archive::StrategyArchive;
pub use controller::AdaptiveDe;
pub use convergence::{CONVERGENCE_THRESHOLD, guard_convergence};
pub use mutation::{Mutant, elite_indices, jade_value, mutate};
pub use rng::{DeRng, WEIGHT_SCALE};

use crate::schema::{DeConfigError, UnknownStateError};

/// Fatal controller conditions the host must decide how to handle.
#[derive(Debug, thiserror::Error)]
pub enum DeError {
    #[error("Population size {k} is too small for differential evolution (need at least 4)")]
    PopulationTooSmall { k: usize },
    #[error(transparent)]
    UnknownState(#[from] UnknownStateError),
    #[error("Population has {actual} slots but the controller expects {expected}")]
    PopulationMismatch { expected: usize, actual: usize },
    #[error("Invalid DE session: {0}")]
    InvalidSession(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] DeConfigError),
    #[error("Weight distribution error: {0}")]
    Weight(#[from] rand_distr::CauchyError),
}
