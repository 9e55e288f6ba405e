//! JADE Trader - adaptive differential evolution for online strategy tuning.
//!
//! This crate tunes the single strategy parameter of a trading agent inside a
//! market simulation. Fitness is realized profit per unit of simulated time,
//! which is noisy and only observable for the one strategy that is live, so
//! the controller runs an online A/B evaluation of one incumbent/challenger
//! pair per generation and adapts its mutation weight from the history of
//! successful replacements.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, population, session and history types
//! - `compute`: The adaptive DE controller, the host strategy and a toy market
//!
//! # Example
//!
//! ```rust,no_run
//! use jade_trader::{compute::run_session, schema::SessionConfig};
//!
//! let mut config = SessionConfig::default();
//! config.de.random_seed = Some(42);
//!
//! let summary = run_session(&config, 10_000).unwrap();
//! println!(
//!     "{} generations, best strategy value {:.3}",
//!     summary.history.generations(),
//!     summary.best_stratval()
//! );
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{AdaptiveDe, DeError, StrategyHolder, run_session};
pub use schema::{DeConfig, DeSession, PopulationState, SessionConfig};
