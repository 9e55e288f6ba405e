//! Compute module - Adaptive DE controller and the simulated host it drives.

pub mod evolution;
mod holder;
mod market;

pub use evolution::{AdaptiveDe, DeError, DeRng};
pub use holder::*;
pub use market::*;
