//! Schema module - Configuration, population and session types.

mod config;
mod history;
mod population;
mod session;

pub use config::*;
pub use history::*;
pub use population::*;
pub use session::*;
