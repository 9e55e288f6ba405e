//! Configuration types for the adaptive DE controller and the simulated market.

use serde::{Deserialize, Serialize};

/// Smallest population the JADE rule can work with: an incumbent, a
/// challenger slot, and two further donors.
pub const MIN_POPULATION: usize = 4;

/// Constructor-time parameters of the adaptive DE controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeConfig {
    /// Initial differential weight F, used for the very first challenger.
    #[serde(default = "default_f")]
    pub f: f64,
    /// Population size k (must be at least 4).
    #[serde(default = "default_k")]
    pub k: usize,
    /// Learning rate c for the location of the weight distribution.
    #[serde(default = "default_c")]
    pub c: f64,
    /// Elite fraction p; the top `p * k` slots by pps are the "best" set.
    #[serde(default = "default_p")]
    pub p: f64,
    /// Initial location of the Cauchy weight distribution.
    #[serde(default = "default_mu_f")]
    pub mu_f: f64,
    /// Minimum simulated time a slot stays live before it can be judged.
    #[serde(default = "default_wait_time")]
    pub wait_time: f64,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            f: default_f(),
            k: default_k(),
            c: default_c(),
            p: default_p(),
            mu_f: default_mu_f(),
            wait_time: default_wait_time(),
            random_seed: None,
        }
    }
}

fn default_f() -> f64 {
    0.8
}
fn default_k() -> usize {
    4
}
fn default_c() -> f64 {
    0.1
}
fn default_p() -> f64 {
    0.5
}
fn default_mu_f() -> f64 {
    0.5
}
fn default_wait_time() -> f64 {
    7200.0
}

impl DeConfig {
    /// Number of elite slots: `floor(p * k)`, at least one.
    #[inline]
    pub fn elite_count(&self) -> usize {
        ((self.p * self.k as f64).floor() as usize).clamp(1, self.k.max(1))
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), DeConfigError> {
        if self.k < MIN_POPULATION {
            return Err(DeConfigError::PopulationTooSmall(self.k));
        }
        if !(self.f > 0.0 && self.f <= 1.0) {
            return Err(DeConfigError::InvalidWeight(self.f));
        }
        if !(self.c > 0.0 && self.c <= 1.0) {
            return Err(DeConfigError::InvalidLearningRate(self.c));
        }
        if !(self.p > 0.0 && self.p <= 1.0) {
            return Err(DeConfigError::InvalidEliteFraction(self.p));
        }
        if !self.mu_f.is_finite() {
            return Err(DeConfigError::InvalidMuF(self.mu_f));
        }
        if !(self.wait_time.is_finite() && self.wait_time >= 0.0) {
            return Err(DeConfigError::InvalidWaitTime(self.wait_time));
        }
        Ok(())
    }
}

/// Parameters of the toy market that pays the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Strategy value with the highest expected profit rate.
    #[serde(default = "default_optimum")]
    pub optimum: f64,
    /// Expected profit per time unit at the optimum.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Standard deviation of the per-step profit noise.
    #[serde(default = "default_noise")]
    pub noise: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            optimum: default_optimum(),
            scale: default_scale(),
            noise: default_noise(),
        }
    }
}

fn default_optimum() -> f64 {
    0.3
}
fn default_scale() -> f64 {
    1.0
}
fn default_noise() -> f64 {
    0.2
}

impl MarketConfig {
    /// Validate market parameters.
    pub fn validate(&self) -> Result<(), DeConfigError> {
        if !(-1.0..=1.0).contains(&self.optimum) {
            return Err(DeConfigError::InvalidMarket(format!(
                "optimum {} outside [-1, 1]",
                self.optimum
            )));
        }
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(DeConfigError::InvalidMarket(format!(
                "noise {} must be non-negative",
                self.noise
            )));
        }
        if !self.scale.is_finite() {
            return Err(DeConfigError::InvalidMarket(format!(
                "scale {} must be finite",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for a simulated trading session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Controller settings.
    #[serde(default)]
    pub de: DeConfig,
    /// Market settings.
    #[serde(default)]
    pub market: MarketConfig,
    /// Simulated time advanced per step.
    #[serde(default = "default_dt")]
    pub dt: f64,
}

fn default_dt() -> f64 {
    60.0
}

impl SessionConfig {
    /// Validate the whole session configuration.
    pub fn validate(&self) -> Result<(), DeConfigError> {
        self.de.validate()?;
        self.market.validate()?;
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(DeConfigError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum DeConfigError {
    #[error("Population size {0} is below the minimum of 4")]
    PopulationTooSmall(usize),
    #[error("Differential weight {0} must be in (0, 1]")]
    InvalidWeight(f64),
    #[error("Learning rate {0} must be in (0, 1]")]
    InvalidLearningRate(f64),
    #[error("Elite fraction {0} must be in (0, 1]")]
    InvalidEliteFraction(f64),
    #[error("Weight location {0} must be finite")]
    InvalidMuF(f64),
    #[error("Wait time {0} must be finite and non-negative")]
    InvalidWaitTime(f64),
    #[error("Time step {0} must be positive")]
    InvalidTimeStep(f64),
    #[error("Invalid market parameters: {0}")]
    InvalidMarket(String),
}
