//! Toy market and session driver - exercises the controller end to end.

use serde::{Deserialize, Serialize};

use crate::schema::{DeConfigError, DeHistory, MarketConfig, SessionConfig, StrategySlot};

use super::evolution::{DeError, DeRng};
use super::holder::StrategyHolder;

/// Noisy market whose expected profit rate peaks at `optimum`.
pub struct ToyMarket {
    config: MarketConfig,
    rng: DeRng,
}

impl ToyMarket {
    /// Create a market with its own random stream.
    pub fn new(config: MarketConfig, seed: Option<u64>) -> Result<Self, DeConfigError> {
        config.validate()?;
        let rng = seed.map(DeRng::new).unwrap_or_else(DeRng::random);
        Ok(Self { config, rng })
    }

    /// Expected profit per time unit for a strategy value.
    #[inline]
    pub fn expected_rate(&self, stratval: f64) -> f64 {
        self.config.scale * (1.0 - (stratval - self.config.optimum).powi(2))
    }

    /// Profit realized by trading `stratval` for `dt` time units.
    pub fn trade(&mut self, stratval: f64, dt: f64) -> f64 {
        let noise = self.config.noise * self.rng.standard_normal();
        (self.expected_rate(stratval) + noise) * dt
    }
}

/// Outcome of a simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Simulated time at the end of the session.
    pub end_time: f64,
    /// Profit realized over the whole session.
    pub total_profit: f64,
    /// Final population.
    pub slots: Vec<StrategySlot>,
    /// Slot with the highest last-measured pps.
    pub best_index: usize,
    /// Per-generation history of the controller.
    pub history: DeHistory,
}

impl SessionSummary {
    /// Strategy value of the best slot.
    pub fn best_stratval(&self) -> f64 {
        self.slots[self.best_index].stratval()
    }

    /// Mean strategy value of the final population.
    pub fn mean_stratval(&self) -> f64 {
        self.slots.iter().map(|s| s.stratval()).sum::<f64>() / self.slots.len() as f64
    }
}

/// Progress reported every step of a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionProgress {
    pub step: u64,
    pub time: f64,
    pub stratval: f64,
    pub generation: usize,
    pub mu_f: f64,
}

/// Run a session for `steps` market steps.
pub fn run_session(config: &SessionConfig, steps: u64) -> Result<SessionSummary, DeError> {
    run_session_with_callback(config, steps, |_| {})
}

/// Run a session, calling `callback` after every step.
pub fn run_session_with_callback<F>(
    config: &SessionConfig,
    steps: u64,
    callback: F,
) -> Result<SessionSummary, DeError>
where
    F: Fn(&SessionProgress),
{
    config.validate()?;

    // Separate stream from the controller's so market noise does not shift its draws.
    let market_seed = config.de.random_seed.map(|s| s ^ 0x9E37_79B9_7F4A_7C15);
    let mut market = ToyMarket::new(config.market.clone(), market_seed)?;
    let mut holder = StrategyHolder::new(config.de.clone(), 0.0)?;

    let mut time = 0.0;
    let mut total_profit = 0.0;
    for step in 1..=steps {
        time += config.dt;
        let profit = market.trade(holder.stratval(), config.dt);
        total_profit += profit;
        holder.bookkeep(time, profit);
        let stratval = holder.respond(time)?;

        callback(&SessionProgress {
            step,
            time,
            stratval,
            generation: holder.controller().generation(),
            mu_f: holder.controller().mu_f(),
        });
    }

    let population = holder.population();
    Ok(SessionSummary {
        end_time: time,
        total_profit,
        slots: population.slots().to_vec(),
        best_index: population.best_index(),
        history: holder.controller().history().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DeConfig;
    use std::cell::Cell;

    fn session(seed: u64) -> SessionConfig {
        SessionConfig {
            de: DeConfig {
                k: 6,
                wait_time: 600.0,
                random_seed: Some(seed),
                ..Default::default()
            },
            market: MarketConfig {
                optimum: 0.3,
                scale: 1.0,
                noise: 0.05,
            },
            dt: 60.0,
        }
    }

    #[test]
    fn test_expected_rate_peaks_at_optimum() {
        let market = ToyMarket::new(MarketConfig::default(), Some(1)).unwrap();
        let peak = market.expected_rate(0.3);
        assert!(peak > market.expected_rate(0.0));
        assert!(peak > market.expected_rate(0.6));
        assert!((peak - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_noiseless_trade() {
        let mut market = ToyMarket::new(
            MarketConfig {
                noise: 0.0,
                ..Default::default()
            },
            Some(1),
        )
        .unwrap();
        assert!((market.trade(0.3, 2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_market_rejected() {
        let config = MarketConfig {
            optimum: 2.0,
            ..Default::default()
        };
        assert!(ToyMarket::new(config, None).is_err());
    }

    #[test]
    fn test_session_runs_generations() {
        // 10 steps per evaluation window, 20 per generation.
        let summary = run_session(&session(3), 400).unwrap();
        assert_eq!(summary.history.generations(), 20);
        assert_eq!(summary.slots.len(), 6);
        assert!(summary.slots.iter().all(|s| (-1.0..=1.0).contains(&s.stratval())));
        assert!((summary.end_time - 24_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_session_reproducible() {
        let a = run_session(&session(9), 200).unwrap();
        let b = run_session(&session(9), 200).unwrap();
        assert_eq!(a.history.reports, b.history.reports);
        assert_eq!(a.total_profit, b.total_profit);
    }

    #[test]
    fn test_callback_every_step() {
        let calls = Cell::new(0u64);
        run_session_with_callback(&session(1), 25, |progress| {
            calls.set(calls.get() + 1);
            assert_eq!(progress.step, calls.get());
        })
        .unwrap();
        assert_eq!(calls.get(), 25);
    }
}
