//! Monte Carlo comparison of Don't Pass strategies.
//!
//! A single session is one sample path; comparing policies on one path says
//! little. [`MonteCarloRunner`] plays many independent sessions per strategy
//! and summarises the distribution of final bankroll and drawdown.
//!
//! # Example
//!
//! ```
//! use dont_pass_core::{StrategyConfig, StrategyPreset};
//! use dont_pass_simulation::{MonteCarloConfig, MonteCarloRunner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = MonteCarloRunner::new(MonteCarloConfig::new(50).with_seed(7));
//! let classic = StrategyConfig::builder()
//!     .iterations(100)
//!     .preset(StrategyPreset::Classic)
//!     .build()?;
//! let flat = classic.to_builder().preset(StrategyPreset::Flat).build()?;
//!
//! let rows = runner.compare(&[("classic".into(), classic), ("flat".into(), flat)])?;
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].n_sessions, 50);
//! assert!((0.0..=1.0).contains(&rows[0].prob_profit));
//! # Ok(())
//! # }
//! ```

use dont_pass_core::StrategyConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dice::Dice;
use crate::error::SimulationError;
use crate::numeric;
use crate::session::Session;
use crate::statistics::SessionStatistics;

/// Configuration for a Monte Carlo run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Sessions per strategy.
    pub n_sessions: usize,
    /// Master seed; per-session seeds are drawn from it.
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_sessions: 1_000,
            seed: None,
        }
    }
}

impl MonteCarloConfig {
    #[must_use]
    pub fn new(n_sessions: usize) -> Self {
        Self {
            n_sessions,
            ..Default::default()
        }
    }

    /// Sets a seed for reproducible comparisons.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Summary statistics for a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub min: Decimal,
    pub max: Decimal,
    pub mean: Decimal,
    /// 50th percentile.
    pub median: Decimal,
    /// Population standard deviation.
    pub std_dev: Decimal,
    /// 5th, 10th, 25th, 50th, 75th, 90th and 95th percentiles.
    pub percentiles: Vec<(f64, Decimal)>,
}

impl DistributionSummary {
    #[must_use]
    pub fn from_values(values: &[Decimal]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let mut sorted = values.to_vec();
        sorted.sort();

        let n = sorted.len();
        let mean = numeric::mean(&sorted);
        let median = numeric::percentile(&sorted, 0.50);

        let percentiles = [0.05, 0.10, 0.25, 0.50, 0.75, 0.90, 0.95]
            .into_iter()
            .map(|p| (p, numeric::percentile(&sorted, p)))
            .collect();

        Self {
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            std_dev: numeric::std_dev(&sorted, mean),
            percentiles,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::ZERO,
            mean: Decimal::ZERO,
            median: Decimal::ZERO,
            std_dev: Decimal::ZERO,
            percentiles: vec![],
        }
    }

    /// Looks up a stored percentile, falling back to the median.
    #[must_use]
    pub fn percentile(&self, p: f64) -> Decimal {
        self.percentiles
            .iter()
            .find(|(pct, _)| (*pct - p).abs() < 0.001)
            .map_or(self.median, |(_, value)| *value)
    }
}

/// Outcome distribution of one strategy across many sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub name: String,
    /// The strategy sentence.
    pub description: String,
    pub n_sessions: usize,
    /// Shooters per session.
    pub iterations: usize,
    pub final_bankroll: DistributionSummary,
    pub max_drawdown: DistributionSummary,
    /// Mean ROI in percent.
    pub mean_roi: Decimal,
    /// Share of sessions ending above 0.
    pub prob_profit: f64,
    /// Longest losing streak seen in any session.
    pub worst_loss_streak: u32,
}

/// Runs many sessions per strategy on shared seeds.
pub struct MonteCarloRunner {
    config: MonteCarloConfig,
    master_seed: u64,
}

impl MonteCarloRunner {
    /// Creates a runner. Without a configured seed a master seed is drawn
    /// once from entropy and shared by every strategy this runner simulates.
    #[must_use]
    pub fn new(config: MonteCarloConfig) -> Self {
        let master_seed = config
            .seed
            .unwrap_or_else(|| ChaCha8Rng::from_entropy().gen());
        Self {
            config,
            master_seed,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    #[must_use]
    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Per-session seeds, identical for every strategy.
    fn session_seeds(&self) -> impl Iterator<Item = u64> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.master_seed);
        (0..self.config.n_sessions).map(move |_| rng.gen())
    }

    /// Plays `n_sessions` sessions of one strategy.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimulationError`] raised by any session.
    pub fn simulate(
        &self,
        name: &str,
        config: &StrategyConfig,
    ) -> Result<StrategyComparison, SimulationError> {
        let n = self.config.n_sessions;
        let mut finals = Vec::with_capacity(n);
        let mut drawdowns = Vec::with_capacity(n);
        let mut roi_sum = Decimal::ZERO;
        let mut profitable = 0usize;
        let mut worst_loss_streak = 0u32;

        for seed in self.session_seeds() {
            let result = Session::new(config.clone(), Dice::seeded(seed)).run()?;
            let stats = SessionStatistics::from_result(&result);

            if stats.final_bankroll > Decimal::ZERO {
                profitable += 1;
            }
            roi_sum += stats.roi;
            worst_loss_streak = worst_loss_streak.max(stats.max_loss_streak);
            finals.push(stats.final_bankroll);
            drawdowns.push(stats.max_drawdown);
        }

        let comparison = StrategyComparison {
            name: name.to_string(),
            description: config.describe(),
            n_sessions: n,
            iterations: config.iterations(),
            final_bankroll: DistributionSummary::from_values(&finals),
            max_drawdown: DistributionSummary::from_values(&drawdowns),
            mean_roi: if n == 0 {
                Decimal::ZERO
            } else {
                roi_sum / Decimal::from(n)
            },
            prob_profit: if n == 0 {
                0.0
            } else {
                profitable as f64 / n as f64
            },
            worst_loss_streak,
        };

        debug!(
            strategy = name,
            mean_final = %comparison.final_bankroll.mean,
            prob_profit = comparison.prob_profit,
            "Simulated strategy"
        );

        Ok(comparison)
    }

    /// Simulates each named strategy in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimulationError`] raised by any strategy.
    pub fn compare(
        &self,
        strategies: &[(String, StrategyConfig)],
    ) -> Result<Vec<StrategyComparison>, SimulationError> {
        info!(
            strategies = strategies.len(),
            n_sessions = self.config.n_sessions,
            master_seed = self.master_seed,
            "Starting Monte Carlo comparison"
        );
        strategies
            .iter()
            .map(|(name, config)| self.simulate(name, config))
            .collect()
    }
}
