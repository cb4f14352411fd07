//! Session runner: a sequence of shooters against a running bankroll.
//!
//! A [`Session`] owns its frozen [`StrategyConfig`] and dice, so nothing
//! outside can change the policy once it has started. It can be advanced in
//! chunks to keep a caller responsive; chunking never changes the result.

use dont_pass_core::StrategyConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dice::{Dice, DiceSource};
use crate::error::SimulationError;
use crate::shooter::{ShooterOutcome, ShooterResolver};

/// Finished session as handed to statistics and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Bankroll after each shooter, starting at 0. Length is shooters + 1.
    pub bankroll_history: Vec<Decimal>,
    pub total_risk: Decimal,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
    /// One line per shooter, in order.
    pub log_lines: Vec<String>,
}

impl SessionResult {
    /// Number of shooters played.
    #[must_use]
    pub fn shooters(&self) -> usize {
        self.bankroll_history.len().saturating_sub(1)
    }

    /// Bankroll after the last shooter.
    #[must_use]
    pub fn final_bankroll(&self) -> Decimal {
        self.bankroll_history
            .last()
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Running win and loss streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakTracker {
    current_win: u32,
    current_loss: u32,
    max_win: u32,
    max_loss: u32,
}

impl StreakTracker {
    /// Records a shooter by the sign of its bankroll delta.
    pub fn record(&mut self, delta: Decimal) {
        if delta > Decimal::ZERO {
            self.current_win += 1;
            self.current_loss = 0;
            self.max_win = self.max_win.max(self.current_win);
        } else if delta < Decimal::ZERO {
            self.current_loss += 1;
            self.current_win = 0;
            self.max_loss = self.max_loss.max(self.current_loss);
        } else {
            self.current_win = 0;
            self.current_loss = 0;
        }
    }

    #[must_use]
    pub fn max_win(&self) -> u32 {
        self.max_win
    }

    #[must_use]
    pub fn max_loss(&self) -> u32 {
        self.max_loss
    }
}

/// An in-progress session.
#[derive(Debug)]
pub struct Session<D> {
    config: StrategyConfig,
    dice: D,
    bankroll: Decimal,
    history: Vec<Decimal>,
    total_risk: Decimal,
    wins: u32,
    losses: u32,
    pushes: u32,
    streaks: StreakTracker,
    log_lines: Vec<String>,
}

impl<D: DiceSource> Session<D> {
    /// Starts a session. The config is taken by value and never changes.
    #[must_use]
    pub fn new(config: StrategyConfig, dice: D) -> Self {
        let iterations = config.iterations();
        let mut history = Vec::with_capacity(iterations.saturating_add(1));
        history.push(Decimal::ZERO);
        Self {
            config,
            dice,
            bankroll: Decimal::ZERO,
            history,
            total_risk: Decimal::ZERO,
            wins: 0,
            losses: 0,
            pushes: 0,
            streaks: StreakTracker::default(),
            log_lines: Vec::with_capacity(iterations),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Shooters played so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.history.len() - 1
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.config.iterations().saturating_sub(self.completed())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    #[must_use]
    pub fn bankroll(&self) -> Decimal {
        self.bankroll
    }

    /// Plays up to `max_shooters` more shooters and returns how many were played.
    ///
    /// # Errors
    ///
    /// Propagates any [`SimulationError`] from shooter resolution. The session
    /// should be discarded after an error.
    pub fn advance(&mut self, max_shooters: usize) -> Result<usize, SimulationError> {
        let batch = max_shooters.min(self.remaining());
        for _ in 0..batch {
            let outcome = ShooterResolver::new(&self.config).resolve(&mut self.dice)?;
            self.apply(&outcome)?;
        }
        debug!(
            played = batch,
            completed = self.completed(),
            bankroll = %self.bankroll,
            "Advanced session"
        );
        Ok(batch)
    }

    fn apply(&mut self, outcome: &ShooterOutcome) -> Result<(), SimulationError> {
        self.bankroll = self
            .bankroll
            .checked_add(outcome.delta)
            .ok_or(SimulationError::Overflow("bankroll"))?;
        self.total_risk = self
            .total_risk
            .checked_add(outcome.risk)
            .ok_or(SimulationError::Overflow("total risk"))?;
        if outcome.delta > Decimal::ZERO {
            self.wins += 1;
        } else if outcome.delta < Decimal::ZERO {
            self.losses += 1;
        } else {
            self.pushes += 1;
        }
        self.streaks.record(outcome.delta);
        self.history.push(self.bankroll);
        self.log_lines.push(outcome.log_line());
        Ok(())
    }

    /// Plays every remaining shooter and returns the finished result.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimulationError`] hit; no partial result is produced.
    pub fn run(mut self) -> Result<SessionResult, SimulationError> {
        let remaining = self.remaining();
        self.advance(remaining)?;
        Ok(self.into_result())
    }

    fn into_result(self) -> SessionResult {
        SessionResult {
            bankroll_history: self.history,
            total_risk: self.total_risk,
            wins: self.wins,
            losses: self.losses,
            pushes: self.pushes,
            max_win_streak: self.streaks.max_win(),
            max_loss_streak: self.streaks.max_loss(),
            log_lines: self.log_lines,
        }
    }
}

/// Convenience entry points for running whole sessions.
pub struct SessionRunner;

impl SessionRunner {
    /// Runs `config.iterations()` shooters with the given dice.
    ///
    /// # Errors
    ///
    /// See [`Session::run`].
    pub fn run<D: DiceSource>(
        config: StrategyConfig,
        dice: D,
    ) -> Result<SessionResult, SimulationError> {
        info!(
            iterations = config.iterations(),
            base_bet = %config.base_bet(),
            odds_payout = %config.odds_payout(),
            "Starting session"
        );
        let result = Session::new(config, dice).run()?;
        info!(
            final_bankroll = %result.final_bankroll(),
            wins = result.wins,
            losses = result.losses,
            "Session complete"
        );
        Ok(result)
    }

    /// Runs a session on `ChaCha8` dice, seeded when `seed` is given.
    ///
    /// # Errors
    ///
    /// See [`Session::run`].
    pub fn run_seeded(
        config: StrategyConfig,
        seed: Option<u64>,
    ) -> Result<SessionResult, SimulationError> {
        Self::run(config, Dice::from_seed_or_entropy(seed))
    }
}
