//! Resolution of one shooter for a Don't Pass bettor.
//!
//! ```text
//! ComeOut ── 7, 11 ──────────────▶ Loss (base bet)
//!    │ ──── 2, 3 ────────────────▶ Win  (base bet)
//!    │ ──── 12 ──────────────────▶ Push (no risk)
//!    └──── 4,5,6,8,9,10 ─▶ Point ── 7 ─────▶ Win  (wager + lay payout)
//!                            │ ──── point ─▶ Loss (wager + odds laid)
//!                            └──── other ─▶ roll again
//! ```
//!
//! Each point-phase roll ends the shooter with probability at least 1/4
//! (9/36 on 4/10, more elsewhere), so the loop terminates almost surely. A
//! ceiling of [`MAX_POINT_ROLLS`] turns a misbehaving dice source into an
//! error instead of a hang.

use dont_pass_core::{Point, PointBehavior, StrategyConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dice::DiceSource;
use crate::error::SimulationError;

/// Upper bound on point-phase rolls for a single shooter.
pub const MAX_POINT_ROLLS: u32 = 100_000;

/// How a shooter ended for the Don't Pass bettor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShooterResult {
    Win,
    Loss,
    Push,
}

/// Everything that happened to the bettor during one shooter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShooterOutcome {
    /// Come-out total.
    pub come_out: u8,
    /// Point established by the come-out, if any.
    pub point: Option<Point>,
    /// Behavior applied to the point, if one was established.
    pub behavior: Option<PointBehavior>,
    /// Total of the deciding roll (equals `come_out` when decided immediately).
    pub final_roll: u8,
    /// Number of dice rolls including the come-out.
    pub rolls: u32,
    /// Flat Don't Pass wager in action at the decision.
    pub wager: Decimal,
    /// Amount laid as odds (zero unless behavior is odds).
    pub odds_risk: Decimal,
    /// Bankroll change.
    pub delta: Decimal,
    /// Amount put at risk: wager plus odds, zero on a push.
    pub risk: Decimal,
    pub result: ShooterResult,
}

impl ShooterOutcome {
    fn come_out(total: u8, wager: Decimal, result: ShooterResult) -> Self {
        let (delta, risk) = match result {
            ShooterResult::Win => (wager, wager),
            ShooterResult::Loss => (-wager, wager),
            ShooterResult::Push => (Decimal::ZERO, Decimal::ZERO),
        };
        Self {
            come_out: total,
            point: None,
            behavior: None,
            final_roll: total,
            rolls: 1,
            wager,
            odds_risk: Decimal::ZERO,
            delta,
            risk,
            result,
        }
    }

    /// Human-readable summary for the session log.
    #[must_use]
    pub fn log_line(&self) -> String {
        match (self.point, self.result) {
            (None, ShooterResult::Push) => format!("Come-out {}: push", self.come_out),
            (None, ShooterResult::Win) => {
                format!("Come-out {}: win ${:.2}", self.come_out, self.delta)
            }
            (None, ShooterResult::Loss) => {
                format!("Come-out {}: lose ${:.2}", self.come_out, -self.delta)
            }
            (Some(point), ShooterResult::Win) => format!(
                "Point {} ({}) -> 7-out after {} rolls: win ${:.2}",
                point,
                self.behavior.unwrap_or_default(),
                self.rolls,
                self.delta
            ),
            (Some(point), _) => format!(
                "Point {} ({}) hit after {} rolls: lose ${:.2}",
                point,
                self.behavior.unwrap_or_default(),
                self.rolls,
                -self.delta
            ),
        }
    }
}

/// Resolves shooters against a frozen strategy.
#[derive(Debug, Clone, Copy)]
pub struct ShooterResolver<'a> {
    config: &'a StrategyConfig,
}

impl<'a> ShooterResolver<'a> {
    #[must_use]
    pub fn new(config: &'a StrategyConfig) -> Self {
        Self { config }
    }

    /// Plays one shooter from come-out to decision.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnreachablePoint`] if the dice produce a
    /// total outside the craps table, and
    /// [`SimulationError::RollLimitExceeded`] if the point is still open
    /// after [`MAX_POINT_ROLLS`] rolls.
    pub fn resolve<D>(&self, dice: &mut D) -> Result<ShooterOutcome, SimulationError>
    where
        D: DiceSource + ?Sized,
    {
        let base_bet = self.config.base_bet();
        let come_out = dice.roll().total();

        let point = match come_out {
            7 | 11 => {
                return Ok(ShooterOutcome::come_out(come_out, base_bet, ShooterResult::Loss))
            }
            2 | 3 => return Ok(ShooterOutcome::come_out(come_out, base_bet, ShooterResult::Win)),
            12 => return Ok(ShooterOutcome::come_out(come_out, base_bet, ShooterResult::Push)),
            total => Point::try_from(total).map_err(|_| SimulationError::UnreachablePoint(total))?,
        };

        let behavior = self.config.behavior(point);
        let (wager, odds_risk) = match behavior {
            PointBehavior::Keep => (base_bet, Decimal::ZERO),
            PointBehavior::Lower => (self.config.reduced_bet(), Decimal::ZERO),
            PointBehavior::Odds => {
                let odds_risk = base_bet
                    .checked_mul(self.config.odds_multiplier())
                    .ok_or(SimulationError::Overflow("odds risk"))?;
                (base_bet, odds_risk)
            }
        };
        let risk = wager
            .checked_add(odds_risk)
            .ok_or(SimulationError::Overflow("shooter risk"))?;

        let mut rolls = 1u32;
        let final_roll = loop {
            if rolls > MAX_POINT_ROLLS {
                return Err(SimulationError::RollLimitExceeded {
                    point,
                    rolls: rolls - 1,
                });
            }
            let total = dice.roll().total();
            rolls += 1;
            if total == 7 || total == point.value() {
                break total;
            }
        };

        let (delta, result) = if final_roll == 7 {
            let lay_win = if odds_risk > Decimal::ZERO {
                self.config
                    .odds_payout()
                    .lay_win(point, odds_risk)
                    .ok_or(SimulationError::Overflow("lay payout"))?
            } else {
                Decimal::ZERO
            };
            let delta = wager
                .checked_add(lay_win)
                .ok_or(SimulationError::Overflow("shooter win"))?;
            (delta, ShooterResult::Win)
        } else {
            (-risk, ShooterResult::Loss)
        };

        Ok(ShooterOutcome {
            come_out,
            point: Some(point),
            behavior: Some(behavior),
            final_roll,
            rolls,
            wager,
            odds_risk,
            delta,
            risk,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{Dice, DiceRoll, ScriptedDice};
    use dont_pass_core::{OddsPayout, PointStrategy, StrategyPreset};
    use rust_decimal_macros::dec;

    // ============================================================
    // Test Helpers
    // ============================================================

    fn config_with(points: PointStrategy) -> StrategyConfig {
        StrategyConfig::builder()
            .iterations(1)
            .base_bet(dec!(10))
            .reduced_bet(dec!(5))
            .odds_multiplier(dec!(2))
            .points(points)
            .build()
            .unwrap()
    }

    fn resolve(config: &StrategyConfig, totals: &[u8]) -> ShooterOutcome {
        let mut dice = ScriptedDice::from_totals(totals.iter().copied()).unwrap();
        ShooterResolver::new(config).resolve(&mut dice).unwrap()
    }

    /// Dice that always roll 5, so a point of 4 never resolves.
    struct StuckDice;

    impl DiceSource for StuckDice {
        fn roll(&mut self) -> DiceRoll {
            DiceRoll { die1: 2, die2: 3 }
        }
    }

    /// Dice reporting an impossible total.
    struct LoadedDice;

    impl DiceSource for LoadedDice {
        fn roll(&mut self) -> DiceRoll {
            DiceRoll { die1: 0, die2: 1 }
        }
    }

    // ============================================================
    // Come-out Tests
    // ============================================================

    #[test]
    fn come_out_seven_or_eleven_loses_base_bet() {
        let config = config_with(PointStrategy::default());
        for total in [7, 11] {
            let outcome = resolve(&config, &[total]);
            assert_eq!(outcome.delta, dec!(-10));
            assert_eq!(outcome.risk, dec!(10));
            assert_eq!(outcome.result, ShooterResult::Loss);
            assert_eq!(outcome.point, None);
        }
    }

    #[test]
    fn come_out_two_or_three_wins_base_bet() {
        let config = config_with(PointStrategy::default());
        for total in [2, 3] {
            let outcome = resolve(&config, &[total]);
            assert_eq!(outcome.delta, dec!(10));
            assert_eq!(outcome.risk, dec!(10));
            assert_eq!(outcome.result, ShooterResult::Win);
        }
    }

    #[test]
    fn come_out_twelve_pushes_with_zero_risk() {
        let config = config_with(PointStrategy::default());
        let outcome = resolve(&config, &[12]);
        assert_eq!(outcome.delta, Decimal::ZERO);
        assert_eq!(outcome.risk, Decimal::ZERO);
        assert_eq!(outcome.result, ShooterResult::Push);
        assert_eq!(outcome.rolls, 1);
    }

    // ============================================================
    // Point Behavior Tests
    // ============================================================

    #[test]
    fn keep_point_wins_base_bet_on_seven() {
        let config = config_with(PointStrategy::default());
        let outcome = resolve(&config, &[8, 5, 6, 7]);
        assert_eq!(outcome.point, Some(Point::Eight));
        assert_eq!(outcome.behavior, Some(PointBehavior::Keep));
        assert_eq!(outcome.delta, dec!(10));
        assert_eq!(outcome.risk, dec!(10));
        assert_eq!(outcome.rolls, 4);
    }

    #[test]
    fn odds_point_four_seven_out_wins_half_the_lay() {
        let config = config_with(StrategyPreset::LayAll.strategy());
        let outcome = resolve(&config, &[4, 9, 7]);
        assert_eq!(outcome.delta, dec!(20));
        assert_eq!(outcome.risk, dec!(30));
        assert_eq!(outcome.odds_risk, dec!(20));
        assert_eq!(outcome.result, ShooterResult::Win);
    }

    #[test]
    fn odds_point_four_repeated_loses_bet_and_lay() {
        let config = config_with(StrategyPreset::LayAll.strategy());
        let outcome = resolve(&config, &[4, 6, 4]);
        assert_eq!(outcome.delta, dec!(-30));
        assert_eq!(outcome.risk, dec!(30));
        assert_eq!(outcome.result, ShooterResult::Loss);
    }

    #[test]
    fn lower_point_six_uses_reduced_bet() {
        let config = config_with(StrategyPreset::LowerAll.strategy());

        let win = resolve(&config, &[6, 7]);
        assert_eq!(win.delta, dec!(5));
        assert_eq!(win.risk, dec!(5));

        let loss = resolve(&config, &[6, 6]);
        assert_eq!(loss.delta, dec!(-5));
        assert_eq!(loss.risk, dec!(5));
    }

    #[test]
    fn odds_risk_equals_bet_plus_multiple() {
        let config = StrategyConfig::builder()
            .base_bet(dec!(25))
            .odds_multiplier(dec!(3))
            .preset(StrategyPreset::LayAll)
            .build()
            .unwrap();
        let outcome = resolve(&config, &[9, 9]);
        assert_eq!(outcome.risk, dec!(25) + dec!(25) * dec!(3));
        assert_eq!(outcome.delta, -outcome.risk);
    }

    #[test]
    fn simplified_payout_ignores_point_true_odds() {
        let config = config_with(StrategyPreset::LayAll.strategy());
        let outcome = resolve(&config, &[6, 7]);
        // 10 flat + 20 laid paid at 1:2
        assert_eq!(outcome.delta, dec!(20));
    }

    #[test]
    fn true_odds_payout_uses_point_ratio() {
        let config = StrategyConfig::builder()
            .base_bet(dec!(10))
            .odds_multiplier(dec!(3))
            .odds_payout(OddsPayout::TrueOdds)
            .preset(StrategyPreset::LayAll)
            .build()
            .unwrap();

        // 30 laid on 6 pays 25
        assert_eq!(resolve(&config, &[6, 7]).delta, dec!(35));
        // 30 laid on 5 pays 20
        assert_eq!(resolve(&config, &[5, 7]).delta, dec!(30));
        // 30 laid on 10 pays 15
        assert_eq!(resolve(&config, &[10, 7]).delta, dec!(25));
    }

    #[test]
    fn come_out_loss_uses_base_bet_even_for_lower_strategy() {
        let config = config_with(StrategyPreset::LowerAll.strategy());
        assert_eq!(resolve(&config, &[7]).delta, dec!(-10));
    }

    // ============================================================
    // Termination and Invariant Tests
    // ============================================================

    #[test]
    fn unresolved_point_hits_roll_ceiling() {
        let config = config_with(PointStrategy::default());
        let mut opener = ScriptedDice::from_totals([4]).unwrap();
        // Come-out sets 4, then every roll is a 5.
        let mut dice = ChainDice {
            first: Some(&mut opener),
            rest: StuckDice,
        };
        let result = ShooterResolver::new(&config).resolve(&mut dice);
        assert_eq!(
            result,
            Err(SimulationError::RollLimitExceeded {
                point: Point::Four,
                rolls: MAX_POINT_ROLLS
            })
        );
    }

    struct ChainDice<'a> {
        first: Option<&'a mut ScriptedDice>,
        rest: StuckDice,
    }

    impl DiceSource for ChainDice<'_> {
        fn roll(&mut self) -> DiceRoll {
            match self.first.take() {
                Some(dice) => dice.roll(),
                None => self.rest.roll(),
            }
        }
    }

    #[test]
    fn impossible_total_is_reported() {
        let config = config_with(PointStrategy::default());
        let result = ShooterResolver::new(&config).resolve(&mut LoadedDice);
        assert_eq!(result, Err(SimulationError::UnreachablePoint(1)));
    }

    #[test]
    fn oversized_wagers_report_overflow() {
        let huge = |base_bet: Decimal, multiplier: Decimal, payout: OddsPayout| {
            StrategyConfig::builder()
                .iterations(1)
                .base_bet(base_bet)
                .odds_multiplier(multiplier)
                .odds_payout(payout)
                .preset(StrategyPreset::LayAll)
                .build()
                .unwrap()
        };
        let mut dice = ScriptedDice::from_totals([4, 7]).unwrap();

        let config = huge(Decimal::MAX / dec!(2), dec!(3), OddsPayout::Simplified);
        let result = ShooterResolver::new(&config).resolve(&mut dice);
        assert_eq!(result, Err(SimulationError::Overflow("odds risk")));

        let mut dice = ScriptedDice::from_totals([6, 7]).unwrap();
        let config = huge(Decimal::MAX / dec!(4), dec!(2), OddsPayout::TrueOdds);
        let result = ShooterResolver::new(&config).resolve(&mut dice);
        assert_eq!(result, Err(SimulationError::Overflow("lay payout")));
    }

    #[test]
    fn random_shooters_respect_risk_bounds() {
        let config = config_with(StrategyPreset::Classic.strategy());
        let resolver = ShooterResolver::new(&config);
        let mut dice = Dice::seeded(42);

        for _ in 0..5_000 {
            let outcome = resolver.resolve(&mut dice).unwrap();
            assert!(outcome.risk >= Decimal::ZERO);
            assert!(outcome.delta.abs() <= outcome.risk);
            if outcome.behavior == Some(PointBehavior::Odds) {
                assert_eq!(outcome.risk, dec!(10) + dec!(10) * dec!(2));
            }
        }
    }

    // ============================================================
    // Log Line Tests
    // ============================================================

    #[test]
    fn log_lines_describe_outcome() {
        let config = config_with(StrategyPreset::Classic.strategy());
        assert_eq!(resolve(&config, &[12]).log_line(), "Come-out 12: push");
        assert_eq!(resolve(&config, &[11]).log_line(), "Come-out 11: lose $10.00");
        assert_eq!(resolve(&config, &[3]).log_line(), "Come-out 3: win $10.00");
        assert_eq!(
            resolve(&config, &[4, 7]).log_line(),
            "Point 4 (odds) -> 7-out after 2 rolls: win $20.00"
        );
        assert_eq!(
            resolve(&config, &[6, 8, 6]).log_line(),
            "Point 6 (lower) hit after 3 rolls: lose $5.00"
        );
    }
}
