//! Validated, immutable input to a simulation run.
//!
//! # Example
//!
//! ```
//! use dont_pass_core::{Point, PointBehavior, StrategyConfig};
//! use rust_decimal_macros::dec;
//!
//! let config = StrategyConfig::builder()
//!     .iterations(500)
//!     .base_bet(dec!(10))
//!     .odds_multiplier(dec!(2))
//!     .point(Point::Four, PointBehavior::Odds)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.behavior(Point::Four), PointBehavior::Odds);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::payout::OddsPayout;
use crate::strategy::{Point, PointBehavior, PointStrategy, StrategyPreset};

pub const DEFAULT_ITERATIONS: usize = 1000;
/// Most shooters a single session may play.
pub const MAX_ITERATIONS: usize = 1_000_000;
pub const DEFAULT_BASE_BET: Decimal = dec!(10);
pub const DEFAULT_REDUCED_BET: Decimal = dec!(5);
pub const DEFAULT_ODDS_MULTIPLIER: Decimal = dec!(2);

/// Frozen strategy configuration.
///
/// Only obtainable through [`StrategyConfigBuilder::build`], so every instance
/// has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyConfig {
    iterations: usize,
    base_bet: Decimal,
    reduced_bet: Decimal,
    odds_multiplier: Decimal,
    odds_payout: OddsPayout,
    points: PointStrategy,
}

impl StrategyConfig {
    #[must_use]
    pub fn builder() -> StrategyConfigBuilder {
        StrategyConfigBuilder::default()
    }

    /// Number of shooters to simulate.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[must_use]
    pub fn base_bet(&self) -> Decimal {
        self.base_bet
    }

    #[must_use]
    pub fn reduced_bet(&self) -> Decimal {
        self.reduced_bet
    }

    #[must_use]
    pub fn odds_multiplier(&self) -> Decimal {
        self.odds_multiplier
    }

    #[must_use]
    pub fn odds_payout(&self) -> OddsPayout {
        self.odds_payout
    }

    #[must_use]
    pub fn points(&self) -> &PointStrategy {
        &self.points
    }

    #[must_use]
    pub fn behavior(&self, point: Point) -> PointBehavior {
        self.points.behavior(point)
    }

    /// Returns a builder seeded with this configuration's values.
    #[must_use]
    pub fn to_builder(&self) -> StrategyConfigBuilder {
        StrategyConfigBuilder {
            iterations: self.iterations,
            base_bet: self.base_bet,
            reduced_bet: self.reduced_bet,
            odds_multiplier: self.odds_multiplier,
            odds_payout: self.odds_payout,
            points: self.points.clone(),
        }
    }

    /// Renders the strategy as a sentence.
    #[must_use]
    pub fn describe(&self) -> String {
        let list = |behavior: PointBehavior| {
            let points = self.points.points_with(behavior);
            if points.is_empty() {
                "-".to_string()
            } else {
                points
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        };

        let mut sentence = format!(
            "Bet ${} on Don't Pass each come-out. Odds points: {} (lay {}x). Lower points: {} (${}). Others: keep.",
            self.base_bet.normalize(),
            list(PointBehavior::Odds),
            self.odds_multiplier.normalize(),
            list(PointBehavior::Lower),
            self.reduced_bet.normalize(),
        );
        if self.odds_payout == OddsPayout::TrueOdds {
            sentence.push_str(" Lays are paid at true odds.");
        }
        sentence
    }
}

/// Builder for [`StrategyConfig`].
#[derive(Debug, Clone)]
pub struct StrategyConfigBuilder {
    iterations: usize,
    base_bet: Decimal,
    reduced_bet: Decimal,
    odds_multiplier: Decimal,
    odds_payout: OddsPayout,
    points: PointStrategy,
}

impl Default for StrategyConfigBuilder {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            base_bet: DEFAULT_BASE_BET,
            reduced_bet: DEFAULT_REDUCED_BET,
            odds_multiplier: DEFAULT_ODDS_MULTIPLIER,
            odds_payout: OddsPayout::default(),
            points: StrategyPreset::Classic.strategy(),
        }
    }
}

impl StrategyConfigBuilder {
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn base_bet(mut self, amount: Decimal) -> Self {
        self.base_bet = amount;
        self
    }

    #[must_use]
    pub fn reduced_bet(mut self, amount: Decimal) -> Self {
        self.reduced_bet = amount;
        self
    }

    #[must_use]
    pub fn odds_multiplier(mut self, multiplier: Decimal) -> Self {
        self.odds_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn odds_payout(mut self, payout: OddsPayout) -> Self {
        self.odds_payout = payout;
        self
    }

    /// Replaces all point assignments.
    #[must_use]
    pub fn points(mut self, points: PointStrategy) -> Self {
        self.points = points;
        self
    }

    /// Replaces all point assignments with a preset.
    #[must_use]
    pub fn preset(self, preset: StrategyPreset) -> Self {
        self.points(preset.strategy())
    }

    /// Reassigns a single point.
    #[must_use]
    pub fn point(mut self, point: Point, behavior: PointBehavior) -> Self {
        self.points = self.points.with(point, behavior);
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroIterations`] for zero shooters,
    /// [`ConfigError::TooManyIterations`] above [`MAX_ITERATIONS`] and
    /// [`ConfigError::NonPositiveAmount`] for any bet or multiplier that is
    /// not strictly positive.
    pub fn build(self) -> Result<StrategyConfig, ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        ensure_within_limit(self.iterations)?;
        ensure_positive("base_bet", self.base_bet)?;
        ensure_positive("reduced_bet", self.reduced_bet)?;
        ensure_positive("odds_multiplier", self.odds_multiplier)?;

        Ok(StrategyConfig {
            iterations: self.iterations,
            base_bet: self.base_bet,
            reduced_bet: self.reduced_bet,
            odds_multiplier: self.odds_multiplier,
            odds_payout: self.odds_payout,
            points: self.points,
        })
    }
}

fn ensure_positive(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveAmount { field, value })
    }
}

/// Parses a monetary or multiplier field from user input.
///
/// # Errors
///
/// Returns [`ConfigError::NotNumeric`] if `raw` is not a decimal number.
/// Positivity is checked later by the builder.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|_| ConfigError::NotNumeric {
            field,
            raw: raw.to_string(),
        })
}

/// Parses the shooter count from user input.
///
/// # Errors
///
/// Returns [`ConfigError::NotNumeric`] for anything that is not a whole
/// number, [`ConfigError::ZeroIterations`] for zero or negative counts and
/// [`ConfigError::TooManyIterations`] above [`MAX_ITERATIONS`].
pub fn parse_iterations(raw: &str) -> Result<usize, ConfigError> {
    let value: i64 = raw.trim().parse().map_err(|_| ConfigError::NotNumeric {
        field: "iterations",
        raw: raw.to_string(),
    })?;
    if value <= 0 {
        return Err(ConfigError::ZeroIterations);
    }
    let iterations = usize::try_from(value).map_err(|_| ConfigError::NotNumeric {
        field: "iterations",
        raw: raw.to_string(),
    })?;
    ensure_within_limit(iterations)?;
    Ok(iterations)
}

fn ensure_within_limit(iterations: usize) -> Result<(), ConfigError> {
    if iterations > MAX_ITERATIONS {
        return Err(ConfigError::TooManyIterations {
            value: iterations,
            max: MAX_ITERATIONS,
        });
    }
    Ok(())
}

/// Parses a `POINT=BEHAVIOR` assignment such as `6=lower`.
///
/// # Errors
///
/// Returns an error if either side is invalid or the `=` is missing.
pub fn parse_point_assignment(raw: &str) -> Result<(Point, PointBehavior), ConfigError> {
    let (point, behavior) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::UnknownPoint(raw.to_string()))?;
    Ok((point.parse()?, behavior.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Builder Validation Tests
    // ============================================================

    #[test]
    fn builder_defaults_are_valid() {
        let config = StrategyConfig::builder().build().unwrap();

        assert_eq!(config.iterations(), 1000);
        assert_eq!(config.base_bet(), dec!(10));
        assert_eq!(config.reduced_bet(), dec!(5));
        assert_eq!(config.odds_multiplier(), dec!(2));
        assert_eq!(config.odds_payout(), OddsPayout::Simplified);
        assert_eq!(config.behavior(Point::Four), PointBehavior::Odds);
        assert_eq!(config.behavior(Point::Six), PointBehavior::Lower);
    }

    #[test]
    fn builder_rejects_zero_iterations() {
        let result = StrategyConfig::builder().iterations(0).build();
        assert_eq!(result, Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn builder_rejects_iterations_above_limit() {
        assert!(StrategyConfig::builder().iterations(MAX_ITERATIONS).build().is_ok());

        let result = StrategyConfig::builder().iterations(usize::MAX).build();
        assert_eq!(
            result,
            Err(ConfigError::TooManyIterations {
                value: usize::MAX,
                max: MAX_ITERATIONS,
            })
        );
    }

    #[test]
    fn builder_rejects_non_positive_amounts() {
        let result = StrategyConfig::builder().base_bet(dec!(0)).build();
        assert_eq!(
            result,
            Err(ConfigError::NonPositiveAmount {
                field: "base_bet",
                value: dec!(0)
            })
        );

        let result = StrategyConfig::builder().reduced_bet(dec!(-5)).build();
        assert!(matches!(
            result,
            Err(ConfigError::NonPositiveAmount {
                field: "reduced_bet",
                ..
            })
        ));

        let result = StrategyConfig::builder().odds_multiplier(dec!(-0.5)).build();
        assert!(matches!(
            result,
            Err(ConfigError::NonPositiveAmount {
                field: "odds_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn to_builder_preserves_values() {
        let config = StrategyConfig::builder()
            .iterations(42)
            .preset(StrategyPreset::LayAll)
            .odds_payout(OddsPayout::TrueOdds)
            .build()
            .unwrap();

        let copy = config.to_builder().build().unwrap();
        assert_eq!(copy, config);
    }

    // ============================================================
    // Parsing Tests
    // ============================================================

    #[test]
    fn parse_amount_accepts_decimals() {
        assert_eq!(parse_amount("base_bet", " 12.50 "), Ok(dec!(12.50)));
    }

    #[test]
    fn parse_amount_rejects_non_numeric() {
        assert_eq!(
            parse_amount("base_bet", "ten"),
            Err(ConfigError::NotNumeric {
                field: "base_bet",
                raw: "ten".to_string()
            })
        );
    }

    #[test]
    fn parse_iterations_rejects_zero_and_negative() {
        assert_eq!(parse_iterations("0"), Err(ConfigError::ZeroIterations));
        assert_eq!(parse_iterations("-3"), Err(ConfigError::ZeroIterations));
        assert_eq!(parse_iterations("250"), Ok(250));
        assert!(matches!(
            parse_iterations("1000001"),
            Err(ConfigError::TooManyIterations { value: 1_000_001, .. })
        ));
        assert!(matches!(
            parse_iterations("1e3"),
            Err(ConfigError::NotNumeric { .. })
        ));
    }

    #[test]
    fn parse_point_assignment_splits_on_equals() {
        assert_eq!(
            parse_point_assignment("6=lower"),
            Ok((Point::Six, PointBehavior::Lower))
        );
        assert!(parse_point_assignment("6lower").is_err());
        assert!(parse_point_assignment("7=odds").is_err());
    }

    // ============================================================
    // Describe Tests
    // ============================================================

    #[test]
    fn describe_classic_strategy() {
        let config = StrategyConfig::builder().build().unwrap();
        assert_eq!(
            config.describe(),
            "Bet $10 on Don't Pass each come-out. Odds points: 4, 10 (lay 2x). \
             Lower points: 5, 6, 8, 9 ($5). Others: keep."
        );
    }

    #[test]
    fn describe_marks_empty_lists() {
        let config = StrategyConfig::builder()
            .preset(StrategyPreset::Flat)
            .build()
            .unwrap();
        let sentence = config.describe();
        assert!(sentence.contains("Odds points: - (lay 2x)"));
        assert!(sentence.contains("Lower points: - ($5)"));
    }

    #[test]
    fn describe_mentions_true_odds() {
        let config = StrategyConfig::builder()
            .odds_payout(OddsPayout::TrueOdds)
            .build()
            .unwrap();
        assert!(config.describe().ends_with("Lays are paid at true odds."));
    }
}
