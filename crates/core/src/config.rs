use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::payout::OddsPayout;
use crate::strategy::{Point, PointBehavior, StrategyPreset};
use crate::strategy_config::{
    StrategyConfig, DEFAULT_BASE_BET, DEFAULT_ITERATIONS, DEFAULT_ODDS_MULTIPLIER,
    DEFAULT_REDUCED_BET,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationSettings,
    pub strategy: StrategySettings,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub iterations: usize,
    pub base_bet: Decimal,
    pub reduced_bet: Decimal,
    pub odds_multiplier: Decimal,
    pub odds_payout: OddsPayout,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
}

/// Point assignments as written in config files.
///
/// `preset` sets the baseline, `points` overrides individual numbers. Without
/// a preset, points missing from `points` keep the flat bet. A config with no
/// `[strategy]` section at all runs the classic preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySettings {
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub points: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Number of per-shooter log lines shown in reports.
    pub log_limit: usize,
    /// Trailing window of the bankroll moving average.
    pub moving_average_window: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            base_bet: DEFAULT_BASE_BET,
            reduced_bet: DEFAULT_REDUCED_BET,
            odds_multiplier: DEFAULT_ODDS_MULTIPLIER,
            odds_payout: OddsPayout::default(),
            seed: None,
        }
    }
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            preset: Some(StrategyPreset::Classic.name().to_string()),
            points: BTreeMap::new(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            log_limit: 100,
            moving_average_window: 50,
        }
    }
}

impl AppConfig {
    /// Validates the loaded settings and freezes them into a [`StrategyConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown preset, point or behavior, and
    /// for any value rejected by the builder.
    pub fn strategy_config(&self) -> Result<StrategyConfig, ConfigError> {
        let sim = &self.simulation;
        let baseline = match &self.strategy.preset {
            Some(name) => name.parse::<StrategyPreset>()?,
            None => StrategyPreset::Flat,
        };

        let mut builder = StrategyConfig::builder()
            .iterations(sim.iterations)
            .base_bet(sim.base_bet)
            .reduced_bet(sim.reduced_bet)
            .odds_multiplier(sim.odds_multiplier)
            .odds_payout(sim.odds_payout)
            .preset(baseline);

        for (point, behavior) in &self.strategy.points {
            builder = builder.point(point.parse::<Point>()?, behavior.parse::<PointBehavior>()?);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_config_yields_classic_strategy() {
        let config = AppConfig::default().strategy_config().unwrap();
        assert_eq!(config.points(), &StrategyPreset::Classic.strategy());
        assert_eq!(config.iterations(), 1000);
    }

    #[test]
    fn unlisted_points_keep_without_preset() {
        let mut app = AppConfig::default();
        app.strategy.preset = None;
        app.strategy.points = BTreeMap::from([("4".to_string(), "odds".to_string())]);

        let config = app.strategy_config().unwrap();
        assert_eq!(config.behavior(Point::Four), PointBehavior::Odds);
        assert_eq!(config.behavior(Point::Six), PointBehavior::Keep);
    }

    #[test]
    fn points_override_preset() {
        let mut app = AppConfig::default();
        app.strategy.preset = Some("lay-all".to_string());
        app.strategy.points = BTreeMap::from([("6".to_string(), "lower".to_string())]);

        let config = app.strategy_config().unwrap();
        assert_eq!(config.behavior(Point::Four), PointBehavior::Odds);
        assert_eq!(config.behavior(Point::Six), PointBehavior::Lower);
    }

    #[test]
    fn invalid_values_fail_before_simulation() {
        let mut app = AppConfig::default();
        app.simulation.base_bet = dec!(-10);
        assert!(matches!(
            app.strategy_config(),
            Err(ConfigError::NonPositiveAmount { field: "base_bet", .. })
        ));

        let mut app = AppConfig::default();
        app.strategy.points.insert("11".to_string(), "odds".to_string());
        assert_eq!(
            app.strategy_config(),
            Err(ConfigError::UnknownPoint("11".to_string()))
        );

        let mut app = AppConfig::default();
        app.strategy.preset = Some("martingale".to_string());
        assert_eq!(
            app.strategy_config(),
            Err(ConfigError::UnknownPreset("martingale".to_string()))
        );
    }

    #[test]
    fn strategy_section_without_preset_starts_flat() {
        let json = r#"{"strategy": {"points": {"4": "odds"}}}"#;
        let app: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(app.strategy.preset, None);
        let config = app.strategy_config().unwrap();
        assert_eq!(config.behavior(Point::Four), PointBehavior::Odds);
        assert_eq!(config.behavior(Point::Ten), PointBehavior::Keep);
    }

    #[test]
    fn deserializes_partial_json() {
        let json = r#"{"simulation": {"iterations": 50, "base_bet": 25}}"#;
        let app: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(app.simulation.iterations, 50);
        assert_eq!(app.simulation.base_bet, dec!(25));
        assert_eq!(app.simulation.reduced_bet, dec!(5));
        assert_eq!(app.report.log_limit, 100);
    }
}
