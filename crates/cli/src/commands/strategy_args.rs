//! Config file and command-line overrides shared by every command.

use anyhow::Result;
use clap::Args;

use dont_pass_core::config_loader::DEFAULT_CONFIG_PATH;
use dont_pass_core::{
    parse_amount, parse_iterations, parse_point_assignment, AppConfig, ConfigLoader, OddsPayout,
    StrategyConfig, StrategyPreset,
};

/// Strategy source: a config file plus optional overrides.
///
/// Numeric overrides are taken as text so a bad value is reported as a
/// configuration error naming the field.
#[derive(Args, Debug, Clone, Default)]
pub struct StrategyArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Profile overlay, loaded from Config.<profile>.toml next to the config file
    #[arg(long)]
    pub profile: Option<String>,

    /// Number of shooters per session
    #[arg(long)]
    pub iterations: Option<String>,

    /// Don't Pass bet on each come-out
    #[arg(long)]
    pub base_bet: Option<String>,

    /// Wager on points set to "lower"
    #[arg(long)]
    pub reduced_bet: Option<String>,

    /// Odds laid as a multiple of the base bet on points set to "odds"
    #[arg(long = "odds-mult")]
    pub odds_multiplier: Option<String>,

    /// Preset point map: flat, classic, lay-outside, lay-all, lower-all, lower-inside
    #[arg(long)]
    pub preset: Option<String>,

    /// Per-point behavior, e.g. --point 4=odds --point 6=lower (repeatable)
    #[arg(long = "point", value_name = "POINT=BEHAVIOR")]
    pub points: Vec<String>,

    /// Lay payout model: simplified, true_odds
    #[arg(long)]
    pub odds_payout: Option<String>,
}

impl StrategyArgs {
    /// Loads the config file (with profile overlay, if any).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        match &self.profile {
            Some(profile) => ConfigLoader::load_with_profile(&self.config, profile),
            None => ConfigLoader::load_from(&self.config),
        }
    }

    /// Loads the config and applies overrides: preset first, then points,
    /// then amounts.
    ///
    /// # Errors
    ///
    /// Returns an error for unreadable config or any invalid value.
    pub fn resolve(&self) -> Result<(AppConfig, StrategyConfig)> {
        let app = self.load_app_config()?;
        let config = self.apply(app.strategy_config()?)?;
        Ok((app, config))
    }

    /// Applies overrides on top of an already validated config.
    ///
    /// # Errors
    ///
    /// Returns an error for any invalid override.
    pub fn apply(&self, base: StrategyConfig) -> Result<StrategyConfig> {
        let mut builder = base.to_builder();

        if let Some(preset) = &self.preset {
            builder = builder.preset(preset.parse::<StrategyPreset>()?);
        }
        for raw in &self.points {
            let (point, behavior) = parse_point_assignment(raw)?;
            builder = builder.point(point, behavior);
        }
        if let Some(raw) = &self.iterations {
            builder = builder.iterations(parse_iterations(raw)?);
        }
        if let Some(raw) = &self.base_bet {
            builder = builder.base_bet(parse_amount("base_bet", raw)?);
        }
        if let Some(raw) = &self.reduced_bet {
            builder = builder.reduced_bet(parse_amount("reduced_bet", raw)?);
        }
        if let Some(raw) = &self.odds_multiplier {
            builder = builder.odds_multiplier(parse_amount("odds_multiplier", raw)?);
        }
        if let Some(raw) = &self.odds_payout {
            builder = builder.odds_payout(raw.parse::<OddsPayout>()?);
        }

        Ok(builder.build()?)
    }
}
