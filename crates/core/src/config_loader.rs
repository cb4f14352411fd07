use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";
pub const ENV_PREFIX: &str = "DONT_PASS_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging defaults, TOML, environment variables, and JSON.
    ///
    /// The optional `Config.json` is looked up next to the TOML file and only
    /// fills keys the other layers left unset.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration from an explicit TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::base(path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .join(Json::file(path.with_file_name("Config.json")))
            .extract()?;

        Ok(config)
    }

    /// Loads configuration with a profile overlay (`Config.{profile}.toml`
    /// next to the base file).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        let path = path.as_ref();
        let overlay = path.with_file_name(format!("Config.{profile}.toml"));

        let config: AppConfig = Self::base(path)
            .merge(Toml::file(overlay))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .join(Json::file(path.with_file_name("Config.json")))
            .extract()?;

        Ok(config)
    }

    // Strategy is left out of the seeded defaults: figment merges maps key by
    // key, so seeded points would leak into every file that sets a preset.
    // A missing `[strategy]` falls back to `StrategySettings::default()`.
    fn base(path: &Path) -> Figment {
        let defaults = AppConfig::default();
        Figment::new()
            .merge(Serialized::default("simulation", &defaults.simulation))
            .merge(Serialized::default("report", &defaults.report))
            .merge(Toml::file(path))
    }
}
