pub mod config;
pub mod config_loader;
pub mod config_watcher;
pub mod error;
pub mod payout;
pub mod strategy;
pub mod strategy_config;

pub use config::{AppConfig, ReportSettings, SimulationSettings, StrategySettings};
pub use config_loader::ConfigLoader;
pub use config_watcher::ConfigWatcher;
pub use error::ConfigError;
pub use payout::OddsPayout;
pub use strategy::{Point, PointBehavior, PointStrategy, StrategyEditor, StrategyPreset};
pub use strategy_config::{
    parse_amount, parse_iterations, parse_point_assignment, StrategyConfig, StrategyConfigBuilder,
    MAX_ITERATIONS,
};
