//! CLI commands for the Don't Pass simulator.

pub mod compare;
pub mod describe;
pub mod simulate;
pub mod strategy_args;
pub mod watch;

pub use compare::{run_compare, CompareArgs};
pub use describe::{run_describe, DescribeArgs};
pub use simulate::{run_simulate, SimulateArgs};
pub use strategy_args::StrategyArgs;
pub use watch::{run_watch, WatchArgs};
