//! Configuration errors raised before a simulation starts.

use rust_decimal::Decimal;
use thiserror::Error;

/// A strategy configuration that cannot be simulated.
///
/// Every variant is detected while building a [`StrategyConfig`](crate::StrategyConfig),
/// so a run never starts with a value that would poison the bankroll path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The number of shooters must be at least one.
    #[error("iterations must be greater than zero")]
    ZeroIterations,

    /// More shooters than a single session accepts.
    #[error("iterations must be at most {max}, got {value}")]
    TooManyIterations { value: usize, max: usize },

    /// A bet amount or multiplier is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A numeric field could not be parsed.
    #[error("{field} is not a number: '{raw}'")]
    NotNumeric {
        /// Name of the offending field.
        field: &'static str,
        /// The raw input.
        raw: String,
    },

    /// A point key outside {4, 5, 6, 8, 9, 10}.
    #[error("unknown point '{0}', expected one of 4, 5, 6, 8, 9, 10")]
    UnknownPoint(String),

    /// A point behavior other than keep/odds/lower.
    #[error("unknown point behavior '{0}', expected keep, odds or lower")]
    UnknownBehavior(String),

    /// A strategy preset name that does not exist.
    #[error("unknown strategy preset '{0}'")]
    UnknownPreset(String),

    /// An odds payout model name that does not exist.
    #[error("unknown odds payout model '{0}', expected simplified or true_odds")]
    UnknownPayoutModel(String),
}
