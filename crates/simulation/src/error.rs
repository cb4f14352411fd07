use dont_pass_core::{ConfigError, Point};
use thiserror::Error;

/// Errors reported by the simulation engine.
///
/// The engine never returns partial results: a session either completes every
/// shooter or fails with one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// A come-out total fell outside the enumerated craps table.
    #[error("dice total {0} cannot establish a point")]
    UnreachablePoint(u8),

    /// A scripted dice total outside 2..=12.
    #[error("dice total {0} is outside 2..=12")]
    InvalidRoll(u8),

    /// The point phase rolled more than the configured ceiling.
    #[error("point {point} unresolved after {rolls} rolls")]
    RollLimitExceeded { point: Point, rolls: u32 },

    /// A money sum or product left the `Decimal` range.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
