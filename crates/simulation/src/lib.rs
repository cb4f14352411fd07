pub mod dice;
pub mod error;
pub mod monte_carlo;
pub mod numeric;
pub mod session;
pub mod shooter;
pub mod statistics;

pub use dice::{Dice, DiceRoll, DiceSource, ScriptedDice};
pub use error::SimulationError;
pub use monte_carlo::{DistributionSummary, MonteCarloConfig, MonteCarloRunner, StrategyComparison};
pub use session::{Session, SessionResult, SessionRunner, StreakTracker};
pub use shooter::{ShooterOutcome, ShooterResolver, ShooterResult, MAX_POINT_ROLLS};
pub use statistics::{
    max_drawdown, moving_average, roi, win_loss_ratio, SessionStatistics, WinLossRatio,
};
