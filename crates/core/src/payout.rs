//! Payout model for odds laid behind a Don't Pass bet.
//!
//! The simulator has always paid a won lay at half the amount laid on every
//! point, which is only correct for 4 and 10. True lay odds differ per point:
//!
//! ```text
//! 4 / 10 -> win 1 for every 2 laid
//! 5 / 9  -> win 2 for every 3 laid
//! 6 / 8  -> win 5 for every 6 laid
//! ```
//!
//! Both models are available; `Simplified` stays the default so existing
//! results are reproducible, and `TrueOdds` must be selected explicitly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::strategy::Point;

/// How a winning lay-odds wager is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsPayout {
    /// Pays 1:2 on every point.
    #[default]
    Simplified,
    /// Pays the true lay odds of the point.
    TrueOdds,
}

impl OddsPayout {
    /// Returns the (win, laid) ratio for a point.
    #[must_use]
    pub const fn ratio(self, point: Point) -> (u32, u32) {
        match self {
            OddsPayout::Simplified => (1, 2),
            OddsPayout::TrueOdds => match point {
                Point::Four | Point::Ten => (1, 2),
                Point::Five | Point::Nine => (2, 3),
                Point::Six | Point::Eight => (5, 6),
            },
        }
    }

    /// Amount won when a lay of `odds_risk` on `point` wins, or `None` when
    /// the payout falls outside the `Decimal` range.
    #[must_use]
    pub fn lay_win(self, point: Point, odds_risk: Decimal) -> Option<Decimal> {
        let (win, laid) = self.ratio(point);
        odds_risk
            .checked_mul(Decimal::from(win))?
            .checked_div(Decimal::from(laid))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OddsPayout::Simplified => "simplified",
            OddsPayout::TrueOdds => "true_odds",
        }
    }
}

impl FromStr for OddsPayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "simplified" => Ok(OddsPayout::Simplified),
            "true_odds" | "true" => Ok(OddsPayout::TrueOdds),
            _ => Err(ConfigError::UnknownPayoutModel(s.to_string())),
        }
    }
}

impl fmt::Display for OddsPayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
