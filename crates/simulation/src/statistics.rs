//! Statistics derived from a finished session.
//!
//! Everything here is a pure function of a [`SessionResult`] or a bankroll
//! history, so reports can be rebuilt from saved results.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::session::SessionResult;

/// Wins divided by losses, or [`WinLossRatio::Infinite`] when nothing was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinLossRatio {
    Finite(Decimal),
    /// No losses recorded.
    Infinite,
}

impl WinLossRatio {
    #[must_use]
    pub fn is_infinite(self) -> bool {
        matches!(self, WinLossRatio::Infinite)
    }
}

impl Serialize for WinLossRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WinLossRatio::Finite(ratio) => Serialize::serialize(ratio, serializer),
            WinLossRatio::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

impl fmt::Display for WinLossRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinLossRatio::Finite(ratio) => write!(f, "{ratio:.2}"),
            WinLossRatio::Infinite => f.write_str("∞ (no losses)"),
        }
    }
}

/// Summary statistics for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatistics {
    pub shooters: usize,
    pub final_bankroll: Decimal,
    /// Highest bankroll reached, including the starting 0.
    pub max_profit: Decimal,
    /// Lowest bankroll reached, including the starting 0.
    pub min_value: Decimal,
    /// Largest peak-to-trough fall, always >= 0.
    pub max_drawdown: Decimal,
    /// Final bankroll as a percentage of total risk.
    pub roi: Decimal,
    pub win_loss_ratio: WinLossRatio,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub total_risk: Decimal,
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
}

impl SessionStatistics {
    #[must_use]
    pub fn from_result(result: &SessionResult) -> Self {
        let history = &result.bankroll_history;
        let final_bankroll = result.final_bankroll();

        let max_profit = history.iter().copied().max().unwrap_or(Decimal::ZERO);
        let min_value = history.iter().copied().min().unwrap_or(Decimal::ZERO);

        Self {
            shooters: result.shooters(),
            final_bankroll,
            max_profit,
            min_value,
            max_drawdown: max_drawdown(history),
            roi: roi(final_bankroll, result.total_risk),
            win_loss_ratio: win_loss_ratio(result.wins, result.losses),
            wins: result.wins,
            losses: result.losses,
            pushes: result.pushes,
            total_risk: result.total_risk,
            max_win_streak: result.max_win_streak,
            max_loss_streak: result.max_loss_streak,
        }
    }
}

/// Largest drop from a running peak over the history.
#[must_use]
pub fn max_drawdown(history: &[Decimal]) -> Decimal {
    let Some(&first) = history.first() else {
        return Decimal::ZERO;
    };

    let mut peak = first;
    let mut max_dd = Decimal::ZERO;

    for &value in history {
        if value > peak {
            peak = value;
        }
        let drawdown = peak - value;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }

    max_dd
}

/// Return on total risk in percent; 0 when nothing was risked.
#[must_use]
pub fn roi(final_bankroll: Decimal, total_risk: Decimal) -> Decimal {
    if total_risk > Decimal::ZERO {
        final_bankroll / total_risk * dec!(100)
    } else {
        Decimal::ZERO
    }
}

#[must_use]
pub fn win_loss_ratio(wins: u32, losses: u32) -> WinLossRatio {
    if losses == 0 {
        WinLossRatio::Infinite
    } else {
        WinLossRatio::Finite(Decimal::from(wins) / Decimal::from(losses))
    }
}

/// Trailing moving average; the window is clamped at the start of the series.
#[must_use]
pub fn moving_average(history: &[Decimal], window: usize) -> Vec<Decimal> {
    let window = window.max(1);
    let mut averages = Vec::with_capacity(history.len());
    let mut sum = Decimal::ZERO;

    for (i, &value) in history.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= history[i - window];
        }
        let len = (i + 1).min(window);
        averages.push(sum / Decimal::from(len));
    }

    averages
}
