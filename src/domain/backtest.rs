//! Backtest configuration and result aggregation.

use crate::domain::trade::{RiskMultipliers, Trade};
use serde::Serialize;

/// Stop / target distances used when simulating historical trades.
/// Tighter target than [`crate::domain::current_signal::SIGNAL_RISK`].
pub const BACKTEST_RISK: RiskMultipliers = RiskMultipliers {
    stop_atr: 2.0,
    target_atr: 2.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Only the last `lookback` bars are scanned for entries.
    pub lookback: usize,
    /// Bars a trade may stay open before it is closed as a timeout.
    pub max_hold_bars: usize,
    pub risk: RiskMultipliers,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            lookback: 100,
            max_hold_bars: 100,
            risk: BACKTEST_RISK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub winrate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub trades: Vec<Trade>,
}

impl BacktestResult {
    /// Summarise a trade list.
    ///
    /// Timeouts (profit 0) count as losses but are left out of `avg_loss`,
    /// which only averages strictly negative trades.
    pub fn from_trades(trades: Vec<Trade>) -> Self {
        let total_trades = trades.len();

        let mut wins = 0usize;
        let mut total_wins = 0.0_f64;
        let mut losing = 0usize;
        let mut total_losses = 0.0_f64;

        for trade in &trades {
            let profit = trade.profit_pct;
            if profit > 0.0 {
                wins += 1;
                total_wins += profit;
            } else if profit < 0.0 {
                losing += 1;
                total_losses += profit.abs();
            }
        }

        let losses = total_trades - wins;

        let winrate = if total_trades > 0 {
            wins as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let avg_win = if wins > 0 {
            total_wins / wins as f64
        } else {
            0.0
        };

        let avg_loss = if losing > 0 {
            total_losses / losing as f64
        } else {
            0.0
        };

        let profit_factor = if avg_loss > 0.0 {
            avg_win / avg_loss
        } else {
            0.0
        };

        BacktestResult {
            total_trades,
            wins,
            losses,
            winrate,
            avg_win,
            avg_loss,
            profit_factor,
            trades,
        }
    }

    pub fn empty() -> Self {
        Self::from_trades(Vec::new())
    }
}
