//! Simulated trade records.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("LONG"),
            Direction::Short => f.write_str("SHORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExitType {
    #[serde(rename = "SL")]
    StopLoss,
    #[serde(rename = "TP")]
    TakeProfit,
    #[serde(rename = "TIMEOUT")]
    Timeout,
}

impl fmt::Display for ExitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitType::StopLoss => f.write_str("SL"),
            ExitType::TakeProfit => f.write_str("TP"),
            ExitType::Timeout => f.write_str("TIMEOUT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub exit_type: ExitType,
    pub profit_pct: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.profit_pct > 0.0
    }

    /// Bars between entry and exit.
    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }
}

/// ATR multiples for the stop-loss and take-profit distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMultipliers {
    pub stop_atr: f64,
    pub target_atr: f64,
}

impl RiskMultipliers {
    /// (stop_loss, take_profit) around `price` for a position in `direction`.
    pub fn levels(&self, direction: Direction, price: f64, atr: f64) -> (f64, f64) {
        let stop = atr * self.stop_atr;
        let target = atr * self.target_atr;
        match direction {
            Direction::Long => (price - stop, price + target),
            Direction::Short => (price + stop, price - target),
        }
    }
}

/// Percent move from entry to exit in the trade's favour.
pub fn profit_pct(direction: Direction, entry: f64, exit: f64) -> f64 {
    match direction {
        Direction::Long => (exit - entry) / entry * 100.0,
        Direction::Short => (entry - exit) / entry * 100.0,
    }
}
