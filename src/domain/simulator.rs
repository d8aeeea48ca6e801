//! Bar-by-bar trade simulation against ATR stop-loss / take-profit levels.
//!
//! The outer scan walks the last `lookback` bars. On an entry signal a trade
//! opens at the bar's close and the following bars (at most
//! `max_hold_bars`) are checked for an exit. The stop is always tested
//! before the target, so a bar that touches both closes at the stop. After a
//! trade closes the scan resumes on the bar after its exit, so trades never
//! overlap and each bar is visited a bounded number of times.

use crate::domain::backtest::BacktestConfig;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::BarSeries;
use crate::domain::signal::SignalFrame;
use crate::domain::trade::{profit_pct, Direction, ExitType, Trade};
use tracing::{debug, trace};

pub fn simulate_trades(
    series: &BarSeries,
    signals: &SignalFrame,
    frame: &IndicatorFrame,
    config: &BacktestConfig,
) -> Vec<Trade> {
    let n = series.len();
    let mut trades = Vec::new();
    let mut i = n.saturating_sub(config.lookback);

    while i + 1 < n {
        let Some(direction) = signals.entry_at(i) else {
            i += 1;
            continue;
        };

        match execute_trade(series, frame, i, direction, config) {
            Some(trade) => {
                trace!(
                    entry = trade.entry_index,
                    exit = trade.exit_index,
                    %direction,
                    exit_type = %trade.exit_type,
                    profit_pct = trade.profit_pct,
                    "trade closed"
                );
                i = trade.exit_index + 1;
                trades.push(trade);
            }
            None => i += 1,
        }
    }

    debug!(symbol = series.symbol(), trades = trades.len(), "simulation finished");
    trades
}

/// Open a trade at `entry` and scan forward for its exit.
///
/// Returns `None` when the entry bar's ATR is undefined or zero.
fn execute_trade(
    series: &BarSeries,
    frame: &IndicatorFrame,
    entry: usize,
    direction: Direction,
    config: &BacktestConfig,
) -> Option<Trade> {
    let atr = frame.atr.get(entry).copied().flatten()?;
    if atr == 0.0 {
        return None;
    }

    let entry_price = series[entry].close;
    let (stop_loss, take_profit) = config.risk.levels(direction, entry_price, atr);
    let last = (entry + config.max_hold_bars).min(series.len() - 1);

    let close_at = |exit_index: usize, exit_price: f64, exit_type: ExitType| Trade {
        entry_index: entry,
        exit_index,
        direction,
        entry_price,
        exit_price,
        stop_loss,
        take_profit,
        exit_type,
        profit_pct: match exit_type {
            ExitType::Timeout => 0.0,
            _ => profit_pct(direction, entry_price, exit_price),
        },
    };

    for j in entry + 1..=last {
        let bar = &series[j];
        let (stop_hit, target_hit) = match direction {
            Direction::Long => (bar.low <= stop_loss, bar.high >= take_profit),
            Direction::Short => (bar.high >= stop_loss, bar.low <= take_profit),
        };
        if stop_hit {
            return Some(close_at(j, stop_loss, ExitType::StopLoss));
        }
        if target_hit {
            return Some(close_at(j, take_profit, ExitType::TakeProfit));
        }
    }

    Some(close_at(last, series[last].close, ExitType::Timeout))
}
