//! Breakout channel over the bars *before* the current one.
//!
//! highest_high[i] = max(H[i-n..i-1]), lowest_low[i] = min(L[i-n..i-1]).
//! The current bar is excluded so its close can be compared against the
//! channel. Undefined for i < n.

use super::rolling::{rolling_max, rolling_min, shift_one};
use super::Series;
use crate::domain::ohlcv::Bar;

#[derive(Debug, Clone, PartialEq)]
pub struct BreakoutChannel {
    pub highest_high: Series,
    pub lowest_low: Series,
}

pub fn calculate_channel(bars: &[Bar], period: usize) -> BreakoutChannel {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    BreakoutChannel {
        highest_high: shift_one(&rolling_max(&highs, period)),
        lowest_low: shift_one(&rolling_min(&lows, period)),
    }
}
