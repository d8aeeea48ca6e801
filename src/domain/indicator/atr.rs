//! ATR (Average True Range).
//!
//! TR[0] = high - low; TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|).
//! ATR = simple rolling mean of TR over n bars, scaled by the asset's
//! volatility multiplier. First n-1 bars are undefined.

use super::rolling::rolling_mean;
use super::Series;
use crate::domain::ohlcv::Bar;

pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

pub fn calculate_atr(bars: &[Bar], period: usize, multiplier: f64) -> Series {
    let tr: Vec<Option<f64>> = true_ranges(bars).into_iter().map(Some).collect();
    rolling_mean(&tr, period)
        .into_iter()
        .map(|v| v.map(|atr| atr * multiplier))
        .collect()
}
