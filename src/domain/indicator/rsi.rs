//! RSI (Relative Strength Index), simple-mean variant.
//!
//! Gains and losses are the positive / negative parts of the close-to-close
//! change; the first bar has no prior close and counts as no change.
//! avg_gain and avg_loss are plain n-bar rolling means (no Wilder smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: undefined.
//!
//! Warmup: first n-1 bars are undefined.

use super::rolling::rolling_mean;
use super::Series;
use crate::domain::ohlcv::Bar;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> Series {
    let mut gains = Vec::with_capacity(bars.len());
    let mut losses = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 {
            0.0
        } else {
            bar.close - bars[i - 1].close
        };
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) if loss != 0.0 => {
                Some(100.0 - (100.0 / (1.0 + gain / loss)))
            }
            _ => None,
        })
        .collect()
}
