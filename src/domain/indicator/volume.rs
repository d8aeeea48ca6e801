//! Volume average and spike detection.

use super::rolling::rolling_mean;
use super::Series;
use crate::domain::ohlcv::Bar;

pub fn calculate_volume_sma(bars: &[Bar], period: usize) -> Series {
    let volumes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.volume)).collect();
    rolling_mean(&volumes, period)
}

/// volume > multiplier × SMA; false while the SMA is undefined.
pub fn volume_spikes(bars: &[Bar], volume_sma: &[Option<f64>], multiplier: f64) -> Vec<bool> {
    bars.iter()
        .zip(volume_sma)
        .map(|(bar, sma)| sma.is_some_and(|avg| bar.volume > avg * multiplier))
        .collect()
}
