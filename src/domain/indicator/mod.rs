//! Technical indicator calculations.
//!
//! Each indicator returns a [`Series`]: one `Option<f64>` per bar, `None`
//! while its window is still filling or when a ratio has a zero denominator.
//! [`compute_indicators`] runs all of them over a [`BarSeries`] and bundles
//! the results into an [`IndicatorFrame`] aligned bar-for-bar with the input.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod channel;
pub mod ema;
pub mod rolling;
pub mod rsi;
pub mod volume;

use crate::domain::asset::AssetType;
use crate::domain::ohlcv::BarSeries;
use tracing::debug;

/// Per-bar indicator values; `None` marks an undefined value.
pub type Series = Vec<Option<f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub atr_period: usize,
    pub adx_period: usize,
    pub rsi_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub ema_filter: usize,
    pub bb_period: usize,
    pub bb_stddev: f64,
    pub volume_period: usize,
    pub volume_spike_mult: f64,
    pub breakout_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            atr_period: 14,
            adx_period: 14,
            rsi_period: 14,
            ema_fast: 21,
            ema_slow: 50,
            ema_filter: 200,
            bb_period: 20,
            bb_stddev: 2.0,
            volume_period: 20,
            volume_spike_mult: 1.2,
            breakout_period: 20,
        }
    }
}

impl IndicatorParams {
    /// Number of bars needed before every indicator in the frame is warm.
    ///
    /// ADX needs two stacked windows; the breakout channel needs one extra
    /// bar because it looks only at prior bars.
    pub fn warmup_len(&self) -> usize {
        [
            self.atr_period,
            2 * self.adx_period,
            self.rsi_period,
            self.ema_fast,
            self.ema_slow,
            self.ema_filter,
            self.bb_period,
            self.volume_period,
            self.breakout_period + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub atr: Series,
    pub ema_fast: Series,
    pub ema_slow: Series,
    pub ema_filter: Series,
    pub adx: Series,
    pub rsi: Series,
    pub bb_middle: Series,
    pub bb_upper: Series,
    pub bb_lower: Series,
    pub volume_sma: Series,
    pub volume_spike: Vec<bool>,
    pub highest_high: Series,
    pub lowest_low: Series,
    /// First index at which every indicator has a full window.
    pub warm_from: usize,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.atr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atr.is_empty()
    }

    pub fn is_warm(&self, index: usize) -> bool {
        index >= self.warm_from && index < self.len()
    }
}

/// Compute every indicator for `series`. Pure: the same input always yields
/// the same frame.
pub fn compute_indicators(
    series: &BarSeries,
    params: &IndicatorParams,
    asset: AssetType,
) -> IndicatorFrame {
    let bars = series.bars();
    let closes: Vec<f64> = series.closes().collect();

    let bands = bollinger::calculate_bollinger(&closes, params.bb_period, params.bb_stddev);
    let channel = channel::calculate_channel(bars, params.breakout_period);
    let volume_sma = volume::calculate_volume_sma(bars, params.volume_period);
    let volume_spike = volume::volume_spikes(bars, &volume_sma, params.volume_spike_mult);

    let frame = IndicatorFrame {
        atr: atr::calculate_atr(bars, params.atr_period, asset.volatility_multiplier()),
        ema_fast: ema::calculate_ema(&closes, params.ema_fast),
        ema_slow: ema::calculate_ema(&closes, params.ema_slow),
        ema_filter: ema::calculate_ema(&closes, params.ema_filter),
        adx: adx::calculate_adx(bars, params.adx_period),
        rsi: rsi::calculate_rsi(bars, params.rsi_period),
        bb_middle: bands.middle,
        bb_upper: bands.upper,
        bb_lower: bands.lower,
        volume_sma,
        volume_spike,
        highest_high: channel.highest_high,
        lowest_low: channel.lowest_low,
        warm_from: params.warmup_len().saturating_sub(1),
    };

    debug!(
        symbol = series.symbol(),
        bars = bars.len(),
        warm_from = frame.warm_from,
        %asset,
        "indicators computed"
    );

    frame
}
