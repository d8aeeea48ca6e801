//! Regime classification and entry signals.
//!
//! Three independent strategies each produce a long/short pair:
//!
//! 1. Trend following: trending regime, EMA alignment with the filter EMA,
//!    a fresh fast/slow crossover on this bar, and a volume spike.
//! 2. Breakout: close beyond the prior channel, volume spike, and close on
//!    the same side of the filter EMA.
//! 3. Mean reversion: ranging regime, close outside the Bollinger band, and
//!    RSI beyond the oversold/overbought level.
//!
//! `long_signal` / `short_signal` OR the three variants. An undefined
//! indicator makes every boolean that depends on it false, and no entry
//! fires before the frame is warm.

use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::BarSeries;
use crate::domain::trade::Direction;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub adx_threshold: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            adx_threshold: 20.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalFrame {
    pub is_trending: Vec<bool>,
    pub is_ranging: Vec<bool>,
    pub bullish_trend: Vec<bool>,
    pub bearish_trend: Vec<bool>,
    pub ema_cross_up: Vec<bool>,
    pub ema_cross_down: Vec<bool>,
    pub trend_long: Vec<bool>,
    pub trend_short: Vec<bool>,
    pub breakout_long: Vec<bool>,
    pub breakout_short: Vec<bool>,
    pub meanrev_long: Vec<bool>,
    pub meanrev_short: Vec<bool>,
    pub long_signal: Vec<bool>,
    pub short_signal: Vec<bool>,
}

impl SignalFrame {
    pub fn len(&self) -> usize {
        self.long_signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.long_signal.is_empty()
    }

    /// Entry direction at `index`; long wins when both sides fire.
    pub fn entry_at(&self, index: usize) -> Option<Direction> {
        if self.long_signal.get(index).copied().unwrap_or(false) {
            Some(Direction::Long)
        } else if self.short_signal.get(index).copied().unwrap_or(false) {
            Some(Direction::Short)
        } else {
            None
        }
    }
}

fn above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn below(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn at_most(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a <= b)
}

fn at_least(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a >= b)
}

pub fn generate_signals(
    series: &BarSeries,
    frame: &IndicatorFrame,
    params: &SignalParams,
) -> SignalFrame {
    let n = series.len().min(frame.len());
    let mut out = SignalFrame::default();

    for i in 0..n {
        let close = Some(series[i].close);
        let adx = frame.adx[i];
        let fast = frame.ema_fast[i];
        let slow = frame.ema_slow[i];
        let filter = frame.ema_filter[i];
        let (prev_fast, prev_slow) = if i > 0 {
            (frame.ema_fast[i - 1], frame.ema_slow[i - 1])
        } else {
            (None, None)
        };
        let spike = frame.volume_spike[i];
        let warm = frame.is_warm(i);

        let is_trending = above(adx, Some(params.adx_threshold));
        let is_ranging = at_most(adx, Some(params.adx_threshold));
        let bullish_trend = above(fast, slow) && above(close, filter);
        let bearish_trend = below(fast, slow) && below(close, filter);
        let ema_cross_up = above(fast, slow) && at_most(prev_fast, prev_slow);
        let ema_cross_down = below(fast, slow) && at_least(prev_fast, prev_slow);

        let trend_long = warm && is_trending && bullish_trend && ema_cross_up && spike;
        let trend_short = warm && is_trending && bearish_trend && ema_cross_down && spike;

        let breakout_long =
            warm && above(close, frame.highest_high[i]) && spike && above(close, filter);
        let breakout_short =
            warm && below(close, frame.lowest_low[i]) && spike && below(close, filter);

        let meanrev_long = warm
            && is_ranging
            && below(close, frame.bb_lower[i])
            && below(frame.rsi[i], Some(params.rsi_oversold));
        let meanrev_short = warm
            && is_ranging
            && above(close, frame.bb_upper[i])
            && above(frame.rsi[i], Some(params.rsi_overbought));

        out.is_trending.push(is_trending);
        out.is_ranging.push(is_ranging);
        out.bullish_trend.push(bullish_trend);
        out.bearish_trend.push(bearish_trend);
        out.ema_cross_up.push(ema_cross_up);
        out.ema_cross_down.push(ema_cross_down);
        out.trend_long.push(trend_long);
        out.trend_short.push(trend_short);
        out.breakout_long.push(breakout_long);
        out.breakout_short.push(breakout_short);
        out.meanrev_long.push(meanrev_long);
        out.meanrev_short.push(meanrev_short);
        out.long_signal.push(trend_long || breakout_long || meanrev_long);
        out.short_signal.push(trend_short || breakout_short || meanrev_short);
    }

    debug!(
        symbol = series.symbol(),
        long = out.long_signal.iter().filter(|s| **s).count(),
        short = out.short_signal.iter().filter(|s| **s).count(),
        "signals generated"
    );

    out
}
