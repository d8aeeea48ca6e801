//! Live signal read from the final bar of an analysis.

use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::BarSeries;
use crate::domain::signal::SignalFrame;
use crate::domain::trade::{Direction, RiskMultipliers};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Stop / target distances quoted with a live signal. The target is wider
/// than the one used by the backtest ([`crate::domain::backtest::BACKTEST_RISK`]).
pub const SIGNAL_RISK: RiskMultipliers = RiskMultipliers {
    stop_atr: 2.0,
    target_atr: 3.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Long,
    Short,
    Wait,
}

impl From<Option<Direction>> for SignalType {
    fn from(direction: Option<Direction>) -> Self {
        match direction {
            Some(Direction::Long) => SignalType::Long,
            Some(Direction::Short) => SignalType::Short,
            None => SignalType::Wait,
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Long => f.write_str("LONG"),
            SignalType::Short => f.write_str("SHORT"),
            SignalType::Wait => f.write_str("WAIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentSignal {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub atr: Option<f64>,
    pub rsi: Option<f64>,
    pub adx: Option<f64>,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl CurrentSignal {
    pub fn is_actionable(&self) -> bool {
        self.signal_type != SignalType::Wait
    }
}

/// Signal on the last bar, or `None` for an empty series.
///
/// Stop and target are only quoted for LONG/SHORT with a defined ATR.
pub fn extract_current_signal(
    series: &BarSeries,
    frame: &IndicatorFrame,
    signals: &SignalFrame,
    risk: &RiskMultipliers,
) -> Option<CurrentSignal> {
    let last_index = series.len().checked_sub(1)?;
    let bar = &series[last_index];
    let atr = frame.atr.get(last_index).copied().flatten();
    let direction = signals.entry_at(last_index);

    let levels = direction
        .zip(atr)
        .map(|(direction, atr)| risk.levels(direction, bar.close, atr));

    Some(CurrentSignal {
        timestamp: bar.timestamp,
        price: bar.close,
        atr,
        rsi: frame.rsi.get(last_index).copied().flatten(),
        adx: frame.adx.get(last_index).copied().flatten(),
        signal_type: direction.into(),
        stop_loss: levels.map(|(stop, _)| stop),
        take_profit: levels.map(|(_, target)| target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::ts;
    use crate::domain::ohlcv::Bar;
    use approx::assert_relative_eq;

    fn series(n: usize) -> BarSeries {
        let bars = (0..n)
            .map(|i| Bar {
                timestamp: ts(i),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0 + i as f64,
                volume: 1000.0,
            })
            .collect();
        BarSeries::new("TEST", bars).unwrap()
    }

    fn frame(n: usize, atr: Option<f64>) -> IndicatorFrame {
        IndicatorFrame {
            atr: vec![atr; n],
            ema_fast: vec![None; n],
            ema_slow: vec![None; n],
            ema_filter: vec![None; n],
            adx: vec![Some(22.5); n],
            rsi: vec![Some(48.0); n],
            bb_middle: vec![None; n],
            bb_upper: vec![None; n],
            bb_lower: vec![None; n],
            volume_sma: vec![None; n],
            volume_spike: vec![false; n],
            highest_high: vec![None; n],
            lowest_low: vec![None; n],
            warm_from: 0,
        }
    }

    fn signals(n: usize, long_last: bool, short_last: bool) -> SignalFrame {
        let mut long_signal = vec![false; n];
        let mut short_signal = vec![false; n];
        long_signal[n - 1] = long_last;
        short_signal[n - 1] = short_last;
        SignalFrame {
            long_signal,
            short_signal,
            ..SignalFrame::default()
        }
    }

    #[test]
    fn wait_without_signal() {
        let s = extract_current_signal(&series(3), &frame(3, Some(1.0)), &signals(3, false, false), &SIGNAL_RISK)
            .unwrap();
        assert_eq!(s.signal_type, SignalType::Wait);
        assert_eq!(s.stop_loss, None);
        assert_eq!(s.take_profit, None);
        assert_relative_eq!(s.price, 102.0);
        assert_eq!(s.timestamp, ts(2));
        assert_eq!(s.adx, Some(22.5));
        assert_eq!(s.rsi, Some(48.0));
    }

    #[test]
    fn long_uses_two_and_three_atr() {
        let s = extract_current_signal(&series(3), &frame(3, Some(1.5)), &signals(3, true, false), &SIGNAL_RISK)
            .unwrap();
        assert_eq!(s.signal_type, SignalType::Long);
        assert_relative_eq!(s.stop_loss.unwrap(), 99.0);
        assert_relative_eq!(s.take_profit.unwrap(), 106.5);
    }

    #[test]
    fn short_levels_mirror() {
        let s = extract_current_signal(&series(3), &frame(3, Some(1.5)), &signals(3, false, true), &SIGNAL_RISK)
            .unwrap();
        assert_eq!(s.signal_type, SignalType::Short);
        assert_relative_eq!(s.stop_loss.unwrap(), 105.0);
        assert_relative_eq!(s.take_profit.unwrap(), 97.5);
    }

    #[test]
    fn long_checked_first() {
        let s = extract_current_signal(&series(2), &frame(2, Some(1.0)), &signals(2, true, true), &SIGNAL_RISK)
            .unwrap();
        assert_eq!(s.signal_type, SignalType::Long);
    }

    #[test]
    fn undefined_atr_leaves_levels_empty() {
        let s = extract_current_signal(&series(2), &frame(2, None), &signals(2, true, false), &SIGNAL_RISK)
            .unwrap();
        assert_eq!(s.signal_type, SignalType::Long);
        assert_eq!(s.atr, None);
        assert_eq!(s.stop_loss, None);
    }

    #[test]
    fn empty_series_has_no_signal() {
        let empty = BarSeries::new("TEST", vec![]).unwrap();
        let none = extract_current_signal(&empty, &frame(0, None), &SignalFrame::default(), &SIGNAL_RISK);
        assert!(none.is_none());
    }

    #[test]
    fn serializes_type_field() {
        let s = extract_current_signal(&series(2), &frame(2, Some(1.0)), &signals(2, false, false), &SIGNAL_RISK)
            .unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "WAIT");
        assert!(json["stop_loss"].is_null());
    }
}
