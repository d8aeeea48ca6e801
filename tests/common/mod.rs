#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use mastrader::domain::error::MastraderError;
pub use mastrader::domain::ohlcv::{Bar, BarSeries};
use mastrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<BarSeries, MastraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(MastraderError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) => BarSeries::new(symbol, bars.clone()),
            None => Err(MastraderError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, MastraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Hourly timestamps from 2024-01-01 00:00.
pub fn ts(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(i as i64)
}

pub fn make_bar(i: usize, high: f64, low: f64, close: f64, volume: f64) -> Bar {
    Bar {
        timestamp: ts(i),
        open: close,
        high,
        low,
        close,
        volume,
    }
}

/// Bar with a ±0.5 range around `close` and unit volume 1000.
pub fn quiet_bar(i: usize, close: f64) -> Bar {
    make_bar(i, close + 0.5, close - 0.5, close, 1000.0)
}

/// Steady uptrend of 0.1 per bar from 100.
pub fn uptrend_bars(n: usize) -> Vec<Bar> {
    (0..n).map(|i| quiet_bar(i, 100.0 + 0.1 * i as f64)).collect()
}

pub const BREAKOUT_BAR: usize = 240;

/// Uptrend that gaps above its 20-bar channel on heavy volume at
/// [`BREAKOUT_BAR`], followed by `after` quiet bars at the breakout close.
pub fn breakout_bars(after: usize) -> Vec<Bar> {
    let mut bars = uptrend_bars(BREAKOUT_BAR);
    let close = 100.0 + 0.1 * BREAKOUT_BAR as f64 + 5.0;
    bars.push(make_bar(BREAKOUT_BAR, close + 0.5, close - 0.5, close, 5000.0));
    for j in 1..=after {
        bars.push(quiet_bar(BREAKOUT_BAR + j, close));
    }
    bars
}

/// Deterministic oscillating series with varying volume.
pub fn wave_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            let close = 100.0 + 8.0 * (x / 11.0).sin() + 3.0 * (x / 3.7).cos() + 0.02 * x;
            let range = 0.8 + 0.4 * (x / 5.0).sin().abs();
            let volume = 1000.0 + 600.0 * (x / 4.3).sin().abs();
            make_bar(i, close + range, close - range, close, volume)
        })
        .collect()
}

/// Random-walk bars from per-step (return, range, volume) triples.
pub fn walk_bars(steps: &[(f64, f64, f64)]) -> Vec<Bar> {
    let mut close = 100.0;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(ret, range, volume))| {
            close = (close * (1.0 + ret)).max(5.0);
            make_bar(i, close + range, close - range, close, volume)
        })
        .collect()
}

pub fn series(symbol: &str, bars: Vec<Bar>) -> BarSeries {
    BarSeries::new(symbol, bars).unwrap()
}
