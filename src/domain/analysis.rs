//! End-to-end analysis of one symbol, and of a batch of symbols.
//!
//! indicators → signals → simulated trades → backtest summary, plus the
//! live signal on the final bar. Every stage is a pure function of its
//! inputs, so batch analyses run independently on the rayon pool.

use crate::domain::asset::{AssetSelection, AssetType};
use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::current_signal::{extract_current_signal, CurrentSignal, SignalType, SIGNAL_RISK};
use crate::domain::indicator::{compute_indicators, IndicatorParams};
use crate::domain::ohlcv::BarSeries;
use crate::domain::signal::{generate_signals, SignalParams};
use crate::domain::simulator::simulate_trades;
use crate::domain::trade::RiskMultipliers;
use crate::ports::data_port::DataPort;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub signals: SignalParams,
    pub backtest: BacktestConfig,
    /// Stop / target distances quoted with the live signal.
    pub signal_risk: RiskMultipliers,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            signals: SignalParams::default(),
            backtest: BacktestConfig::default(),
            signal_risk: SIGNAL_RISK,
        }
    }
}

/// How much the backtest supports acting on the live signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    #[serde(rename = "90%")]
    High,
    #[serde(rename = "70%")]
    Medium,
    #[serde(rename = "50%")]
    Low,
    #[serde(rename = "WAIT")]
    Wait,
}

impl Confidence {
    pub fn grade(winrate: f64, signal: SignalType) -> Self {
        if signal == SignalType::Wait {
            return Confidence::Wait;
        }
        if winrate >= 70.0 {
            Confidence::High
        } else if winrate >= 60.0 {
            Confidence::Medium
        } else if winrate >= 50.0 {
            Confidence::Low
        } else {
            Confidence::Wait
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => f.write_str("90%"),
            Confidence::Medium => f.write_str("70%"),
            Confidence::Low => f.write_str("50%"),
            Confidence::Wait => f.write_str("WAIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub symbol: String,
    pub asset_type: AssetType,
    pub bars: usize,
    pub backtest: BacktestResult,
    /// Live signal on the final bar. `None` only for an empty series, and
    /// reads as WAIT (see [`Analysis::signal_type`]).
    pub current: Option<CurrentSignal>,
    pub confidence: Confidence,
}

impl Analysis {
    pub fn signal_type(&self) -> SignalType {
        self.current
            .as_ref()
            .map_or(SignalType::Wait, |c| c.signal_type)
    }
}

/// Run the full pipeline over one series.
///
/// Never fails: short or empty series simply produce no trades and a WAIT
/// (or absent) live signal.
pub fn analyze(series: &BarSeries, asset: AssetType, config: &AnalysisConfig) -> Analysis {
    let frame = compute_indicators(series, &config.indicators, asset);
    let signals = generate_signals(series, &frame, &config.signals);
    let trades = simulate_trades(series, &signals, &frame, &config.backtest);
    let backtest = BacktestResult::from_trades(trades);
    let current = extract_current_signal(series, &frame, &signals, &config.signal_risk);

    let signal_type = current.as_ref().map_or(SignalType::Wait, |c| c.signal_type);
    let confidence = Confidence::grade(backtest.winrate, signal_type);

    debug!(
        symbol = series.symbol(),
        %asset,
        bars = series.len(),
        trades = backtest.total_trades,
        winrate = backtest.winrate,
        signal = %signal_type,
        "analysis complete"
    );

    Analysis {
        symbol: series.symbol().to_string(),
        asset_type: asset,
        bars: series.len(),
        backtest,
        current,
        confidence,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchAnalysis {
    /// Successful analyses, in input order.
    pub analyses: Vec<Analysis>,
    pub skipped: Vec<SkippedSymbol>,
}

/// Analyse each symbol independently on the rayon pool.
///
/// A symbol whose data cannot be loaded, or which has no bars, is logged and
/// skipped without affecting the others.
pub fn analyze_many<P>(
    port: &P,
    symbols: &[String],
    selection: AssetSelection,
    config: &AnalysisConfig,
) -> BatchAnalysis
where
    P: DataPort + Sync + ?Sized,
{
    let outcomes: Vec<Result<Analysis, SkippedSymbol>> = symbols
        .par_iter()
        .map(|symbol| {
            let series = port.fetch_bars(symbol).map_err(|e| SkippedSymbol {
                symbol: symbol.clone(),
                reason: e.to_string(),
            })?;
            if series.is_empty() {
                return Err(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: "no bars".to_string(),
                });
            }
            Ok(analyze(&series, selection.resolve(symbol), config))
        })
        .collect();

    let mut batch = BatchAnalysis::default();
    for outcome in outcomes {
        match outcome {
            Ok(analysis) => batch.analyses.push(analysis),
            Err(skipped) => {
                warn!(symbol = %skipped.symbol, reason = %skipped.reason, "skipping symbol");
                batch.skipped.push(skipped);
            }
        }
    }

    debug!(
        analysed = batch.analyses.len(),
        skipped = batch.skipped.len(),
        "batch analysis finished"
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::MastraderError;
    use crate::domain::indicator::test_bars::close_bars;
    use std::collections::HashMap;

    struct MapPort(HashMap<String, Vec<f64>>);

    impl DataPort for MapPort {
        fn fetch_bars(&self, symbol: &str) -> Result<BarSeries, MastraderError> {
            let closes = self.0.get(symbol).ok_or_else(|| MastraderError::NoData {
                symbol: symbol.to_string(),
            })?;
            BarSeries::new(symbol, close_bars(closes))
        }

        fn list_symbols(&self) -> Result<Vec<String>, MastraderError> {
            let mut symbols: Vec<_> = self.0.keys().cloned().collect();
            symbols.sort();
            Ok(symbols)
        }
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 5.0 * (i as f64 / 7.0).sin() + i as f64 * 0.01)
            .collect()
    }

    #[test]
    fn confidence_grades() {
        assert_eq!(Confidence::grade(75.0, SignalType::Long), Confidence::High);
        assert_eq!(Confidence::grade(70.0, SignalType::Short), Confidence::High);
        assert_eq!(Confidence::grade(65.0, SignalType::Long), Confidence::Medium);
        assert_eq!(Confidence::grade(50.0, SignalType::Long), Confidence::Low);
        assert_eq!(Confidence::grade(49.9, SignalType::Long), Confidence::Wait);
        assert_eq!(Confidence::grade(100.0, SignalType::Wait), Confidence::Wait);
        assert_eq!(Confidence::High.to_string(), "90%");
    }

    #[test]
    fn short_series_waits() {
        let series = BarSeries::new("XAUUSD", close_bars(&wave(150))).unwrap();
        let analysis = analyze(&series, AssetType::Gold, &AnalysisConfig::default());
        assert_eq!(analysis.bars, 150);
        assert_eq!(analysis.backtest.total_trades, 0);
        assert_eq!(analysis.signal_type(), SignalType::Wait);
        assert_eq!(analysis.confidence, Confidence::Wait);
    }

    #[test]
    fn empty_series_has_no_current_signal() {
        let series = BarSeries::new("XAUUSD", vec![]).unwrap();
        let analysis = analyze(&series, AssetType::Gold, &AnalysisConfig::default());
        assert!(analysis.current.is_none());
        assert_eq!(analysis.signal_type(), SignalType::Wait);
        assert_eq!(analysis.backtest, BacktestResult::empty());
    }

    #[test]
    fn analysis_is_deterministic() {
        let series = BarSeries::new("BTCUSD", close_bars(&wave(400))).unwrap();
        let config = AnalysisConfig::default();
        let a = analyze(&series, AssetType::Bitcoin, &config);
        let b = analyze(&series, AssetType::Bitcoin, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn batch_skips_missing_symbols_and_keeps_order() {
        let mut data = HashMap::new();
        data.insert("XAUUSD".to_string(), wave(250));
        data.insert("BTCUSD".to_string(), wave(300));
        data.insert("EMPTY".to_string(), vec![]);
        let port = MapPort(data);

        let symbols: Vec<String> = ["BTCUSD", "MISSING", "XAUUSD", "EMPTY"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let batch = analyze_many(&port, &symbols, AssetSelection::Auto, &AnalysisConfig::default());

        let names: Vec<_> = batch.analyses.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(names, vec!["BTCUSD", "XAUUSD"]);
        assert_eq!(batch.analyses[0].asset_type, AssetType::Bitcoin);
        assert_eq!(batch.analyses[1].asset_type, AssetType::Gold);

        let skipped: Vec<_> = batch.skipped.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(skipped, vec!["MISSING", "EMPTY"]);
        assert_eq!(batch.skipped[0].reason, "no data for MISSING");
    }

    #[test]
    fn batch_fixed_asset_applies_to_all() {
        let mut data = HashMap::new();
        data.insert("AAA".to_string(), wave(50));
        data.insert("BBB".to_string(), wave(50));
        let port = MapPort(data);
        let symbols = port.list_symbols().unwrap();

        let batch = analyze_many(
            &port,
            &symbols,
            AssetSelection::Fixed(AssetType::Silver),
            &AnalysisConfig::default(),
        );
        assert!(batch.analyses.iter().all(|a| a.asset_type == AssetType::Silver));
    }

    #[test]
    fn serializes_confidence_label() {
        let series = BarSeries::new("XAUUSD", close_bars(&wave(20))).unwrap();
        let analysis = analyze(&series, AssetType::Gold, &AnalysisConfig::default());
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["confidence"], "WAIT");
        assert_eq!(json["asset_type"], "Gold");
        assert_eq!(json["current"]["type"], "WAIT");
    }
}
