//! JSON report adapter implementing ReportPort.

use crate::domain::analysis::Analysis;
use crate::domain::error::MastraderError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport {
    /// Keep the per-trade list in the output.
    pub show_trades: bool,
}

impl JsonReport {
    pub fn new(show_trades: bool) -> Self {
        Self { show_trades }
    }

    fn to_value(&self, analysis: &Analysis) -> Result<serde_json::Value, MastraderError> {
        let mut value = serde_json::to_value(analysis)?;
        if !self.show_trades {
            if let Some(backtest) = value.get_mut("backtest").and_then(|b| b.as_object_mut()) {
                backtest.remove("trades");
            }
        }
        Ok(value)
    }
}

impl ReportPort for JsonReport {
    fn render(&self, analysis: &Analysis) -> Result<String, MastraderError> {
        Ok(serde_json::to_string_pretty(&self.to_value(analysis)?)?)
    }

    fn render_many(&self, analyses: &[Analysis]) -> Result<String, MastraderError> {
        let values = analyses
            .iter()
            .map(|a| self.to_value(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::to_string_pretty(&values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{analyze, AnalysisConfig};
    use crate::domain::asset::AssetType;
    use crate::domain::ohlcv::{Bar, BarSeries};
    use chrono::NaiveDate;

    fn sample() -> Analysis {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars = (0..30)
            .map(|i| Bar {
                timestamp: start + chrono::Duration::hours(i),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0 + (i % 3) as f64,
                volume: 500.0,
            })
            .collect();
        let series = BarSeries::new("ETHUSD", bars).unwrap();
        analyze(&series, AssetType::Ethereum, &AnalysisConfig::default())
    }

    #[test]
    fn render_contains_fields() {
        let out = JsonReport::default().render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["symbol"], "ETHUSD");
        assert_eq!(value["asset_type"], "Ethereum");
        assert_eq!(value["bars"], 30);
        assert_eq!(value["confidence"], "WAIT");
        assert_eq!(value["current"]["type"], "WAIT");
        assert_eq!(value["current"]["price"], 102.0);
        assert_eq!(value["backtest"]["total_trades"], 0);
        assert!(value["backtest"].get("trades").is_none());
    }

    #[test]
    fn trades_kept_when_requested() {
        let out = JsonReport::new(true).render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["backtest"]["trades"].is_array());
    }

    #[test]
    fn render_many_is_array() {
        let out = JsonReport::default().render_many(&[sample(), sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
