//! Configuration validation.
//!
//! Validates every configured field before an analysis runs. Absent keys
//! take their defaults and always pass.

use crate::domain::asset::AssetSelection;
use crate::domain::error::MastraderError;
use crate::ports::config_port::ConfigPort;

pub const INDICATOR_PERIODS: &[(&str, i64)] = &[
    ("atr_period", 14),
    ("adx_period", 14),
    ("rsi_period", 14),
    ("ema_fast", 21),
    ("ema_slow", 50),
    ("ema_filter", 200),
    ("bb_period", 20),
    ("volume_period", 20),
    ("breakout_period", 20),
];

pub const RISK_MULTIPLIERS: &[(&str, f64)] = &[
    ("backtest_stop_atr", 2.0),
    ("backtest_target_atr", 2.0),
    ("signal_stop_atr", 2.0),
    ("signal_target_atr", 3.0),
];

pub const REPORT_FORMATS: &[&str] = &["markdown", "json"];

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), MastraderError> {
    validate_data_path(config)?;
    validate_asset_type(config)?;
    validate_window(config, "lookback")?;
    validate_window(config, "max_hold_bars")?;
    validate_risk(config)?;
    validate_indicators(config)?;
    validate_signals(config)?;
    validate_report(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> MastraderError {
    MastraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), MastraderError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(MastraderError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_asset_type(config: &dyn ConfigPort) -> Result<(), MastraderError> {
    if let Some(value) = config.get_string("analysis", "asset_type") {
        value
            .parse::<AssetSelection>()
            .map_err(|e| invalid("analysis", "asset_type", e.to_string()))?;
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort, key: &str) -> Result<(), MastraderError> {
    let value = config.get_int("analysis", key, 100);
    if value < 1 {
        return Err(invalid("analysis", key, format!("{key} must be at least 1")));
    }
    Ok(())
}

fn validate_risk(config: &dyn ConfigPort) -> Result<(), MastraderError> {
    for &(key, default) in RISK_MULTIPLIERS {
        let value = config.get_double("risk", key, default);
        if value.is_nan() || value <= 0.0 {
            return Err(invalid("risk", key, format!("{key} must be positive")));
        }
    }
    Ok(())
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<(), MastraderError> {
    for &(key, default) in INDICATOR_PERIODS {
        let value = config.get_int("indicators", key, default);
        if value < 1 {
            return Err(invalid("indicators", key, format!("{key} must be at least 1")));
        }
    }

    let fast = config.get_int("indicators", "ema_fast", 21);
    let slow = config.get_int("indicators", "ema_slow", 50);
    if fast >= slow {
        return Err(invalid(
            "indicators",
            "ema_fast",
            "ema_fast must be shorter than ema_slow",
        ));
    }

    for (key, default) in [("bb_stddev", 2.0), ("volume_spike_mult", 1.2)] {
        let value = config.get_double("indicators", key, default);
        if value.is_nan() || value <= 0.0 {
            return Err(invalid("indicators", key, format!("{key} must be positive")));
        }
    }
    Ok(())
}

fn validate_signals(config: &dyn ConfigPort) -> Result<(), MastraderError> {
    let threshold = config.get_double("signals", "adx_threshold", 20.0);
    if !(0.0..=100.0).contains(&threshold) {
        return Err(invalid(
            "signals",
            "adx_threshold",
            "adx_threshold must be between 0 and 100",
        ));
    }

    let oversold = config.get_double("signals", "rsi_oversold", 30.0);
    let overbought = config.get_double("signals", "rsi_overbought", 70.0);
    for (key, value) in [("rsi_oversold", oversold), ("rsi_overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("signals", key, format!("{key} must be between 0 and 100")));
        }
    }
    if oversold >= overbought {
        return Err(invalid(
            "signals",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    Ok(())
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), MastraderError> {
    if let Some(format) = config.get_string("report", "format") {
        let format = format.trim().to_lowercase();
        if !REPORT_FORMATS.contains(&format.as_str()) {
            return Err(invalid(
                "report",
                "format",
                format!("unknown report format '{format}', expected markdown or json"),
            ));
        }
    }
    Ok(())
}
