//! Core domain types and the analysis pipeline.

pub mod ohlcv;
pub mod asset;
pub mod indicator;
pub mod signal;
pub mod trade;
pub mod simulator;
pub mod backtest;
pub mod current_signal;
pub mod analysis;
pub mod universe;
pub mod config_validation;
pub mod error;
