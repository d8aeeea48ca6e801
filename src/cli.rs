//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReport;
use crate::adapters::markdown_report::MarkdownReport;
use crate::domain::analysis::{analyze_many, AnalysisConfig};
use crate::domain::asset::AssetSelection;
use crate::domain::backtest::BacktestConfig;
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::MastraderError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::signal::SignalParams;
use crate::domain::trade::RiskMultipliers;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "mastrader",
    about = "Multi-asset adaptive signal and backtest engine"
)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest the strategy and report the live signal
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Symbol or comma-separated symbols, overriding the config
        #[arg(long)]
        symbol: Option<String>,
        /// CSV directory, overriding [data] path
        #[arg(long)]
        data: Option<PathBuf>,
        /// auto, or one of gold, silver, platinum, palladium, ethereum, bitcoin, other
        #[arg(long)]
        asset_type: Option<AssetSelection>,
        /// markdown or json
        #[arg(long)]
        format: Option<ReportFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include the simulated trade log
        #[arg(long)]
        trades: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show bar counts and date ranges for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

impl ReportFormat {
    pub fn reporter(self, show_trades: bool) -> Box<dyn ReportPort> {
        match self {
            ReportFormat::Markdown => Box::new(MarkdownReport::new(show_trades)),
            ReportFormat::Json => Box::new(JsonReport::new(show_trades)),
        }
    }
}

/// Install the stderr fmt subscriber. `RUST_LOG` overrides the level.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "mastrader=debug" } else { "mastrader=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            config,
            symbol,
            data,
            asset_type,
            format,
            output,
            trades,
        } => run_analyze(&AnalyzeArgs {
            config_path: config,
            symbol,
            data,
            asset_type,
            format,
            output,
            trades,
        }),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MastraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| MastraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn period(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    config.get_int("indicators", key, default as i64).max(1) as usize
}

/// Read every tunable from the config, validating first.
pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, MastraderError> {
    validate_analysis_config(config)?;

    let defaults = IndicatorParams::default();
    let indicators = IndicatorParams {
        atr_period: period(config, "atr_period", defaults.atr_period),
        adx_period: period(config, "adx_period", defaults.adx_period),
        rsi_period: period(config, "rsi_period", defaults.rsi_period),
        ema_fast: period(config, "ema_fast", defaults.ema_fast),
        ema_slow: period(config, "ema_slow", defaults.ema_slow),
        ema_filter: period(config, "ema_filter", defaults.ema_filter),
        bb_period: period(config, "bb_period", defaults.bb_period),
        bb_stddev: config.get_double("indicators", "bb_stddev", defaults.bb_stddev),
        volume_period: period(config, "volume_period", defaults.volume_period),
        volume_spike_mult: config.get_double(
            "indicators",
            "volume_spike_mult",
            defaults.volume_spike_mult,
        ),
        breakout_period: period(config, "breakout_period", defaults.breakout_period),
    };

    let defaults = SignalParams::default();
    let signals = SignalParams {
        adx_threshold: config.get_double("signals", "adx_threshold", defaults.adx_threshold),
        rsi_oversold: config.get_double("signals", "rsi_oversold", defaults.rsi_oversold),
        rsi_overbought: config.get_double("signals", "rsi_overbought", defaults.rsi_overbought),
    };

    let defaults = AnalysisConfig::default();
    let backtest = BacktestConfig {
        lookback: config
            .get_int("analysis", "lookback", defaults.backtest.lookback as i64)
            .max(1) as usize,
        max_hold_bars: config
            .get_int("analysis", "max_hold_bars", defaults.backtest.max_hold_bars as i64)
            .max(1) as usize,
        risk: RiskMultipliers {
            stop_atr: config.get_double("risk", "backtest_stop_atr", defaults.backtest.risk.stop_atr),
            target_atr: config.get_double(
                "risk",
                "backtest_target_atr",
                defaults.backtest.risk.target_atr,
            ),
        },
    };
    let signal_risk = RiskMultipliers {
        stop_atr: config.get_double("risk", "signal_stop_atr", defaults.signal_risk.stop_atr),
        target_atr: config.get_double("risk", "signal_target_atr", defaults.signal_risk.target_atr),
    };

    Ok(AnalysisConfig {
        indicators,
        signals,
        backtest,
        signal_risk,
    })
}

/// `--symbol` wins over `[analysis] symbols`, which wins over `[analysis] symbol`.
pub fn resolve_symbols(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, MastraderError> {
    let raw = symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("analysis", "symbols"))
        .or_else(|| config.get_string("analysis", "symbol"))
        .ok_or_else(|| MastraderError::ConfigMissing {
            section: "analysis".into(),
            key: "symbols".into(),
        })?;

    parse_symbols(&raw).map_err(|e| MastraderError::InvalidSymbols {
        reason: e.to_string(),
    })
}

pub fn resolve_asset_selection(
    asset_override: Option<AssetSelection>,
    config: &dyn ConfigPort,
) -> Result<AssetSelection, MastraderError> {
    if let Some(selection) = asset_override {
        return Ok(selection);
    }
    match config.get_string("analysis", "asset_type") {
        Some(value) => value
            .parse::<AssetSelection>()
            .map_err(|e| MastraderError::ConfigInvalid {
                section: "analysis".into(),
                key: "asset_type".into(),
                reason: e.to_string(),
            }),
        None => Ok(AssetSelection::Auto),
    }
}

pub fn resolve_format(
    format_override: Option<ReportFormat>,
    config: &dyn ConfigPort,
) -> Result<ReportFormat, MastraderError> {
    if let Some(format) = format_override {
        return Ok(format);
    }
    match config.get_string("report", "format") {
        Some(value) => value.parse::<ReportFormat>().map_err(|reason| MastraderError::ConfigInvalid {
            section: "report".into(),
            key: "format".into(),
            reason,
        }),
        None => Ok(ReportFormat::default()),
    }
}

fn data_path(data_override: Option<&Path>, config: &dyn ConfigPort) -> Result<PathBuf, MastraderError> {
    data_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "path").map(PathBuf::from))
        .ok_or_else(|| MastraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

pub struct AnalyzeArgs {
    pub config_path: PathBuf,
    pub symbol: Option<String>,
    pub data: Option<PathBuf>,
    pub asset_type: Option<AssetSelection>,
    pub format: Option<ReportFormat>,
    pub output: Option<PathBuf>,
    pub trades: bool,
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<(), MastraderError> {
    info!(config = %args.config_path.display(), "loading config");
    let config = load_config(&args.config_path)?;
    let analysis_config = build_analysis_config(&config)?;

    let symbols = resolve_symbols(args.symbol.as_deref(), &config)?;
    let selection = resolve_asset_selection(args.asset_type, &config)?;
    let format = resolve_format(args.format, &config)?;
    let show_trades = args.trades || config.get_bool("report", "show_trades", false);
    let data_port = CsvAdapter::new(data_path(args.data.as_deref(), &config)?);

    info!(symbols = symbols.len(), "analysing");
    let batch = analyze_many(&data_port, &symbols, selection, &analysis_config);

    if batch.analyses.is_empty() {
        return Err(MastraderError::NoData {
            symbol: symbols.join(","),
        });
    }
    if !batch.skipped.is_empty() {
        info!(
            analysed = batch.analyses.len(),
            requested = symbols.len(),
            "some symbols were skipped"
        );
    }

    let report = format.reporter(show_trades).render_many(&batch.analyses)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &report)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", report.trim_end()),
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), MastraderError> {
    info!(config = %config_path.display(), "validating config");
    let config = load_config(config_path)?;
    let analysis_config = build_analysis_config(&config)?;
    let symbols = resolve_symbols(None, &config)?;
    resolve_asset_selection(None, &config)?;
    resolve_format(None, &config)?;

    println!("symbols: {}", symbols.join(", "));
    println!(
        "warmup: {} bars before the first entry signal",
        analysis_config.indicators.warmup_len()
    );
    println!(
        "backtest: last {} bars, max hold {} bars, stop {} ATR, target {} ATR",
        analysis_config.backtest.lookback,
        analysis_config.backtest.max_hold_bars,
        analysis_config.backtest.risk.stop_atr,
        analysis_config.backtest.risk.target_atr
    );
    println!("Configuration is valid.");
    Ok(())
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> Result<(), MastraderError> {
    let config = load_config(config_path)?;
    let data_port = CsvAdapter::new(data_path(None, &config)?);

    let symbols = match symbol {
        Some(s) => resolve_symbols(Some(s), &config)?,
        None => match resolve_symbols(None, &config) {
            Ok(symbols) => symbols,
            Err(_) => data_port.list_symbols()?,
        },
    };

    for symbol in &symbols {
        match data_port.fetch_bars(symbol) {
            Ok(series) => match (series.bars().first(), series.last()) {
                (Some(first), Some(last)) => println!(
                    "{}: {} bars, {} to {}",
                    symbol,
                    series.len(),
                    first.timestamp,
                    last.timestamp
                ),
                _ => println!("{}: no bars", symbol),
            },
            Err(e) => eprintln!("{}: {}", symbol, e),
        }
    }
    debug!(symbols = symbols.len(), "info complete");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), MastraderError> {
    let config = load_config(config_path)?;
    let data_port = CsvAdapter::new(data_path(None, &config)?);
    let symbols = data_port.list_symbols()?;

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
    }
    Ok(())
}
