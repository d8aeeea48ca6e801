//! Markdown report adapter implementing ReportPort.
//!
//! Produces a short post-style summary per symbol: live signal with its
//! confidence grade, backtest performance, market context, and either a
//! trade setup or a wait notice. Batches get a summary table on top.

use crate::domain::analysis::Analysis;
use crate::domain::current_signal::{CurrentSignal, SignalType};
use crate::domain::error::MastraderError;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

const FOOTER: &str = "---\n*Not financial advice | Multi-Asset Adaptive Strategy*\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReport {
    /// Append the simulated trade log to each report.
    pub show_trades: bool,
}

impl MarkdownReport {
    pub fn new(show_trades: bool) -> Self {
        Self { show_trades }
    }
}

fn signal_emoji(signal: SignalType) -> &'static str {
    match signal {
        SignalType::Long => "🟢",
        SignalType::Short => "🔴",
        SignalType::Wait => "⚪",
    }
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("${:.2}", v))
}

/// `1:x` reward-to-risk ratio of the quoted levels.
fn reward_risk(signal: &CurrentSignal) -> Option<String> {
    let stop = signal.stop_loss?;
    let target = signal.take_profit?;
    let risk = (signal.price - stop).abs();
    if risk == 0.0 {
        return None;
    }
    let reward = (target - signal.price).abs();
    Some(format!("1:{:.1}", reward / risk))
}

fn signal_section(analysis: &Analysis) -> String {
    let signal = analysis.signal_type();
    let headline = if signal == SignalType::Wait {
        signal.to_string()
    } else {
        format!("{} {}", signal, analysis.confidence)
    };
    format!(
        "{} **Current Signal:** {}\n\n",
        signal_emoji(signal),
        headline
    )
}

fn performance_section(analysis: &Analysis) -> String {
    let bt = &analysis.backtest;
    let mut output = String::new();
    output.push_str("**Strategy Performance:**\n");
    output.push_str(&format!("- Win Rate: **{:.2}%**\n", bt.winrate));
    output.push_str(&format!(
        "- Total Trades: {} ({}W / {}L)\n",
        bt.total_trades, bt.wins, bt.losses
    ));
    output.push_str(&format!("- Profit Factor: {:.2}\n\n", bt.profit_factor));
    output
}

fn context_section(signal: &CurrentSignal) -> String {
    let mut output = String::new();
    output.push_str("**Market Context:**\n");
    output.push_str(&format!("- Price: ${:.2}\n", signal.price));
    output.push_str(&format!(
        "- RSI: {:.1} | ADX: {:.1}\n",
        signal.rsi.unwrap_or(50.0),
        signal.adx.unwrap_or(0.0)
    ));
    output.push_str(&format!(
        "- As of: {}\n\n",
        signal.timestamp.format("%Y-%m-%d %H:%M")
    ));
    output
}

fn setup_section(signal: &CurrentSignal) -> String {
    if !signal.is_actionable() {
        return "**Action:** No clear edge. Wait for better setup.\n\n".to_string();
    }
    let mut output = String::new();
    output.push_str("**Trade Setup:**\n");
    output.push_str(&format!("- Entry: ${:.2}\n", signal.price));
    output.push_str(&format!("- Stop Loss: {}\n", price(signal.stop_loss)));
    output.push_str(&format!("- Take Profit: {}\n", price(signal.take_profit)));
    if let Some(ratio) = reward_risk(signal) {
        output.push_str(&format!("- Risk/Reward: {}\n", ratio));
    }
    output.push('\n');
    output
}

pub fn format_trade_log(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "_No trades in the backtest window._\n\n".to_string();
    }

    let mut output = String::new();
    output.push_str("| # | Dir | Entry bar | Exit bar | Entry | Exit | Exit type | P&L % |\n");
    output.push_str("|---|-----|-----------|----------|-------|------|-----------|-------|\n");

    for (i, trade) in trades.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} | {:.2} | {} | {:+.2} |\n",
            i + 1,
            trade.direction,
            trade.entry_index,
            trade.exit_index,
            trade.entry_price,
            trade.exit_price,
            trade.exit_type,
            trade.profit_pct
        ));
    }

    output.push('\n');
    output
}

pub fn format_batch_summary(analyses: &[Analysis]) -> String {
    let mut output = String::new();
    output.push_str("| Symbol | Asset | Signal | Confidence | Win Rate | Trades | Profit Factor |\n");
    output.push_str("|--------|-------|--------|------------|----------|--------|---------------|\n");

    for analysis in analyses {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {:.2}% | {} | {:.2} |\n",
            analysis.symbol,
            analysis.asset_type,
            analysis.signal_type(),
            analysis.confidence,
            analysis.backtest.winrate,
            analysis.backtest.total_trades,
            analysis.backtest.profit_factor
        ));
    }

    output.push('\n');
    output
}

impl ReportPort for MarkdownReport {
    fn render(&self, analysis: &Analysis) -> Result<String, MastraderError> {
        let mut output = format!("## 📊 {} Analysis\n\n", analysis.symbol);

        output.push_str(&signal_section(analysis));
        output.push_str(&performance_section(analysis));

        match &analysis.current {
            Some(signal) => {
                output.push_str(&context_section(signal));
                output.push_str(&setup_section(signal));
            }
            None => output.push_str("_No bars available._\n\n"),
        }

        if self.show_trades {
            output.push_str("**Backtest Trades:**\n\n");
            output.push_str(&format_trade_log(&analysis.backtest.trades));
        }

        output.push_str(FOOTER);
        Ok(output)
    }

    fn render_many(&self, analyses: &[Analysis]) -> Result<String, MastraderError> {
        let mut output = String::new();
        if analyses.len() > 1 {
            output.push_str("# Multi-Asset Summary\n\n");
            output.push_str(&format_batch_summary(analyses));
        }
        for analysis in analyses {
            output.push_str(&self.render(analysis)?);
            output.push('\n');
        }
        Ok(output)
    }
}
