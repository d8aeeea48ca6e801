//! Property tests for pipeline invariants.
//!
//! Uses proptest over random-walk bar series to verify:
//! 1. Trades never overlap and stay inside the scan window
//! 2. Summary statistics stay in range
//! 3. Exit types agree with their profit
//! 4. Short histories never produce an actionable signal
//! 5. Analysis is deterministic

mod common;

use common::*;
use mastrader::domain::analysis::{analyze, AnalysisConfig};
use mastrader::domain::asset::AssetType;
use mastrader::domain::current_signal::SignalType;
use mastrader::domain::trade::ExitType;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_step() -> impl Strategy<Value = (f64, f64, f64)> {
    (-0.03..0.03_f64, 0.05..2.0_f64, 100.0..5000.0_f64)
}

fn arb_bars(min: usize, max: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(arb_step(), min..max).prop_map(|steps| walk_bars(&steps))
}

fn arb_asset() -> impl Strategy<Value = AssetType> {
    prop_oneof![
        Just(AssetType::Gold),
        Just(AssetType::Silver),
        Just(AssetType::Palladium),
        Just(AssetType::Bitcoin),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn trades_do_not_overlap(bars in arb_bars(200, 450), asset in arb_asset()) {
        let n = bars.len();
        let config = AnalysisConfig::default();
        let analysis = analyze(&series("WALK", bars), asset, &config);
        let trades = &analysis.backtest.trades;

        for pair in trades.windows(2) {
            prop_assert!(pair[1].entry_index > pair[0].exit_index);
        }
        for t in trades {
            prop_assert!(t.entry_index >= n.saturating_sub(config.backtest.lookback));
            prop_assert!(t.exit_index > t.entry_index);
            prop_assert!(t.exit_index < n);
            prop_assert!(t.bars_held() <= config.backtest.max_hold_bars);
        }
    }

    #[test]
    fn summary_stays_in_range(bars in arb_bars(200, 450), asset in arb_asset()) {
        let bt = analyze(&series("WALK", bars), asset, &AnalysisConfig::default()).backtest;

        prop_assert!((0.0..=100.0).contains(&bt.winrate));
        prop_assert_eq!(bt.wins + bt.losses, bt.total_trades);
        prop_assert!(bt.avg_win >= 0.0);
        prop_assert!(bt.avg_loss >= 0.0);
        prop_assert!(bt.profit_factor >= 0.0);
        if bt.total_trades == 0 {
            prop_assert_eq!(bt.winrate, 0.0);
        }
        if bt.avg_loss == 0.0 {
            prop_assert_eq!(bt.profit_factor, 0.0);
        }
    }

    #[test]
    fn exit_type_matches_profit(bars in arb_bars(200, 450)) {
        let bt = analyze(&series("WALK", bars), AssetType::Gold, &AnalysisConfig::default()).backtest;
        for t in &bt.trades {
            match t.exit_type {
                ExitType::TakeProfit => prop_assert!(t.profit_pct > 0.0),
                ExitType::StopLoss => prop_assert!(t.profit_pct < 0.0),
                ExitType::Timeout => prop_assert_eq!(t.profit_pct, 0.0),
            }
        }
    }

    #[test]
    fn short_history_waits(bars in arb_bars(1, 200), asset in arb_asset()) {
        let analysis = analyze(&series("WALK", bars), asset, &AnalysisConfig::default());
        prop_assert_eq!(analysis.signal_type(), SignalType::Wait);
        prop_assert_eq!(analysis.backtest.total_trades, 0);
        let current = analysis.current.as_ref().unwrap();
        prop_assert!(current.stop_loss.is_none());
        prop_assert!(current.take_profit.is_none());
    }

    #[test]
    fn analysis_is_deterministic(bars in arb_bars(0, 400), asset in arb_asset()) {
        let config = AnalysisConfig::default();
        let a = analyze(&series("WALK", bars.clone()), asset, &config);
        let b = analyze(&series("WALK", bars), asset, &config);
        prop_assert_eq!(a, b);
    }
}
