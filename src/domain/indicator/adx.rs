//! ADX (Average Directional Index), simple-mean variant.
//!
//! +DM = max(H[i] - H[i-1], 0) and -DM = max(L[i-1] - L[i], 0) are taken
//! independently; both may be non-zero on the same bar. Smoothing is a
//! simple rolling mean throughout, not Wilder's:
//!
//! +DI = 100 * mean(+DM) / mean(TR), -DI likewise
//! DX  = 100 * |+DI - -DI| / (+DI + -DI)
//! ADX = mean(DX)
//!
//! Zero denominators give undefined. First defined ADX is at index 2n-1.

use super::atr::true_ranges;
use super::rolling::rolling_mean;
use super::Series;
use crate::domain::ohlcv::Bar;

pub fn directional_movement(bars: &[Bar]) -> (Series, Series) {
    let mut plus = Vec::with_capacity(bars.len());
    let mut minus = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            plus.push(None);
            minus.push(None);
            continue;
        }
        let prev = &bars[i - 1];
        plus.push(Some((bar.high - prev.high).max(0.0)));
        minus.push(Some((prev.low - bar.low).max(0.0)));
    }

    (plus, minus)
}

pub fn calculate_adx(bars: &[Bar], period: usize) -> Series {
    let tr: Vec<Option<f64>> = true_ranges(bars).into_iter().map(Some).collect();
    let (plus_dm, minus_dm) = directional_movement(bars);

    let tr_mean = rolling_mean(&tr, period);
    let plus_mean = rolling_mean(&plus_dm, period);
    let minus_mean = rolling_mean(&minus_dm, period);

    let dx: Vec<Option<f64>> = tr_mean
        .iter()
        .zip(plus_mean.iter().zip(minus_mean.iter()))
        .map(|(&tr, (&plus, &minus))| match (tr, plus, minus) {
            (Some(tr), Some(plus), Some(minus)) if tr != 0.0 => {
                let plus_di = 100.0 * plus / tr;
                let minus_di = 100.0 * minus / tr;
                let sum = plus_di + minus_di;
                (sum != 0.0).then(|| 100.0 * (plus_di - minus_di).abs() / sum)
            }
            _ => None,
        })
        .collect();

    rolling_mean(&dx, period)
}
