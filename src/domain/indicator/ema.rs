//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first observed value (no SMA seed, no bias
//! correction): EMA[0] = V[0], EMA[i] = V[i]*k + EMA[i-1]*(1-k).
//! The recursion runs from the first bar, but the first (n-1) values are
//! reported as undefined.

use super::Series;

pub fn calculate_ema(values: &[f64], span: usize) -> Series {
    if span == 0 {
        return vec![None; values.len()];
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut ema = 0.0;

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            ema = if i == 0 {
                value
            } else {
                value * k + ema * (1.0 - k)
            };
            (i + 1 >= span).then_some(ema)
        })
        .collect()
}
