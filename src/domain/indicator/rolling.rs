//! Sliding-window accumulators shared by the indicator calculations.
//!
//! Every function returns one value per input index. A window yields `None`
//! until it holds `period` defined observations; an undefined input keeps the
//! output undefined until it slides out of the window.

use super::Series;
use std::collections::VecDeque;

/// Running sum / sum-of-squares over the last `period` inputs.
///
/// Sums are kept relative to `shift`, a value taken from the window, and are
/// recomputed exactly once every `period` pushes. Variance stays accurate when
/// prices are large relative to their spread. Non-finite inputs count as
/// undefined.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    window: VecDeque<Option<f64>>,
    shift: f64,
    sum: f64,
    sum_sq: f64,
    defined: usize,
    since_resum: usize,
}

impl RollingWindow {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::with_capacity(period),
            shift: 0.0,
            sum: 0.0,
            sum_sq: 0.0,
            defined: 0,
            since_resum: 0,
        }
    }

    pub fn push(&mut self, value: Option<f64>) {
        if self.period == 0 {
            return;
        }
        let value = value.filter(|v| v.is_finite());

        if self.window.len() == self.period {
            if let Some(Some(old)) = self.window.pop_front() {
                let d = old - self.shift;
                self.sum -= d;
                self.sum_sq -= d * d;
                self.defined -= 1;
            }
        }
        self.window.push_back(value);
        if let Some(v) = value {
            if self.defined == 0 {
                self.shift = v;
                self.sum = 0.0;
                self.sum_sq = 0.0;
            }
            let d = v - self.shift;
            self.sum += d;
            self.sum_sq += d * d;
            self.defined += 1;
        }

        self.since_resum += 1;
        if self.since_resum >= self.period {
            self.resum();
        }
    }

    /// Re-anchor on the oldest defined value and rebuild the sums exactly.
    fn resum(&mut self) {
        self.since_resum = 0;
        self.sum = 0.0;
        self.sum_sq = 0.0;
        let Some(&first) = self.window.iter().flatten().next() else {
            return;
        };
        self.shift = first;
        for v in self.window.iter().flatten() {
            let d = v - first;
            self.sum += d;
            self.sum_sq += d * d;
        }
    }

    pub fn is_full(&self) -> bool {
        self.period > 0 && self.defined == self.period
    }

    pub fn mean(&self) -> Option<f64> {
        self.is_full()
            .then(|| self.shift + self.sum / self.period as f64)
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn sample_std(&self) -> Option<f64> {
        if !self.is_full() || self.period < 2 {
            return None;
        }
        let n = self.period as f64;
        let variance = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
        // rounding can leave a constant window a hair below zero
        Some(variance.max(0.0).sqrt())
    }
}

pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Series {
    let mut window = RollingWindow::new(period);
    values
        .iter()
        .map(|&v| {
            window.push(v);
            window.mean()
        })
        .collect()
}

pub fn rolling_sample_std(values: &[Option<f64>], period: usize) -> Series {
    let mut window = RollingWindow::new(period);
    values
        .iter()
        .map(|&v| {
            window.push(v);
            window.sample_std()
        })
        .collect()
}

pub fn rolling_max(values: &[f64], period: usize) -> Series {
    rolling_extreme(values, period, |candidate, kept| candidate >= kept)
}

pub fn rolling_min(values: &[f64], period: usize) -> Series {
    rolling_extreme(values, period, |candidate, kept| candidate <= kept)
}

/// Monotonic deque: `dominates(new, back)` evicts `back` from the tail.
fn rolling_extreme(values: &[f64], period: usize, dominates: fn(f64, f64) -> bool) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut deque: VecDeque<usize> = VecDeque::with_capacity(period);
    let mut out = Vec::with_capacity(values.len());

    for (i, &value) in values.iter().enumerate() {
        while let Some(&back) = deque.back() {
            if dominates(value, values[back]) {
                deque.pop_back();
            } else {
                break;
            }
        }
        deque.push_back(i);

        while let Some(&front) = deque.front() {
            if front + period <= i {
                deque.pop_front();
            } else {
                break;
            }
        }

        if i + 1 >= period {
            out.push(deque.front().map(|&idx| values[idx]));
        } else {
            out.push(None);
        }
    }

    out
}

/// Shift a series forward by one bar: `out[i] = values[i - 1]`, `out[0] = None`.
pub fn shift_one(values: &[Option<f64>]) -> Series {
    if values.is_empty() {
        return Vec::new();
    }
    std::iter::once(None)
        .chain(values[..values.len() - 1].iter().copied())
        .collect()
}
