//! Bollinger Bands.
//!
//! - Middle: n-period SMA of close
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by n-1).
//! Default parameters: period=20, multiplier=2.0. Warmup: first (period-1)
//! bars are undefined.

use super::rolling::RollingWindow;
use super::Series;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Series,
    pub upper: Series,
    pub lower: Series,
}

pub fn calculate_bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let mut window = RollingWindow::new(period);
    let mut middle = Vec::with_capacity(closes.len());
    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for &close in closes {
        window.push(Some(close));
        match (window.mean(), window.sample_std()) {
            (Some(mean), Some(std)) => {
                middle.push(Some(mean));
                upper.push(Some(mean + multiplier * std));
                lower.push(Some(mean - multiplier * std));
            }
            _ => {
                middle.push(None);
                upper.push(None);
                lower.push(None);
            }
        }
    }

    BollingerBands {
        middle,
        upper,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bollinger_warmup() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0);
        assert!(bands.middle[0].is_none());
        assert!(bands.upper[1].is_none());
        assert!(bands.lower[1].is_none());
        assert!(bands.middle[2].is_some());
        assert!(bands.lower[4].is_some());
    }

    #[test]
    fn bollinger_constant_values() {
        let bands = calculate_bollinger(&[100.0; 5], 3, 2.0);
        assert_relative_eq!(bands.middle[2].unwrap(), 100.0);
        assert_relative_eq!(bands.upper[2].unwrap(), 100.0);
        assert_relative_eq!(bands.lower[2].unwrap(), 100.0);
    }

    #[test]
    fn bollinger_uses_sample_stddev() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0);
        // sample variance of [10, 20, 30] = 200 / 2 = 100 → std 10
        assert_relative_eq!(bands.middle[2].unwrap(), 20.0, epsilon = 1e-10);
        assert_relative_eq!(bands.upper[2].unwrap(), 40.0, epsilon = 1e-10);
        assert_relative_eq!(bands.lower[2].unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let bands = calculate_bollinger(&[12.0, 17.0, 11.0, 25.0, 19.0], 4, 1.5);
        for i in 3..5 {
            let mid = bands.middle[i].unwrap();
            let up = bands.upper[i].unwrap() - mid;
            let down = mid - bands.lower[i].unwrap();
            assert_relative_eq!(up, down, epsilon = 1e-10);
        }
    }
}
