// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(period); upper/lower = middle ± k·σ where σ is the
// population standard deviation of the trailing window (divide by N, not
// N-1).

use serde::Serialize;

use super::sma::calculate_sma;

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands over the trailing `period` prices.
///
/// With fewer than `period` prices all three bands collapse onto the latest
/// price (or 0.0 for an empty history).
pub fn calculate_bollinger(prices: &[f64], period: usize, num_std: f64) -> BollingerBands {
    if period == 0 || prices.len() < period {
        let latest = prices.last().copied().unwrap_or(0.0);
        return BollingerBands {
            upper: latest,
            middle: latest,
            lower: latest,
        };
    }

    let window = &prices[prices.len() - period..];
    let middle = calculate_sma(prices, period);

    let variance =
        window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    BollingerBands {
        upper: middle + num_std * std_dev,
        middle,
        lower: middle - num_std * std_dev,
    }
}
