// =============================================================================
// Return Volatility
// =============================================================================
//
// Population standard deviation of simple returns
// `(p[i] - p[i-1]) / p[i-1]` over the full history, reported as a percentage.

/// Minimum history before a volatility reading is produced.
const MIN_SAMPLES: usize = 20;

/// Volatility of the price series, in percent.
///
/// Returns 0.0 when fewer than 20 prices are available; the signal scorer
/// treats 0 as "no volatility regime detected".
pub fn calculate_volatility(prices: &[f64]) -> f64 {
    if prices.len() < MIN_SAMPLES {
        return 0.0;
    }

    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;

    variance.sqrt() * 100.0
}
