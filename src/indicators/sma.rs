// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================

/// Arithmetic mean of the last `period` prices.
///
/// # Edge cases
/// - Empty input => 0.0
/// - Fewer than `period` prices (or `period == 0`) => the latest price.
pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    let Some(&latest) = prices.last() else {
        return 0.0;
    };
    if period == 0 || prices.len() < period {
        return latest;
    }

    prices[prices.len() - period..].iter().sum::<f64>() / period as f64
}
