// =============================================================================
// Relative Strength Index (RSI)
// =============================================================================
//
// Measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive samples.
// Step 2 — Average the gains and losses across the last `period` deltas.
//          This is a plain arithmetic mean, not Wilder's smoothing: each
//          window is scored independently of the previous one.
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

/// Default look-back used by the snapshot.
pub const DEFAULT_PERIOD: usize = 14;

/// Compute the RSI of the last `period` price changes.
///
/// # Edge cases
/// - Fewer than `period + 1` prices (i.e. fewer than `period` deltas) => 50.0
///   (neutral — not enough history to call the market either way).
/// - Average loss of exactly zero => 100.0. A monotonically rising window has
///   no losses; the division-free answer is pinned at the top of the scale.
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 50.0;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &deltas[deltas.len() - period..];

    let (sum_gain, sum_loss) = recent.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let avg_gain = sum_gain / period_f;
    let avg_loss = sum_loss / period_f;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input_is_neutral() {
        assert_eq!(calculate_rsi(&[], 14), 50.0);
    }

    #[test]
    fn rsi_exactly_period_samples_is_neutral() {
        // 14 samples give only 13 deltas — still insufficient.
        let prices: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), 50.0);
    }

    #[test]
    fn rsi_period_plus_one_samples_is_computed() {
        let prices: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), 100.0);
    }

    #[test]
    fn rsi_all_gains_is_pinned_at_100() {
        let prices: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), 100.0);
    }

    #[test]
    fn rsi_flat_market_has_zero_loss_and_pins_at_100() {
        // No movement at all means avg_loss == 0, which takes the same branch
        // as the all-gains case.
        let prices = vec![100.0; 30];
        assert_eq!(calculate_rsi(&prices, 14), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.abs() < 1e-10, "expected 0.0, got {rsi}");
    }

    #[test]
    fn rsi_balanced_moves_is_50() {
        // Alternating +1/-1 deltas: equal average gain and loss => RSI 50.
        let mut prices = vec![100.0];
        for i in 0..20 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        let rsi = calculate_rsi(&prices, 14);
        assert!((rsi - 50.0).abs() < 1e-10, "expected 50.0, got {rsi}");
    }

    #[test]
    fn rsi_uses_only_the_last_period_deltas() {
        // A long losing streak followed by 14 straight gains: only the recent
        // window counts, so the result is pinned at 100.
        let mut prices: Vec<f64> = (1..=30).rev().map(|x| x as f64 + 100.0).collect();
        let mut last = *prices.last().unwrap();
        for _ in 0..14 {
            last += 1.0;
            prices.push(last);
        }
        assert_eq!(calculate_rsi(&prices, 14), 100.0);
    }

    #[test]
    fn rsi_range_check() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let rsi = calculate_rsi(&prices, 14);
        assert!((0.0..=100.0).contains(&rsi), "RSI {rsi} out of range");
    }
}
