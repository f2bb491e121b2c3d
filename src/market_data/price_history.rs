// =============================================================================
// PriceHistory — bounded rolling price/volume window
// =============================================================================
//
// Samples arrive in polling order and the order is significant: EMA and
// trend calculations walk the sequence front to back. The window is bounded
// by a sliding rule rather than a hard per-insert cap: the buffer may grow
// to `2 * lookback` before it is truncated back to the `lookback`
// most-recent samples.
//
// Not internally locked. Samples are appended from a single polling loop;
// the trim step is not atomic-safe under concurrent writers, so callers that
// introduce concurrent ingestion must serialise `push`.

use serde::{Deserialize, Serialize};

/// One observed price/volume point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    pub volume: f64,
}

/// Append-only rolling history, bounded to `lookback` by the sliding rule.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    samples: Vec<PriceSample>,
    lookback: usize,
}

impl PriceHistory {
    /// Create an empty history that retains `lookback` samples.
    pub fn new(lookback: usize) -> Self {
        Self {
            samples: Vec::with_capacity(2 * lookback + 1),
            lookback,
        }
    }

    /// Append one sample, truncating when the window overflows.
    pub fn push(&mut self, price: f64, volume: f64) {
        self.samples.push(PriceSample { price, volume });

        if self.samples.len() > 2 * self.lookback {
            let excess = self.samples.len() - self.lookback;
            self.samples.drain(..excess);
        }
    }

    /// Prices in arrival order.
    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }

    /// Most recent price, if any sample exists.
    pub fn latest_price(&self) -> Option<f64> {
        self.samples.last().map(|s| s.price)
    }

    /// Most recent volume, if any sample exists.
    pub fn latest_volume(&self) -> Option<f64> {
        self.samples.last().map(|s| s.volume)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Change the retention window. Takes effect on the next `push`.
    pub fn set_lookback(&mut self, lookback: usize) {
        self.lookback = lookback;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_arrival_order() {
        let mut history = PriceHistory::new(10);
        history.push(100.0, 1.0);
        history.push(101.0, 2.0);
        history.push(99.0, 3.0);

        assert_eq!(history.prices(), vec![100.0, 101.0, 99.0]);
        assert_eq!(history.latest_price(), Some(99.0));
        assert_eq!(history.latest_volume(), Some(3.0));
    }

    #[test]
    fn window_grows_to_double_lookback_before_truncating() {
        let mut history = PriceHistory::new(5);
        for i in 0..10 {
            history.push(i as f64, 0.0);
        }
        // Exactly 2 * lookback: no truncation yet.
        assert_eq!(history.len(), 10);

        history.push(10.0, 0.0);
        // One past the bound: cut back to the lookback most-recent samples.
        assert_eq!(history.len(), 5);
        assert_eq!(history.prices(), vec![6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn truncation_keeps_most_recent_samples() {
        let mut history = PriceHistory::new(3);
        for i in 0..20 {
            history.push(i as f64, i as f64 * 10.0);
        }
        let prices = history.prices();
        assert!(prices.len() <= 6);
        assert_eq!(*prices.last().unwrap(), 19.0);
        // Oldest retained sample is always within the last 2*lookback pushes.
        assert!(prices[0] >= 14.0);
    }

    #[test]
    fn empty_history_has_no_latest() {
        let history = PriceHistory::new(10);
        assert!(history.is_empty());
        assert_eq!(history.latest_price(), None);
        assert_eq!(history.latest_volume(), None);
    }

    #[test]
    fn set_lookback_applies_on_next_push() {
        let mut history = PriceHistory::new(100);
        for i in 0..50 {
            history.push(i as f64, 0.0);
        }
        history.set_lookback(10);
        assert_eq!(history.len(), 50); // unchanged until the next push

        history.push(50.0, 0.0);
        // 51 > 2*10, so the window snaps down to the 10 most-recent.
        assert_eq!(history.len(), 10);
        assert_eq!(history.latest_price(), Some(50.0));
    }
}
