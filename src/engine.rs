// =============================================================================
// Indicator Engine — rolling history in, trading signal out
// =============================================================================
//
// Pipeline per poll:
//   1. `add_sample` appends the latest price/volume to the rolling window
//   2. `snapshot` recomputes every indicator from the current history
//   3. `generate_signal` runs the weighted rule table over the snapshot
//
// The engine raises no errors: every indicator degrades to a documented
// fallback when history is short, so the caller can poll from a cold start
// without special-casing warm-up.
//
// Owned by the caller. Multiple isolated engines (one per instrument or per
// account) are plain values; there is no process-wide instance.
// =============================================================================

use crate::indicators::bollinger::{calculate_bollinger, BollingerBands};
use crate::indicators::ema::calculate_ema;
use crate::indicators::macd::{calculate_macd, MacdResult};
use crate::indicators::rsi::{calculate_rsi, DEFAULT_PERIOD as RSI_PERIOD};
use crate::indicators::sma::calculate_sma;
use crate::indicators::volatility::calculate_volatility;
use crate::indicators::IndicatorSnapshot;
use crate::market_data::PriceHistory;
use crate::runtime_config::{EngineConfig, EngineConfigUpdate};
use crate::signals::weighted_score::{generate_signal, TradingSignal};

/// Bollinger window and band width used by the snapshot.
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STD: f64 = 2.0;

pub struct IndicatorEngine {
    history: PriceHistory,
    config: EngineConfig,
}

impl IndicatorEngine {
    /// Create an engine with an empty history sized from `config.lookback`.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            history: PriceHistory::new(config.lookback),
            config,
        }
    }

    /// Append one observed sample to the rolling window.
    pub fn add_sample(&mut self, price: f64, volume: f64) {
        self.history.push(price, volume);
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Merge a partial config update; a lookback change takes effect on the
    /// next sample.
    pub fn update_config(&mut self, update: EngineConfigUpdate) {
        self.config.apply(update);
        self.history.set_lookback(self.config.lookback);
    }

    // -------------------------------------------------------------------------
    // Individual indicators
    // -------------------------------------------------------------------------

    pub fn rsi(&self, period: usize) -> f64 {
        calculate_rsi(&self.history.prices(), period)
    }

    pub fn ema(&self, period: usize) -> f64 {
        calculate_ema(&self.history.prices(), period)
    }

    pub fn macd(&self) -> MacdResult {
        calculate_macd(&self.history.prices())
    }

    pub fn sma(&self, period: usize) -> f64 {
        calculate_sma(&self.history.prices(), period)
    }

    pub fn bollinger_bands(&self) -> BollingerBands {
        calculate_bollinger(&self.history.prices(), BOLLINGER_PERIOD, BOLLINGER_STD)
    }

    pub fn volatility(&self) -> f64 {
        calculate_volatility(&self.history.prices())
    }

    // -------------------------------------------------------------------------
    // Snapshot & signal
    // -------------------------------------------------------------------------

    /// Compute every indicator over the current history.
    pub fn snapshot(&self) -> IndicatorSnapshot {
        let prices = self.history.prices();

        IndicatorSnapshot {
            rsi: calculate_rsi(&prices, RSI_PERIOD),
            macd: calculate_macd(&prices),
            bollinger: calculate_bollinger(&prices, BOLLINGER_PERIOD, BOLLINGER_STD),
            sma20: calculate_sma(&prices, 20),
            sma50: calculate_sma(&prices, 50),
            sma200: calculate_sma(&prices, 200),
            volume: self.history.latest_volume().unwrap_or(0.0),
            volatility_pct: calculate_volatility(&prices),
        }
    }

    /// Score the current snapshot into a trading decision.
    ///
    /// Deterministic over the history: without an intervening `add_sample`,
    /// repeated calls differ only in their wall-clock timestamp.
    pub fn generate_signal(&self) -> TradingSignal {
        let price = self.history.latest_price().unwrap_or(0.0);
        generate_signal(&self.snapshot(), price, self.config.max_position_size)
    }
}
