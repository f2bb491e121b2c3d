// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator calculations over a price slice. None of
// these functions error: insufficient history always yields a documented
// fallback value (neutral RSI, zeroed MACD, bands collapsed onto the latest
// price), so the signal pipeline never has to special-case a short history.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volatility;

use serde::Serialize;

use self::bollinger::BollingerBands;
use self::macd::MacdResult;

/// All indicators computed over one price/volume history, bundled for the
/// signal generator. Recomputed in full on every request; there is no
/// incremental state beyond the history itself.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: MacdResult,
    pub bollinger: BollingerBands,
    pub sma20: f64,
    pub sma50: f64,
    pub sma200: f64,
    /// Volume of the most recent sample.
    pub volume: f64,
    /// Population standard deviation of simple returns, in percent.
    pub volatility_pct: f64,
}
