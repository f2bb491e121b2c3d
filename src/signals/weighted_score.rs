// =============================================================================
// Weighted Rule Scorer — indicator snapshot to trading decision
// =============================================================================
//
// Fixed rule table, evaluated top to bottom. Additive rules contribute their
// weight when triggered; the volatility dampener multiplies the accumulated
// score after all additive rules and before thresholding. The reasoning
// string lists the triggered rule tags in table order, regardless of sign.
//
//   RSI < 30                          +2.0   "RSI oversold"
//   RSI > 70                          -2.0   "RSI overbought"
//   histogram > 0 and macd > signal   +1.5   "MACD bullish"
//   histogram < 0 and macd < signal   -1.5   "MACD bearish"
//   price < lower band                +1.0   "near lower band"
//   price > upper band                -1.0   "near upper band"
//   sma20 > sma50 > sma200            +1.0   "bullish MA alignment"
//   sma20 < sma50 < sma200            -1.0   "bearish MA alignment"
//   volatility > 5%                   x0.8   "high volatility regime"
//
// score > 2 => Buy, score < -2 => Sell, otherwise Hold.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::indicators::IndicatorSnapshot;
use crate::types::SignalAction;

/// Score above which the decision is Buy.
const BUY_THRESHOLD: f64 = 2.0;
/// Score below which the decision is Sell.
const SELL_THRESHOLD: f64 = -2.0;
/// Score divisor for the confidence mapping (score of ±5 saturates).
const CONFIDENCE_SCALE: f64 = 5.0;
/// Volatility (percent) above which the dampener kicks in.
const HIGH_VOLATILITY_PCT: f64 = 5.0;
/// Multiplier applied to the score in a high-volatility regime.
const VOLATILITY_DAMPENER: f64 = 0.8;

/// The final trading decision, consumed once by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TradingSignal {
    pub action: SignalAction,
    /// Normalised decision strength in [0, 1].
    pub confidence: f64,
    /// Price the decision was made at (latest sample).
    pub price: f64,
    /// Suggested size: `max_position_size * confidence`.
    pub quantity: f64,
    /// Comma-joined triggered rule tags, in rule-table order.
    pub reasoning: String,
    pub timestamp: DateTime<Utc>,
}

/// Run the rule table and return the raw score plus the triggered tags.
///
/// Exposed separately from [`generate_signal`] so the score arithmetic can be
/// asserted exactly in tests and surfaced in diagnostics.
pub fn score_snapshot(snapshot: &IndicatorSnapshot, price: f64) -> (f64, Vec<&'static str>) {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if snapshot.rsi < 30.0 {
        score += 2.0;
        reasons.push("RSI oversold");
    }
    if snapshot.rsi > 70.0 {
        score -= 2.0;
        reasons.push("RSI overbought");
    }

    if snapshot.macd.histogram > 0.0 && snapshot.macd.macd > snapshot.macd.signal {
        score += 1.5;
        reasons.push("MACD bullish");
    }
    if snapshot.macd.histogram < 0.0 && snapshot.macd.macd < snapshot.macd.signal {
        score -= 1.5;
        reasons.push("MACD bearish");
    }

    if price < snapshot.bollinger.lower {
        score += 1.0;
        reasons.push("near lower band");
    }
    if price > snapshot.bollinger.upper {
        score -= 1.0;
        reasons.push("near upper band");
    }

    if snapshot.sma20 > snapshot.sma50 && snapshot.sma50 > snapshot.sma200 {
        score += 1.0;
        reasons.push("bullish MA alignment");
    }
    if snapshot.sma20 < snapshot.sma50 && snapshot.sma50 < snapshot.sma200 {
        score -= 1.0;
        reasons.push("bearish MA alignment");
    }

    // Dampener runs after every additive rule and before thresholding.
    if snapshot.volatility_pct > HIGH_VOLATILITY_PCT {
        score *= VOLATILITY_DAMPENER;
        reasons.push("high volatility regime");
    }

    (score, reasons)
}

/// Score the snapshot and map the result onto a [`TradingSignal`].
pub fn generate_signal(
    snapshot: &IndicatorSnapshot,
    price: f64,
    max_position_size: f64,
) -> TradingSignal {
    let (score, reasons) = score_snapshot(snapshot, price);

    let action = if score > BUY_THRESHOLD {
        SignalAction::Buy
    } else if score < SELL_THRESHOLD {
        SignalAction::Sell
    } else {
        SignalAction::Hold
    };

    let confidence = (score.abs() / CONFIDENCE_SCALE).min(1.0);

    TradingSignal {
        action,
        confidence,
        price,
        quantity: max_position_size * confidence,
        reasoning: reasons.join(", "),
        timestamp: Utc::now(),
    }
}
