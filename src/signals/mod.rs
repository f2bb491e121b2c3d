// =============================================================================
// Signals Module
// =============================================================================
//
// Weighted rule scoring over an indicator snapshot, producing the final
// buy/sell/hold decision.

pub mod weighted_score;

pub use weighted_score::{generate_signal, TradingSignal};
