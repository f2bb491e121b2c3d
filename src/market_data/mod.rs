// =============================================================================
// Market Data Module
// =============================================================================
//
// Rolling price/volume history fed by the ticker poll loop.

pub mod price_history;

pub use price_history::{PriceHistory, PriceSample};
