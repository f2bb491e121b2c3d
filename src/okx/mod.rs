// =============================================================================
// OKX venue integration
// =============================================================================
//
// REST client with HMAC-SHA256 request signing plus the wire types for the
// endpoints the engine consumes.

pub mod client;
pub mod types;

pub use client::OkxClient;
pub use types::{MarketTick, OrderRequest};
