// =============================================================================
// OKX REST API wire types
// =============================================================================
//
// Numeric fields arrive from the venue as JSON strings (prices, sizes,
// equity). They are kept as opaque `String`s here and parsed at the point of
// numeric use only, so the client never silently rounds a venue-supplied
// value through `f64`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard response envelope for every endpoint.
///
/// `code == "0"` signals success; for single-object endpoints the payload is
/// the first element of `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Vec<T>,
}

/// One ticker entry from `GET /api/v5/market/ticker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTick {
    pub inst_id: String,
    /// Last traded price.
    pub last: String,
    #[serde(default)]
    pub bid_px: String,
    #[serde(default)]
    pub ask_px: String,
    #[serde(default)]
    pub open24h: String,
    #[serde(default)]
    pub high24h: String,
    #[serde(default)]
    pub low24h: String,
    /// 24-hour volume in contract/base units.
    #[serde(default)]
    pub vol24h: String,
    /// Venue timestamp, Unix milliseconds as text.
    #[serde(default)]
    pub ts: String,
}

/// Per-currency balance detail inside a balance snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDetail {
    pub ccy: String,
    #[serde(default)]
    pub eq: String,
    #[serde(default)]
    pub cash_bal: String,
    #[serde(default)]
    pub avail_bal: String,
    #[serde(default)]
    pub frozen_bal: String,
}

/// Account balance snapshot from `GET /api/v5/account/balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    #[serde(default)]
    pub total_eq: String,
    #[serde(default)]
    pub details: Vec<BalanceDetail>,
}

/// Account-level trading configuration from `GET /api/v5/account/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    #[serde(default)]
    pub uid: String,
    /// Account level ("1" = simple, "2" = single-currency margin, ...).
    #[serde(default)]
    pub acct_lv: String,
    #[serde(default)]
    pub pos_mode: String,
    #[serde(default)]
    pub auto_loan: bool,
}

/// Order submission payload for `POST /api/v5/trade/order`.
///
/// Serialisation order and field names match the venue contract exactly; the
/// serialized JSON text is also the string that gets signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub inst_id: String,
    /// Trade mode: `cash` for spot, `cross`/`isolated` for margin.
    pub td_mode: String,
    /// `buy` or `sell`.
    pub side: String,
    /// `market`, `limit`, `post_only`, `fok`, or `ioc`.
    pub ord_type: String,
    /// Size, as text.
    pub sz: String,
    /// Price, as text. Required for limit-class orders, forbidden for market.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px: Option<String>,
    /// Client order id (alphanumeric, max 32 chars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>,
}

impl OrderRequest {
    /// Build a market order with a fresh client order id.
    pub fn market(
        inst_id: impl Into<String>,
        td_mode: impl Into<String>,
        side: impl Into<String>,
        sz: impl Into<String>,
    ) -> Self {
        Self {
            inst_id: inst_id.into(),
            td_mode: td_mode.into(),
            side: side.into(),
            ord_type: "market".to_string(),
            sz: sz.into(),
            px: None,
            cl_ord_id: Some(new_client_order_id()),
        }
    }

    /// Build a limit order with a fresh client order id.
    pub fn limit(
        inst_id: impl Into<String>,
        td_mode: impl Into<String>,
        side: impl Into<String>,
        sz: impl Into<String>,
        px: impl Into<String>,
    ) -> Self {
        Self {
            inst_id: inst_id.into(),
            td_mode: td_mode.into(),
            side: side.into(),
            ord_type: "limit".to_string(),
            sz: sz.into(),
            px: Some(px.into()),
            cl_ord_id: Some(new_client_order_id()),
        }
    }
}

/// 32-char alphanumeric id, within the venue's `clOrdId` constraints.
fn new_client_order_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Per-order acknowledgement inside the order-submission envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    #[serde(default)]
    pub ord_id: String,
    #[serde(default)]
    pub cl_ord_id: String,
    /// Per-order status code; "0" means accepted.
    #[serde(default)]
    pub s_code: String,
    #[serde(default)]
    pub s_msg: String,
}

/// One historical order from `GET /api/v5/trade/orders-history-archive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub inst_id: String,
    #[serde(default)]
    pub ord_id: String,
    #[serde(default)]
    pub cl_ord_id: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub ord_type: String,
    #[serde(default)]
    pub px: String,
    #[serde(default)]
    pub sz: String,
    #[serde(default)]
    pub avg_px: String,
    /// `live`, `partially_filled`, `filled`, or `canceled`.
    #[serde(default)]
    pub state: String,
    /// Creation time, Unix milliseconds as text.
    #[serde(default)]
    pub c_time: String,
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_deserialises_with_string_numerics() {
        let json = r#"{
            "code": "0",
            "msg": "",
            "data": [{
                "instId": "BTC-USDT",
                "last": "37020.1",
                "bidPx": "37020.0",
                "askPx": "37020.2",
                "open24h": "36500.0",
                "high24h": "37500.0",
                "low24h": "36400.0",
                "vol24h": "12345.678",
                "ts": "1700000000000"
            }]
        }"#;

        let env: ApiEnvelope<MarketTick> = serde_json::from_str(json).unwrap();
        assert_eq!(env.code, "0");
        let tick = &env.data[0];
        assert_eq!(tick.inst_id, "BTC-USDT");
        // Prices stay as text until the caller parses them.
        assert_eq!(tick.last, "37020.1");
        assert_eq!(tick.vol24h, "12345.678");
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let env: ApiEnvelope<MarketTick> =
            serde_json::from_str(r#"{"code": "51001", "msg": "Instrument ID does not exist"}"#)
                .unwrap();
        assert_eq!(env.code, "51001");
        assert!(env.data.is_empty());
    }

    #[test]
    fn market_order_serialises_without_price() {
        let order = OrderRequest::market("BTC-USDT", "cash", "buy", "0.01");
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains(r#""instId":"BTC-USDT""#));
        assert!(json.contains(r#""tdMode":"cash""#));
        assert!(json.contains(r#""ordType":"market""#));
        assert!(!json.contains("px"));
    }

    #[test]
    fn limit_order_serialises_with_price() {
        let order = OrderRequest::limit("BTC-USDT", "cash", "sell", "0.01", "40000");
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains(r#""px":"40000""#));
    }

    #[test]
    fn client_order_ids_are_unique_and_short_enough() {
        let a = OrderRequest::market("BTC-USDT", "cash", "buy", "1");
        let b = OrderRequest::market("BTC-USDT", "cash", "buy", "1");
        let (a_id, b_id) = (a.cl_ord_id.unwrap(), b.cl_ord_id.unwrap());
        assert_ne!(a_id, b_id);
        assert!(a_id.len() <= 32);
        assert!(a_id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn balance_snapshot_parses_details() {
        let json = r#"{
            "totalEq": "10500.25",
            "details": [
                {"ccy": "USDT", "eq": "9000", "cashBal": "9000", "availBal": "8500", "frozenBal": "500"},
                {"ccy": "BTC", "eq": "1500.25", "cashBal": "0.04", "availBal": "0.04", "frozenBal": "0"}
            ]
        }"#;
        let snap: BalanceSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.total_eq, "10500.25");
        assert_eq!(snap.details.len(), 2);
        assert_eq!(snap.details[1].ccy, "BTC");
    }
}
