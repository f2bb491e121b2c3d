// =============================================================================
// OKX REST API Client — HMAC-SHA256 signed requests
// =============================================================================
//
// SECURITY: The secret key is never logged or serialized. Signed requests
// carry OK-ACCESS-KEY / OK-ACCESS-SIGN / OK-ACCESS-TIMESTAMP /
// OK-ACCESS-PASSPHRASE headers; the signature is the Base64 HMAC-SHA256 of
// `timestamp + METHOD + path + body` and must byte-match what is sent.
//
// The client snapshots its credentials once per request, so replacing them
// mid-flight cannot change what gets signed. It never retries: a failed call
// must be re-invoked by the caller.
// =============================================================================

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::{debug, instrument};

use crate::credentials::{CredentialState, Credentials};
use crate::error::ClientError;
use crate::okx::types::{
    AccountConfig, ApiEnvelope, BalanceSnapshot, MarketTick, OrderAck, OrderRecord, OrderRequest,
};

type HmacSha256 = Hmac<Sha256>;

/// Fixed venue host. The sandbox flag on [`Credentials`] is accepted for
/// compatibility but does not change the target.
const BASE_URL: &str = "https://www.okx.com";

/// Request timeout for all calls (seconds).
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// OKX REST API client with per-request HMAC-SHA256 signing.
pub struct OkxClient {
    http: reqwest::Client,
    base_url: String,
    credentials: RwLock<Option<Credentials>>,
    state: RwLock<CredentialState>,
}

impl OkxClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a client against the production venue host.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Create a client against an explicit host (used by tests and callers
    /// with a proxy in front of the venue).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to build reqwest client");

        let base_url = base_url.into();
        debug!(base_url = %base_url, "OkxClient initialised");

        Self {
            http,
            base_url,
            credentials: RwLock::new(None),
            state: RwLock::new(CredentialState::Uninitialized),
        }
    }

    // -------------------------------------------------------------------------
    // Credential lifecycle
    // -------------------------------------------------------------------------

    /// Store credentials for subsequent signed calls.
    ///
    /// No validation and no network traffic happen here; format checking is a
    /// separate explicit step so callers can surface errors before attempting
    /// a call. Any previous `Verified` status is dropped.
    pub fn set_credentials(&self, credentials: Credentials) {
        *self.credentials.write() = Some(credentials);
        *self.state.write() = CredentialState::CredentialsSet;
    }

    /// Current position in the credential lifecycle.
    pub fn credential_state(&self) -> CredentialState {
        *self.state.read()
    }

    /// Snapshot the stored credentials for one request.
    fn credentials_snapshot(&self) -> Result<Credentials, ClientError> {
        self.credentials
            .read()
            .clone()
            .ok_or(ClientError::CredentialsNotSet)
    }

    /// Verify the stored credentials against the venue.
    ///
    /// The local format check runs first; a shape failure is returned without
    /// any network call. On success a signed request hits the account-balance
    /// endpoint and the response is classified into the error taxonomy. A
    /// clean envelope (code "0") promotes the client to `Verified`.
    #[instrument(skip(self), name = "okx::verify_credentials")]
    pub async fn verify_credentials(&self) -> Result<(), ClientError> {
        let credentials = self.credentials_snapshot()?;
        credentials.validate_format()?;

        let envelope: ApiEnvelope<BalanceSnapshot> =
            self.signed_get("/api/v5/account/balance").await?;

        if envelope.code != "0" {
            return Err(ClientError::Venue {
                code: envelope.code,
                message: envelope.msg,
            });
        }

        *self.state.write() = CredentialState::Verified;
        debug!("credentials verified");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Signing
    // -------------------------------------------------------------------------

    /// Produce the Base64 HMAC-SHA256 signature for one request.
    ///
    /// The signed string is `timestamp + METHOD + path + body` where `path`
    /// includes the query string and `body` is the exact JSON text that will
    /// be sent (empty for bodyless requests).
    pub fn sign(
        &self,
        timestamp: &str,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<String, ClientError> {
        let credentials = self.credentials_snapshot()?;
        Ok(sign_with_secret(
            &credentials.secret_key,
            timestamp,
            method,
            path,
            body,
        ))
    }

    /// Build the signed header set for one request.
    ///
    /// The timestamp is taken from the wall clock here and used for both the
    /// signature and the `OK-ACCESS-TIMESTAMP` header, so the two can never
    /// disagree. Two rapid calls therefore produce different signatures.
    pub fn build_headers(
        &self,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<HeaderMap, ClientError> {
        let credentials = self.credentials_snapshot()?;
        let timestamp = iso_timestamp();
        let signature = sign_with_secret(&credentials.secret_key, &timestamp, method, path, body);

        let mut headers = HeaderMap::new();
        headers.insert("OK-ACCESS-KEY", header_value(&credentials.api_key)?);
        headers.insert("OK-ACCESS-SIGN", header_value(&signature)?);
        headers.insert("OK-ACCESS-TIMESTAMP", header_value(&timestamp)?);
        headers.insert("OK-ACCESS-PASSPHRASE", header_value(&credentials.passphrase)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v5/market/ticker (public — no signature required).
    #[instrument(skip(self), name = "okx::get_market_data")]
    pub async fn get_market_data(&self, inst_id: &str) -> Result<MarketTick, ClientError> {
        let url = format!("{}/api/v5/market/ticker?instId={}", self.base_url, inst_id);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(classify_transport)?;

        let envelope: ApiEnvelope<MarketTick> = check_http(resp).await?;

        if envelope.code != "0" || envelope.data.is_empty() {
            return Err(ClientError::FetchFailed(format!(
                "no ticker data for {inst_id} (code {})",
                envelope.code
            )));
        }

        let tick = envelope.data.into_iter().next().unwrap();
        debug!(inst_id, last = %tick.last, "ticker fetched");
        Ok(tick)
    }

    // -------------------------------------------------------------------------
    // Account
    // -------------------------------------------------------------------------

    /// GET /api/v5/account/balance (signed).
    #[instrument(skip(self), name = "okx::get_account_balance")]
    pub async fn get_account_balance(&self) -> Result<BalanceSnapshot, ClientError> {
        let envelope: ApiEnvelope<BalanceSnapshot> =
            self.signed_get("/api/v5/account/balance").await?;
        Self::unwrap_single(envelope, "balance")
    }

    /// GET /api/v5/account/config (signed).
    #[instrument(skip(self), name = "okx::get_account_config")]
    pub async fn get_account_config(&self) -> Result<AccountConfig, ClientError> {
        let envelope: ApiEnvelope<AccountConfig> =
            self.signed_get("/api/v5/account/config").await?;
        Self::unwrap_single(envelope, "account config")
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// POST /api/v5/trade/order (signed, JSON body).
    ///
    /// Order parameters are validated locally before anything is signed, so a
    /// malformed order never consumes a timestamp window on a request that
    /// the venue would reject anyway. On venue rejection the per-order
    /// message is preferred over the generic envelope message.
    #[instrument(skip(self, order), name = "okx::place_order")]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ClientError> {
        validate_order_params(order)?;

        let body = serde_json::to_string(order)
            .map_err(|e| ClientError::Transport(format!("failed to serialise order: {e}")))?;

        let path = "/api/v5/trade/order";
        let headers = self.build_headers("POST", path, &body)?;
        let url = format!("{}{}", self.base_url, path);

        debug!(inst_id = %order.inst_id, side = %order.side, ord_type = %order.ord_type, "placing order");

        let resp = self
            .http
            .post(&url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(classify_transport)?;

        let envelope: ApiEnvelope<OrderAck> = check_http(resp).await?;

        if envelope.code != "0" {
            let message = envelope
                .data
                .first()
                .filter(|ack| !ack.s_msg.is_empty())
                .map(|ack| ack.s_msg.clone())
                .unwrap_or(envelope.msg);
            return Err(ClientError::Venue {
                code: envelope.code,
                message,
            });
        }

        Self::unwrap_single(envelope, "order acknowledgement")
    }

    /// GET /api/v5/trade/orders-history-archive (signed), optionally filtered
    /// by instrument.
    #[instrument(skip(self), name = "okx::get_order_history")]
    pub async fn get_order_history(
        &self,
        inst_id: Option<&str>,
    ) -> Result<Vec<OrderRecord>, ClientError> {
        let path = match inst_id {
            Some(id) => format!("/api/v5/trade/orders-history-archive?instId={id}"),
            None => "/api/v5/trade/orders-history-archive".to_string(),
        };

        let envelope: ApiEnvelope<OrderRecord> = self.signed_get(&path).await?;

        if envelope.code != "0" {
            return Err(ClientError::Venue {
                code: envelope.code,
                message: envelope.msg,
            });
        }

        debug!(count = envelope.data.len(), "order history fetched");
        Ok(envelope.data)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// Issue a signed GET against `path_and_query` and parse the envelope.
    async fn signed_get<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let headers = self.build_headers("GET", path_and_query, "")?;
        let url = format!("{}{}", self.base_url, path_and_query);

        let resp = self
            .http
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(classify_transport)?;

        check_http(resp).await
    }

    /// Enforce the zero-code contract and pull the first `data` element.
    fn unwrap_single<T>(envelope: ApiEnvelope<T>, what: &str) -> Result<T, ClientError> {
        if envelope.code != "0" {
            return Err(ClientError::Venue {
                code: envelope.code,
                message: envelope.msg,
            });
        }
        envelope
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::FetchFailed(format!("empty {what} response")))
    }
}

impl Default for OkxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OkxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OkxClient")
            .field("base_url", &self.base_url)
            .field("state", &*self.state.read())
            .finish()
    }
}

// =============================================================================
// Free helpers
// =============================================================================

/// ISO-8601 timestamp with millisecond precision, e.g. `2024-01-02T03:04:05.678Z`.
fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `Base64(HMAC-SHA256(secret, timestamp + METHOD + path + body))`.
fn sign_with_secret(secret: &str, timestamp: &str, method: &str, path: &str, body: &str) -> String {
    let prehash = format!("{timestamp}{}{path}{body}", method.to_uppercase());
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(prehash.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::Transport("credential contains a non-header-safe character".into()))
}

/// Map a `reqwest` failure into the taxonomy: DNS/connect/timeout-class
/// errors become `Network`, everything else a generic transport error.
fn classify_transport(err: reqwest::Error) -> ClientError {
    if err.is_timeout() || err.is_connect() {
        ClientError::Network
    } else {
        ClientError::Transport(err.to_string())
    }
}

/// Classify the HTTP layer, then parse the envelope.
///
/// 401 and 403 are mapped to their own taxonomy entries; for any other
/// non-success status the venue message (when the body parses as an
/// envelope) is attached to the error.
async fn check_http<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<ApiEnvelope<T>, ClientError> {
    let status = resp.status();
    let text = resp.text().await.map_err(classify_transport)?;

    if status == StatusCode::UNAUTHORIZED {
        let message = venue_message(&text).unwrap_or_else(|| "HTTP 401".to_string());
        return Err(ClientError::Auth(message));
    }
    if status == StatusCode::FORBIDDEN {
        return Err(ClientError::Permission);
    }
    if !status.is_success() {
        let message = venue_message(&text).unwrap_or_else(|| truncate(&text, 200));
        return Err(ClientError::Http {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| ClientError::Transport(format!("failed to decode venue response: {e}")))
}

/// Best-effort extraction of the `msg` field from an error body.
fn venue_message(text: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("msg").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty())
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Local pre-send order checks. A violation fails fast, before signing.
///
/// 1. Spot instruments (two-part id quoted in USDT or USD) trade in `cash`
///    mode only.
/// 2. Limit-class order types require a price.
/// 3. Market orders must omit the price.
fn validate_order_params(order: &OrderRequest) -> Result<(), ClientError> {
    let parts: Vec<&str> = order.inst_id.split('-').collect();
    let is_spot = parts.len() == 2
        && (parts[1].eq_ignore_ascii_case("USDT") || parts[1].eq_ignore_ascii_case("USD"));

    if is_spot && order.td_mode != "cash" {
        return Err(ClientError::OrderValidation(format!(
            "spot instrument {} requires cash trade mode, got {}",
            order.inst_id, order.td_mode
        )));
    }

    let limit_class = matches!(order.ord_type.as_str(), "limit" | "post_only" | "fok" | "ioc");
    if limit_class && order.px.is_none() {
        return Err(ClientError::OrderValidation(
            "limit orders require a price".to_string(),
        ));
    }

    if order.ord_type == "market" && order.px.is_some() {
        return Err(ClientError::OrderValidation(
            "market orders must not carry a price".to_string(),
        ));
    }

    Ok(())
}
