// =============================================================================
// Meridian Signal Engine — Main Entry Point
// =============================================================================
//
// Polls the venue ticker on a fixed interval, feeds each tick into the
// indicator engine, and logs the resulting trading signal. Order placement is
// left to the operator: the engine only ever *suggests*.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod credential_store;
mod credentials;
mod engine;
mod error;
mod indicators;
mod market_data;
mod okx;
mod runtime_config;
mod signals;
mod types;

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::credential_store::CredentialStore;
use crate::credentials::Credentials;
use crate::engine::IndicatorEngine;
use crate::okx::OkxClient;
use crate::runtime_config::EngineConfig;

/// Seconds between ticker polls.
const POLL_INTERVAL_SECS: u64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Meridian Signal Engine starting up");

    let config = EngineConfig::load("engine_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "failed to load engine config, using defaults");
        EngineConfig::default()
    });

    let inst_id = std::env::var("MERIDIAN_INST_ID").unwrap_or_else(|_| "BTC-USDT".to_string());

    info!(
        inst_id = %inst_id,
        model = %config.model,
        lookback = config.lookback,
        risk_tolerance = %config.risk_tolerance,
        max_position_size = config.max_position_size,
        stop_loss_pct = config.stop_loss_pct,
        take_profit_pct = config.take_profit_pct,
        "engine configured"
    );

    // ── 2. Build client & credentials ────────────────────────────────────
    let client = OkxClient::new();
    let store = CredentialStore::new(
        std::env::var("MERIDIAN_CREDENTIALS_FILE")
            .unwrap_or_else(|_| "credentials.json".to_string()),
    );

    match load_credentials(&store) {
        Some(credentials) => {
            client.set_credentials(credentials);

            // One verification attempt at startup; a failure is logged and the
            // engine keeps running on public market data only. Re-verification
            // is up to the operator -- nothing retries automatically.
            match client.verify_credentials().await {
                Ok(()) => {
                    info!(state = %client.credential_state(), "credentials verified");
                    match client.get_account_balance().await {
                        Ok(balance) => {
                            info!(total_eq = %balance.total_eq, "account balance fetched")
                        }
                        Err(e) => warn!(error = %e, "balance fetch failed"),
                    }
                }
                Err(e) => warn!(error = %e, "credential verification failed"),
            }
        }
        None => {
            info!("no credentials configured; running on public market data only");
        }
    }

    // ── 3. Poll loop ─────────────────────────────────────────────────────
    let mut engine = IndicatorEngine::new(config);
    let mut ticker = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));

    info!(interval_secs = POLL_INTERVAL_SECS, "entering poll loop");

    loop {
        ticker.tick().await;

        let tick = match client.get_market_data(&inst_id).await {
            Ok(tick) => tick,
            Err(e) => {
                warn!(error = %e, "ticker fetch failed");
                continue;
            }
        };

        // Venue numerics arrive as text; parse at the point of use.
        let price: f64 = match tick.last.parse() {
            Ok(p) => p,
            Err(_) => {
                warn!(last = %tick.last, "unparseable last price, skipping tick");
                continue;
            }
        };
        let volume: f64 = tick.vol24h.parse().unwrap_or(0.0);

        engine.add_sample(price, volume);
        let signal = engine.generate_signal();

        info!(
            inst_id = %inst_id,
            price,
            samples = engine.history_len(),
            action = %signal.action,
            confidence = signal.confidence,
            quantity = signal.quantity,
            reasoning = %signal.reasoning,
            "signal"
        );
    }
}

/// Resolve credentials: environment variables win over the stored record.
fn load_credentials(store: &CredentialStore) -> Option<Credentials> {
    if let (Ok(api_key), Ok(secret_key), Ok(passphrase)) = (
        std::env::var("OKX_API_KEY"),
        std::env::var("OKX_SECRET_KEY"),
        std::env::var("OKX_PASSPHRASE"),
    ) {
        info!("credentials loaded from environment");
        return Some(Credentials::new(api_key, secret_key, passphrase));
    }

    match store.load() {
        Ok(Some(credentials)) => {
            info!(path = %store.path().display(), "credentials loaded from store");
            Some(credentials)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "failed to load stored credentials");
            None
        }
    }
}
