// =============================================================================
// StockPulse — Main Entry Point
// =============================================================================
//
// Startup order matters only in one place: the ticker index must be loaded
// before the server accepts autocomplete queries. Everything else (market
// client, sentiment client) is stateless and constructed up front.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod charts;
mod config;
mod market;
mod sentiment;
mod text;
mod tickers;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::market::{MarketDataClient, YahooSource};
use crate::sentiment::RedditSentimentClient;
use crate::tickers::TickerIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("StockPulse backend starting up");

    let mut config = AppConfig::load("stockpulse.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Env overrides.
    if let Ok(addr) = std::env::var("PULSE_BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(path) = std::env::var("PULSE_TICKERS_PATH") {
        config.tickers_path = path;
    }
    if let Ok(Ok(n)) = std::env::var("PULSE_MAX_RETRIES").map(|v| v.parse()) {
        config.max_retries = n;
    }
    if let Ok(Ok(secs)) = std::env::var("PULSE_RETRY_DELAY_SECS").map(|v| v.parse()) {
        config.retry_delay_secs = secs;
    }

    info!(
        bind_addr = %config.bind_addr,
        max_retries = config.max_retries,
        retry_delay_secs = config.retry_delay_secs,
        "configuration resolved"
    );

    // ── 2. Ticker index ──────────────────────────────────────────────────
    let tickers = TickerIndex::load(&config.tickers_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load ticker table, continuing without it");
        TickerIndex::empty()
    });
    if tickers.is_empty() {
        warn!("ticker index is empty, autocomplete will return no results");
    }

    // ── 3. Collaborators & shared state ──────────────────────────────────
    let source = Arc::new(YahooSource::new().context("failed to initialise Yahoo quote source")?);
    let market = MarketDataClient::new(source, config.retry_policy());
    let sentiment = Arc::new(RedditSentimentClient::new(config.reddit_post_limit));

    let state = Arc::new(AppState::new(config, tickers, market, sentiment));

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", state.config.bind_addr))?;
    info!(addr = %state.config.bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            warn!("Shutdown signal received, stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("StockPulse shut down complete");
    Ok(())
}
