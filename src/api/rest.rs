// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Three routes: the entry page, the analysis endpoint, and ticker
// autocomplete. The analysis handler is the request orchestrator: it runs
// the sentiment and market collaborators concurrently, sanitizes post text,
// and merges both results into one body. Collaborator errors are caught
// here — once, at the outermost boundary — and converted into a single
// `{"error": ...}` envelope with a 500 status. A market fetch that exhausts
// its retries is NOT such an error: it travels inside `stock_data` as
// `{"success": false, ...}` with a 200 status.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::app_state::AppState;
use crate::text::clean_post_text;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/tickers", get(tickers))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Entry page
// =============================================================================

const INDEX_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>StockPulse</title></head>
<body>
  <h1>StockPulse</h1>
  <form method="post" action="/analyze">
    <input name="stock_symbol" list="tickers" placeholder="Ticker symbol" autocomplete="off">
    <datalist id="tickers"></datalist>
    <button type="submit">Analyze</button>
  </form>
  <script>
    const input = document.querySelector('input[name=stock_symbol]');
    const list = document.getElementById('tickers');
    input.addEventListener('input', async () => {
      const res = await fetch('/tickers?q=' + encodeURIComponent(input.value));
      const matches = await res.json();
      list.innerHTML = matches
        .map(m => `<option value="${m.Symbol}">${m.Name}</option>`)
        .join('');
    });
  </script>
</body>
</html>
"#;

async fn index() -> impl IntoResponse {
    Html(INDEX_PAGE)
}

// =============================================================================
// Analysis (the orchestrator)
// =============================================================================

#[derive(Deserialize)]
struct AnalyzeForm {
    #[serde(default)]
    stock_symbol: String,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AnalyzeForm>,
) -> impl IntoResponse {
    let symbol = form.stock_symbol.trim().to_uppercase();
    info!(symbol = %symbol, "analysis requested");

    match run_analysis(&state, &symbol).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            error!(symbol = %symbol, error = %e, "analysis request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Run one analysis request: both collaborators concurrently, then merge.
///
/// Returns `Err` only for collaborator errors (sentiment, chart rendering);
/// an exhausted market fetch is data-level and lands inside `stock_data`.
async fn run_analysis(state: &AppState, symbol: &str) -> anyhow::Result<serde_json::Value> {
    let (sentiment, stock_data) = tokio::join!(
        state.sentiment.analyze(symbol),
        state.market.fetch(symbol),
    );
    let mut sentiment = sentiment?;

    for post in &mut sentiment.top_posts {
        post.title = clean_post_text(&post.title);
        post.body = clean_post_text(&post.body);
    }

    let charts = match &state.charts {
        Some(renderer) => {
            let history = state
                .market
                .price_history(symbol)
                .await
                .map_err(|e| anyhow::anyhow!("price history for chart rendering failed: {e}"))?;
            let price_chart = renderer.render_price_chart(symbol, &history)?;
            let sentiment_chart = renderer.render_sentiment_distribution(
                symbol,
                &sentiment.sentiment_scores,
                sentiment.average_sentiment,
            )?;
            Some(json!({
                "price_chart": price_chart,
                "sentiment_chart": sentiment_chart,
            }))
        }
        None => None,
    };

    let mut body = json!({
        "stock_symbol": symbol,
        "sentiment": sentiment,
        "stock_data": stock_data,
    });
    if let Some(charts) = charts {
        body["charts"] = charts;
    }

    Ok(body)
}

// =============================================================================
// Ticker autocomplete
// =============================================================================

#[derive(Deserialize)]
struct TickerQuery {
    #[serde(default)]
    q: String,
}

async fn tickers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TickerQuery>,
) -> impl IntoResponse {
    let matches: Vec<_> = state.tickers.search(&query.q).into_iter().cloned().collect();
    Json(matches)
}
