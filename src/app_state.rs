// =============================================================================
// Central Application State — StockPulse backend
// =============================================================================
//
// Everything a request handler needs, tied together once at startup and
// shared as `Arc<AppState>`. All of it is read-only after construction —
// the ticker index never changes, the clients hold no per-request state —
// so no locking is involved.
// =============================================================================

use std::sync::Arc;

use crate::charts::ChartRenderer;
use crate::config::AppConfig;
use crate::market::MarketDataClient;
use crate::sentiment::SentimentAnalyzer;
use crate::tickers::TickerIndex;

/// Immutable per-process state shared across all request handlers.
pub struct AppState {
    pub config: AppConfig,
    pub tickers: TickerIndex,
    pub market: MarketDataClient,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
    /// Optional chart collaborator; when absent the response carries no
    /// chart paths.
    pub charts: Option<Arc<dyn ChartRenderer>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        tickers: TickerIndex,
        market: MarketDataClient,
        sentiment: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        Self {
            config,
            tickers,
            market,
            sentiment,
            charts: None,
        }
    }

    /// Attach a chart-rendering collaborator.
    pub fn with_chart_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.charts = Some(renderer);
        self
    }
}
