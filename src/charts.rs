// =============================================================================
// Chart rendering collaborator contract
// =============================================================================
//
// Rendering happens outside the core: an implementation receives the data,
// produces an artifact somewhere, and hands back a storage path. The core
// never inspects the artifact — it only forwards the path to the client.
// No renderer ships with the service; one is injected on [`crate::app_state::AppState`]
// when a deployment wants charts in the response.
// =============================================================================

use std::path::PathBuf;

use crate::market::Candle;

/// Contract between the orchestrator and a chart-rendering collaborator.
pub trait ChartRenderer: Send + Sync {
    /// Render a price chart from the 1-year history (ordered by date).
    fn render_price_chart(&self, symbol: &str, history: &[Candle]) -> anyhow::Result<PathBuf>;

    /// Render the distribution of per-post sentiment scores.
    fn render_sentiment_distribution(
        &self,
        symbol: &str,
        scores: &[f64],
        average: f64,
    ) -> anyhow::Result<PathBuf>;
}
