// =============================================================================
// Market Data Client — bounded retry around a quote source
// =============================================================================
//
// One fetch = up to `max_retries` attempts against the quote source, with a
// constant async delay before every attempt except the first. An attempt
// needs only a current price to succeed; the 1-year history and the
// supplementary metadata query each sit behind their own recoverable
// boundary and degrade the affected fields instead of failing the attempt.
//
// The client holds no mutable state, so one instance serves all requests
// concurrently. The retry delay is a `tokio::time::sleep`, which parks only
// the calling task.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::market::format::{format_magnitude, format_percent, format_ratio, round2};
use crate::market::MarketError;

// =============================================================================
// Source-side types
// =============================================================================

/// One bar of price history, ascending by timestamp within a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// UNIX timestamp (seconds) of the bar.
    pub timestamp: i64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
}

/// Supplementary metadata from the secondary query. Every field is optional;
/// a missing field degrades to a sentinel in the snapshot.
#[derive(Debug, Clone, Default)]
pub struct SymbolSummary {
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    /// Dividend yield in percent units (1.23 means 1.23 %).
    pub dividend_yield: Option<f64>,
}

/// Provider abstraction for one symbol's market data.
///
/// The three queries are independent: only `recent_history` is required for
/// a successful fetch.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short-range (1-day) history. The most recent close becomes the
    /// current price.
    async fn recent_history(&self, symbol: &str) -> Result<Vec<Candle>, MarketError>;

    /// Long-range (1-year) history for the 52-week stats and latest volume.
    async fn year_history(&self, symbol: &str) -> Result<Vec<Candle>, MarketError>;

    /// Supplementary metadata (currency, market cap, P/E, dividend yield).
    async fn summary(&self, symbol: &str) -> Result<SymbolSummary, MarketError>;
}

// =============================================================================
// Snapshot & result types
// =============================================================================

/// Normalized result of a successful fetch for one symbol.
///
/// `current_price` is always present; every other field degrades
/// independently to `null` or its sentinel.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    /// Echoed input symbol.
    pub name: String,
    /// Most recent close, rounded to two decimals.
    pub current_price: f64,
    pub currency: String,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    /// Human-formatted magnitude, e.g. "41.20M".
    pub volume: Option<String>,
    /// Human-formatted magnitude, e.g. "2.80T".
    pub market_cap: Option<String>,
    /// Two decimals or "N/A".
    pub pe_ratio: String,
    /// Two decimals plus "%" or "N/A%".
    pub dividend_yield: String,
}

/// Outcome of a fetch: a snapshot or a terminal failure message. Never both.
#[derive(Debug, Clone)]
pub enum FetchResult {
    Success(MarketSnapshot),
    Failure(String),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

// Wire shape: `{"success": true, "data": ...}` on success,
// `{"success": false, "error": ...}` on failure.
impl Serialize for FetchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(data) => {
                let mut s = serializer.serialize_struct("FetchResult", 2)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
                s.end()
            }
            Self::Failure(error) => {
                let mut s = serializer.serialize_struct("FetchResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

// =============================================================================
// Retry policy
// =============================================================================

/// Bounded-retry parameters for the fetch loop. Constant backoff, not
/// exponential.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Fetches and normalizes market data for one symbol at a time.
pub struct MarketDataClient {
    source: Arc<dyn QuoteSource>,
    policy: RetryPolicy,
}

impl MarketDataClient {
    pub fn new(source: Arc<dyn QuoteSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch a snapshot for `symbol`, retrying up to the policy cap.
    ///
    /// The first attempt that produces a current price returns immediately;
    /// remaining retries are not spent. Each retry is preceded by the
    /// constant delay — never the first attempt, so the worst case performs
    /// exactly `max_retries - 1` sleeps.
    pub async fn fetch(&self, symbol: &str) -> FetchResult {
        let mut last_error = String::new();

        for attempt in 1..=self.policy.max_retries {
            if attempt > 1 {
                tokio::time::sleep(self.policy.retry_delay).await;
            }

            match self.attempt(symbol).await {
                Ok(snapshot) => {
                    debug!(symbol, attempt, "market data fetch succeeded");
                    return FetchResult::Success(snapshot);
                }
                Err(e) => {
                    warn!(symbol, attempt, error = %e, "market data fetch attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        FetchResult::Failure(format!(
            "Failed to fetch stock data for {symbol} after {} attempts: {last_error}",
            self.policy.max_retries
        ))
    }

    /// Raw 1-year history passthrough for the chart collaborator.
    pub async fn price_history(&self, symbol: &str) -> Result<Vec<Candle>, MarketError> {
        self.source.year_history(symbol).await
    }

    /// One fetch cycle. Fails only when no current price can be produced;
    /// the long-range history and the metadata query degrade on their own.
    async fn attempt(&self, symbol: &str) -> Result<MarketSnapshot, MarketError> {
        let recent = self.source.recent_history(symbol).await?;
        let last = recent
            .last()
            .ok_or_else(|| MarketError::EmptyHistory(symbol.to_string()))?;
        let current_price = round2(last.close);

        let (high, low, volume) = match self.source.year_history(symbol).await {
            Ok(candles) if !candles.is_empty() => {
                let high = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
                let low = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
                let volume = candles.last().map(|c| c.volume as f64);
                (Some(round2(high)), Some(round2(low)), volume)
            }
            Ok(_) => {
                debug!(symbol, "year history empty, 52-week stats unavailable");
                (None, None, None)
            }
            Err(e) => {
                warn!(symbol, error = %e, "year history fetch failed, 52-week stats unavailable");
                (None, None, None)
            }
        };

        let summary = match self.source.summary(symbol).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(symbol, error = %e, "summary fetch failed, metadata unavailable");
                SymbolSummary::default()
            }
        };

        Ok(MarketSnapshot {
            name: symbol.to_string(),
            current_price,
            currency: summary.currency.unwrap_or_else(|| "USD".to_string()),
            fifty_two_week_high: high,
            fifty_two_week_low: low,
            volume: format_magnitude(volume),
            market_cap: format_magnitude(summary.market_cap),
            pe_ratio: format_ratio(summary.pe_ratio),
            dividend_yield: format_percent(summary.dividend_yield),
        })
    }
}
