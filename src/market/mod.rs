pub mod client;
pub mod format;
pub mod yahoo;

// Re-export the client types for convenient access (e.g. `use crate::market::MarketSnapshot`).
pub use client::{
    Candle, FetchResult, MarketDataClient, MarketSnapshot, QuoteSource, RetryPolicy, SymbolSummary,
};
pub use yahoo::YahooSource;

use thiserror::Error;

/// Errors surfaced by a quote source during a single fetch cycle.
///
/// Every variant is recoverable at the retry layer: an empty short-range
/// history fails the attempt (and is retried), while failures of the
/// long-range history or the supplementary metadata query only degrade the
/// affected snapshot fields.
#[derive(Debug, Error)]
pub enum MarketError {
    /// No price history returned for the symbol.
    #[error("no price history for {0}")]
    EmptyHistory(String),

    /// The upstream provider rejected or failed the request.
    #[error("provider error: {0}")]
    Provider(String),
}
