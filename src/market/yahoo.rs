// =============================================================================
// Yahoo Finance quote source
// =============================================================================
//
// Price histories come from the chart API via the `yahoo_finance_api`
// connector; the supplementary metadata (currency, market cap, P/E, dividend
// yield) comes from the quoteSummary endpoint over plain reqwest. The
// summary call is the fetch pipeline's silent-failure leg, so it carries no
// auth/crumb plumbing — a rejected request just degrades those fields.
// =============================================================================

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::market::client::{Candle, QuoteSource, SymbolSummary};
use crate::market::MarketError;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Quote source backed by the public Yahoo Finance APIs.
pub struct YahooSource {
    connector: yahoo::YahooConnector,
    http: reqwest::Client,
}

impl YahooSource {
    pub fn new() -> Result<Self, MarketError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketError::Provider(format!("failed to initialise Yahoo connector: {e}"))
        })?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        Ok(Self { connector, http })
    }

    fn to_candles(quotes: Vec<yahoo::Quote>) -> Vec<Candle> {
        quotes
            .into_iter()
            .map(|q| Candle {
                timestamp: q.timestamp as i64,
                close: q.close,
                high: q.high,
                low: q.low,
                volume: q.volume,
            })
            .collect()
    }
}

#[async_trait]
impl QuoteSource for YahooSource {
    async fn recent_history(&self, symbol: &str) -> Result<Vec<Candle>, MarketError> {
        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        Ok(Self::to_candles(quotes))
    }

    async fn year_history(&self, symbol: &str) -> Result<Vec<Candle>, MarketError> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(365);

        // The connector speaks `time`, the rest of the crate speaks `chrono`.
        let start = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| MarketError::Provider(format!("invalid start timestamp: {e}")))?;
        let end = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| MarketError::Provider(format!("invalid end timestamp: {e}")))?;

        let response = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        Ok(Self::to_candles(quotes))
    }

    async fn summary(&self, symbol: &str) -> Result<SymbolSummary, MarketError> {
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}?modules=price,summaryDetail");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketError::Provider(format!("quoteSummary request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Provider(format!(
                "quoteSummary returned {status} for {symbol}"
            )));
        }

        let body: QuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketError::Provider(format!("failed to parse quoteSummary response: {e}"))
        })?;

        let result = body
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                MarketError::Provider(format!("quoteSummary returned no result for {symbol}"))
            })?;

        Ok(result.into_summary())
    }
}

// =============================================================================
// quoteSummary response models
// =============================================================================
// Yahoo wraps every numeric in `{"raw": 123.45, "fmt": "123.45"}` and sends
// an empty object when a metric is unavailable, so every leaf is optional.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Deserialize)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetailModule>,
}

impl QuoteSummaryResult {
    fn into_summary(self) -> SymbolSummary {
        let detail = self.summary_detail;
        SymbolSummary {
            currency: self.price.as_ref().and_then(|p| p.currency.clone()),
            market_cap: self
                .price
                .as_ref()
                .and_then(|p| p.market_cap.as_ref())
                .and_then(|v| v.raw)
                .or_else(|| {
                    detail
                        .as_ref()
                        .and_then(|d| d.market_cap.as_ref())
                        .and_then(|v| v.raw)
                }),
            pe_ratio: detail
                .as_ref()
                .and_then(|d| d.trailing_pe.as_ref())
                .and_then(|v| v.raw),
            // Yahoo reports the yield as a fraction (0.005 => 0.50 %).
            dividend_yield: detail
                .as_ref()
                .and_then(|d| d.dividend_yield.as_ref())
                .and_then(|v| v.raw)
                .map(|fraction| fraction * 100.0),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    currency: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    dividend_yield: Option<RawValue>,
}

#[derive(Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quote_summary_payload() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "currency": "USD",
                        "marketCap": {"raw": 2800000000000, "fmt": "2.8T"}
                    },
                    "summaryDetail": {
                        "trailingPE": {"raw": 28.5, "fmt": "28.50"},
                        "dividendYield": {"raw": 0.005, "fmt": "0.50%"}
                    }
                }],
                "error": null
            }
        }"#;

        let parsed: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let summary = parsed
            .quote_summary
            .result
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
            .into_summary();

        assert_eq!(summary.currency.as_deref(), Some("USD"));
        assert_eq!(summary.market_cap, Some(2.8e12));
        assert_eq!(summary.pe_ratio, Some(28.5));
        assert!((summary.dividend_yield.unwrap() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn parses_empty_metric_objects() {
        // Unavailable metrics arrive as empty objects, not nulls.
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"currency": "USD", "marketCap": {}},
                    "summaryDetail": {"trailingPE": {}, "dividendYield": {}}
                }]
            }
        }"#;

        let parsed: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let summary = parsed
            .quote_summary
            .result
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
            .into_summary();

        assert_eq!(summary.currency.as_deref(), Some("USD"));
        assert_eq!(summary.market_cap, None);
        assert_eq!(summary.pe_ratio, None);
        assert_eq!(summary.dividend_yield, None);
    }

    #[test]
    fn parses_null_result_list() {
        let json = r#"{"quoteSummary": {"result": null}}"#;
        let parsed: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.quote_summary.result.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn fetches_recent_history() {
        let source = YahooSource::new().unwrap();
        let candles = source.recent_history("AAPL").await.unwrap();
        assert!(!candles.is_empty());
        assert!(candles.last().unwrap().close > 0.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn fetches_year_history() {
        let source = YahooSource::new().unwrap();
        let candles = source.year_history("AAPL").await.unwrap();
        assert!(candles.len() > 100);
    }
}
