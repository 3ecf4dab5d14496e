// =============================================================================
// Reddit sentiment client
// =============================================================================
//
// Searches Reddit's public JSON API for recent posts mentioning a symbol and
// scores each post with a fixed word-list polarity function. No credentials
// are required; Reddit only insists on a descriptive User-Agent.
// =============================================================================

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::sentiment::{Post, SentimentAnalyzer, SentimentReport};

const SEARCH_URL: &str = "https://www.reddit.com/search.json";
const USER_AGENT: &str = "stockpulse/1.0 (market sentiment dashboard)";

/// How many of the highest-upvoted posts the report carries.
const TOP_POSTS: usize = 5;

const POSITIVE: &[&str] = &[
    "buy", "bull", "bullish", "up", "gain", "gains", "moon", "calls", "long", "strong", "beat",
    "growth", "profit", "rally", "winner", "good", "great", "undervalued",
];

const NEGATIVE: &[&str] = &[
    "sell", "bear", "bearish", "down", "loss", "losses", "crash", "puts", "short", "weak", "miss",
    "drop", "dump", "bad", "terrible", "fraud", "overvalued", "bagholder",
];

// =============================================================================
// Listing payload (the subset we consume)
// =============================================================================

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Deserialize)]
struct Child {
    data: ChildData,
}

#[derive(Deserialize)]
struct ChildData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    permalink: String,
}

// =============================================================================
// Client
// =============================================================================

/// Default [`SentimentAnalyzer`] backed by Reddit search.
pub struct RedditSentimentClient {
    client: reqwest::Client,
    post_limit: u32,
}

impl RedditSentimentClient {
    pub fn new(post_limit: u32) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self { client, post_limit }
    }
}

#[async_trait]
impl SentimentAnalyzer for RedditSentimentClient {
    async fn analyze(&self, symbol: &str) -> Result<SentimentReport> {
        let limit = self.post_limit.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", symbol),
                ("sort", "relevance"),
                ("t", "week"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("reddit search request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("reddit search returned {status}");
        }

        let listing: Listing = response
            .json()
            .await
            .context("failed to parse reddit listing")?;

        let mut posts: Vec<Post> = listing
            .data
            .children
            .into_iter()
            .map(|child| {
                let data = child.data;
                let sentiment = score_text(&format!("{} {}", data.title, data.selftext));
                Post {
                    sentiment,
                    title: data.title,
                    body: data.selftext,
                    upvotes: data.score,
                    url: format!("https://www.reddit.com{}", data.permalink),
                }
            })
            .collect();

        let sentiment_scores: Vec<f64> = posts.iter().map(|p| p.sentiment).collect();
        let average_sentiment = if sentiment_scores.is_empty() {
            0.0
        } else {
            sentiment_scores.iter().sum::<f64>() / sentiment_scores.len() as f64
        };

        posts.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
        posts.truncate(TOP_POSTS);

        debug!(
            symbol,
            posts = sentiment_scores.len(),
            average_sentiment,
            "sentiment analysis complete"
        );

        Ok(SentimentReport {
            sentiment_scores,
            average_sentiment,
            top_posts: posts,
        })
    }
}

// =============================================================================
// Scoring
// =============================================================================

/// Word-list polarity score in [-1, 1]: (pos - neg) / (pos + neg), 0.0 when
/// the text contains no scored words.
fn score_text(text: &str) -> f64 {
    let mut pos = 0usize;
    let mut neg = 0usize;

    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        let word = word.to_lowercase();
        if POSITIVE.contains(&word.as_str()) {
            pos += 1;
        } else if NEGATIVE.contains(&word.as_str()) {
            neg += 1;
        }
    }

    if pos + neg == 0 {
        0.0
    } else {
        (pos as f64 - neg as f64) / (pos + neg) as f64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- score_text ------------------------------------------------------

    #[test]
    fn positive_text_scores_positive() {
        assert!((score_text("Bullish on this, time to buy") - 1.0).abs() < 1e-10);
    }

    #[test]
    fn negative_text_scores_negative() {
        assert!((score_text("total crash, sell everything") + 1.0).abs() < 1e-10);
    }

    #[test]
    fn mixed_text_scores_between() {
        // One positive (buy) and one negative (sell) word.
        assert!(score_text("buy or sell?").abs() < 1e-10);
    }

    #[test]
    fn neutral_text_scores_zero() {
        assert!(score_text("earnings call is on Thursday").abs() < 1e-10);
        assert!(score_text("").abs() < 1e-10);
    }

    #[test]
    fn scoring_is_case_insensitive() {
        assert_eq!(score_text("BUY BUY BUY"), score_text("buy buy buy"));
    }

    // ---- listing parsing -------------------------------------------------

    #[test]
    fn parses_listing_payload() {
        let json = r#"{
            "data": {
                "children": [
                    {"data": {"title": "AAPL to the moon", "selftext": "buy buy", "score": 42, "permalink": "/r/stocks/1"}},
                    {"data": {"title": "meh", "score": 3, "permalink": "/r/stocks/2"}}
                ]
            }
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.children.len(), 2);
        assert_eq!(listing.data.children[0].data.score, 42);
        // Missing selftext defaults to empty.
        assert_eq!(listing.data.children[1].data.selftext, "");
    }

    #[test]
    fn parses_empty_listing() {
        let listing: Listing = serde_json::from_str(r#"{"data": {"children": []}}"#).unwrap();
        assert!(listing.data.children.is_empty());
    }
}
