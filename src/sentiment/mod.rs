pub mod reddit;

pub use reddit::RedditSentimentClient;

use async_trait::async_trait;
use serde::Serialize;

/// A single social post surfaced in the analysis response.
///
/// `title` and `body` are raw provider text; the orchestrator sanitizes them
/// before the response is built.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub upvotes: i64,
    pub url: String,
    /// Polarity score in [-1, 1] for this post.
    pub sentiment: f64,
}

/// Aggregate sentiment for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    /// One score per analyzed post, in retrieval order.
    pub sentiment_scores: Vec<f64>,
    /// Mean of `sentiment_scores`, 0.0 when no posts were found.
    pub average_sentiment: f64,
    /// Highest-upvoted posts, at most five.
    pub top_posts: Vec<Post>,
}

/// Sentiment collaborator boundary. Implementations own where the posts come
/// from and how they are scored; callers only rely on the report shape.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, symbol: &str) -> anyhow::Result<SentimentReport>;
}
