// Trait abstractions for the engine's upstream dependencies.
//
// PaperIndex — one page of academic-index results (arXiv in production).
// FeedFetcher — fetch and parse one syndication feed.
//
// These enable deterministic testing with stub implementations: no network,
// no database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One entry returned by the academic index, already normalized from the
/// wire format but not yet classified.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Bare identifier, e.g. "2408.01234" (version suffix stripped).
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    /// Canonical abstract-page URL — the dedup key.
    pub url: String,
    /// Downloadable-document link, resolved or synthesized from the id.
    pub pdf_url: String,
    pub published_at: DateTime<Utc>,
    /// Upstream topical tags, e.g. ["cs.AI", "cs.LG"].
    pub categories: Vec<String>,
}

/// Paginated academic index, sorted by submission date descending.
#[async_trait]
pub trait PaperIndex: Send + Sync {
    /// Fetch one page of results starting at `start`, at most `max_results`
    /// entries. Newest first.
    async fn query(&self, start: usize, max_results: usize) -> Result<Vec<IndexEntry>>;
}

/// One parsed entry from a syndication feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    /// Canonical link — the dedup key.
    pub url: String,
    /// Short snippet / description text.
    pub snippet: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Fetches and parses one RSS/Atom feed.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<FeedEntry>>;
}
