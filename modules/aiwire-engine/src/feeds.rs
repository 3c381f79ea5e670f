//! Multi-feed ingester.
//!
//! Walks the fixed feed roster sequentially, filters entries by recency,
//! classifies them, and produces two streams from the same roster: news
//! candidates and organization-update candidates. One source failing to
//! fetch or parse never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use aiwire_common::{AiwireError, NewNewsItem, NewOrgUpdate};

use crate::classify::classify;
use crate::sources::{find_organization, FeedSource, FEED_SOURCES};
use crate::traits::{FeedEntry, FeedFetcher};

/// Pacing delay between source requests. At most one request is in flight at
/// a time by construction; this only bounds the request rate.
const SOURCE_DELAY: Duration = Duration::from_millis(500);

const SUMMARY_MAX_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// HttpFeedFetcher — real FeedFetcher over reqwest + feed-rs
// ---------------------------------------------------------------------------

pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build feed HTTP client");
        Self { client }
    }
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<FeedEntry>> {
        let resp = self
            .client
            .get(feed_url)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .send()
            .await
            .map_err(|e| AiwireError::Fetch(format!("Feed fetch failed: {e}")))?;

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AiwireError::Fetch(format!("Failed to read feed body: {e}")))?;
        let feed = feed_rs::parser::parse(&bytes[..])
            .map_err(|e| AiwireError::FeedParse(format!("Invalid RSS/Atom feed: {e}")))?;

        let entries = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let url = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

                let title = entry.title.map(|t| t.content).unwrap_or_default();
                if title.is_empty() {
                    return None;
                }

                Some(FeedEntry {
                    title,
                    url,
                    snippet: entry
                        .summary
                        .map(|s| s.content.trim().to_string())
                        .unwrap_or_default(),
                    published_at: entry
                        .published
                        .or(entry.updated)
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })
            .collect();

        Ok(entries)
    }
}

// ---------------------------------------------------------------------------
// FeedIngester — news and organization-update streams
// ---------------------------------------------------------------------------

pub struct FeedIngester {
    fetcher: Arc<dyn FeedFetcher>,
}

impl FeedIngester {
    pub fn new(fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch one source's entries, already filtered to the recency window.
    /// Failures are logged and yield an empty list.
    async fn source_entries(&self, source: &FeedSource, window_days: i64) -> Vec<FeedEntry> {
        let cutoff = Utc::now() - chrono::Duration::days(window_days);

        let entries = match self.fetcher.fetch(source.url).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(source = source.name, error = %e, "Failed to fetch feed");
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter(|e| e.published_at.unwrap_or_else(Utc::now) >= cutoff)
            .collect()
    }

    /// News candidates: every entry inside the window, classified.
    pub async fn fetch_news(&self, window_days: i64) -> Vec<NewNewsItem> {
        let mut items: Vec<NewNewsItem> = Vec::new();

        for (i, source) in FEED_SOURCES.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(SOURCE_DELAY).await;
            }

            for entry in self.source_entries(source, window_days).await {
                let classification = classify(&entry.title, &entry.snippet);
                let published_at = entry.published_at.unwrap_or_else(Utc::now);

                let content = if entry.snippet.is_empty() {
                    entry.title.clone()
                } else {
                    entry.snippet.clone()
                };

                items.push(NewNewsItem {
                    url: entry.url,
                    title: entry.title,
                    summary: Some(truncate_chars(&content, SUMMARY_MAX_CHARS)),
                    content,
                    cover_image: None,
                    source: source.source.to_string(),
                    category: classification.category,
                    tags: classification.tags,
                    published_at,
                });
            }
        }

        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        info!(items = items.len(), "Feed news ingest complete");
        items
    }

    /// Organization-update candidates: entries mentioning a roster
    /// organization whose category is organization-relevant (product,
    /// funding, acquisition, partnership, hiring).
    pub async fn fetch_org_updates(&self, window_days: i64) -> Vec<NewOrgUpdate> {
        let mut updates: Vec<NewOrgUpdate> = Vec::new();

        for (i, source) in FEED_SOURCES.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(SOURCE_DELAY).await;
            }

            for entry in self.source_entries(source, window_days).await {
                let text = format!("{} {}", entry.title, entry.snippet);
                let Some(org) = find_organization(&text) else {
                    continue;
                };

                let classification = classify(&entry.title, &entry.snippet);
                if !classification.category.is_org_update() {
                    continue;
                }

                let published_at = entry.published_at.unwrap_or_else(Utc::now);
                let content = if entry.snippet.is_empty() {
                    entry.title.clone()
                } else {
                    entry.snippet.clone()
                };

                let mut tags = classification.tags;
                tags.push(org.to_string());

                updates.push(NewOrgUpdate {
                    url: entry.url,
                    name: org.to_string(),
                    title: entry.title,
                    summary: Some(truncate_chars(&content, SUMMARY_MAX_CHARS)),
                    content,
                    logo: None,
                    source: source.source.to_string(),
                    category: classification.category,
                    tags,
                    published_at,
                });
            }
        }

        updates.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        info!(updates = updates.len(), "Feed org-update ingest complete");
        updates
    }
}

/// Character-boundary-safe prefix (feed snippets are frequently CJK text).
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use anyhow::bail;
    use chrono::Duration;

    use aiwire_common::NewsCategory;

    use super::*;

    /// Stub fetcher: canned entries per feed URL; unknown URLs fail.
    struct StubFetcher {
        feeds: HashMap<String, Vec<FeedEntry>>,
    }

    #[async_trait]
    impl FeedFetcher for StubFetcher {
        async fn fetch(&self, feed_url: &str) -> Result<Vec<FeedEntry>> {
            match self.feeds.get(feed_url) {
                Some(entries) => Ok(entries.clone()),
                None => bail!("connection refused"),
            }
        }
    }

    fn entry(title: &str, url: &str, snippet: &str, age_days: i64) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
            published_at: Some(Utc::now() - Duration::days(age_days)),
        }
    }

    fn ingester_with(feeds: Vec<(&str, Vec<FeedEntry>)>) -> FeedIngester {
        let feeds = feeds
            .into_iter()
            .map(|(url, entries)| (url.to_string(), entries))
            .collect();
        FeedIngester::new(Arc::new(StubFetcher { feeds }))
    }

    /// All three roster URLs mapped to the given entry lists, in order.
    fn roster_feeds(
        first: Vec<FeedEntry>,
        second: Vec<FeedEntry>,
        third: Vec<FeedEntry>,
    ) -> Vec<(&'static str, Vec<FeedEntry>)> {
        vec![
            (FEED_SOURCES[0].url, first),
            (FEED_SOURCES[1].url, second),
            (FEED_SOURCES[2].url, third),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn recency_window_drops_old_entries() {
        let ingester = ingester_with(roster_feeds(
            vec![
                entry("Fresh model news", "https://a.test/1", "new model", 1),
                entry("Stale model news", "https://a.test/2", "old model", 45),
            ],
            vec![],
            vec![],
        ));

        let items = ingester.fetch_news(30).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://a.test/1");
    }

    #[tokio::test(start_paused = true)]
    async fn missing_publish_date_defaults_to_now_and_survives_window() {
        let mut e = entry("Undated launch", "https://a.test/1", "launch", 0);
        e.published_at = None;
        let ingester = ingester_with(roster_feeds(vec![e], vec![], vec![]));

        let items = ingester.fetch_news(30).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, NewsCategory::Product);
    }

    #[tokio::test(start_paused = true)]
    async fn one_failing_source_does_not_abort_the_batch() {
        // Only the second roster source resolves; the other two fail.
        let ingester = ingester_with(vec![(
            FEED_SOURCES[1].url,
            vec![entry("Funding round raised", "https://b.test/1", "", 1)],
        )]);

        let items = ingester.fetch_news(30).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, FEED_SOURCES[1].source);
    }

    #[tokio::test(start_paused = true)]
    async fn news_sorted_newest_first() {
        let ingester = ingester_with(roster_feeds(
            vec![entry("Older", "https://a.test/old", "model", 5)],
            vec![entry("Newer", "https://b.test/new", "model", 1)],
            vec![],
        ));

        let items = ingester.fetch_news(30).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Newer");
        assert_eq!(items[1].title, "Older");
    }

    #[tokio::test(start_paused = true)]
    async fn summary_truncated_on_char_boundary() {
        let long_snippet = "深".repeat(300) + " model";
        let ingester = ingester_with(roster_feeds(
            vec![entry("Long one", "https://a.test/1", &long_snippet, 1)],
            vec![],
            vec![],
        ));

        let items = ingester.fetch_news(30).await;
        let summary = items[0].summary.as_deref().unwrap();
        assert_eq!(summary.chars().count(), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn org_update_requires_roster_name() {
        // Funding-themed but no recognizable organization.
        let ingester = ingester_with(roster_feeds(
            vec![entry(
                "Acme raises $50M Series B",
                "https://a.test/acme",
                "funding round",
                1,
            )],
            vec![],
            vec![],
        ));

        let updates = ingester.fetch_org_updates(30).await;
        assert!(updates.is_empty());

        // Same entry still surfaces as a news candidate.
        let news = ingester.fetch_news(30).await;
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].category, NewsCategory::Funding);
    }

    #[tokio::test(start_paused = true)]
    async fn org_update_requires_relevant_category() {
        // Mentions OpenAI but the text classifies as POLICY.
        let ingester = ingester_with(roster_feeds(
            vec![entry(
                "OpenAI faces new regulation",
                "https://a.test/policy",
                "the ai act and policy changes",
                1,
            )],
            vec![],
            vec![],
        ));

        let updates = ingester.fetch_org_updates(30).await;
        assert!(updates.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn org_update_emitted_with_name_appended_to_tags() {
        let ingester = ingester_with(roster_feeds(
            vec![entry(
                "Anthropic raises new funding",
                "https://a.test/anthropic",
                "series round",
                1,
            )],
            vec![],
            vec![],
        ));

        let updates = ingester.fetch_org_updates(30).await;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].name, "Anthropic");
        assert_eq!(updates[0].category, NewsCategory::Funding);
        assert_eq!(updates[0].tags.last().map(String::as_str), Some("Anthropic"));
    }
}
