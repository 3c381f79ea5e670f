//! Academic-index fetcher for arXiv.
//!
//! Two modes: latest-N (single request) and windowed backfill (fixed-size
//! pages walked until the cutoff is crossed, a page comes back empty, or the
//! page ceiling is hit). A request failure yields an empty page, which the
//! backfill loop cannot tell apart from natural exhaustion — both terminate
//! the walk. No retries.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use aiwire_common::{AiwireError, NewPaper, PaperCategory};

use crate::traits::{IndexEntry, PaperIndex};

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv subject categories the index query is filtered to.
pub const ARXIV_CATEGORIES: &[&str] = &[
    "cs.AI", // artificial intelligence
    "cs.CL", // computation and language
    "cs.CV", // computer vision
    "cs.LG", // machine learning
    "cs.RO", // robotics
    "cs.IR", // information retrieval
    "cs.HC", // human-computer interaction
    "cs.MA", // multi-agent systems
    "cs.NE", // neural and evolutionary computing
];

/// Ordered precedence table mapping arXiv subject tags to an internal
/// category. First matching row wins; unmatched papers fall back to `AI`.
const CATEGORY_PRECEDENCE: &[(PaperCategory, &[&str])] = &[
    (PaperCategory::Cv, &["cs.CV", "cs.GR"]),
    (PaperCategory::Nlp, &["cs.CL", "cs.FL"]),
    (PaperCategory::Robotics, &["cs.RO"]),
    (PaperCategory::Ml, &["cs.LG", "stat.ML"]),
    (PaperCategory::Ai, &["cs.AI"]),
    (PaperCategory::Ir, &["cs.IR"]),
];

/// Resolve a paper's internal category from its arXiv subject tags.
pub fn map_arxiv_categories(tags: &[String]) -> PaperCategory {
    for (category, terms) in CATEGORY_PRECEDENCE {
        if terms.iter().any(|t| tags.iter().any(|tag| tag == t)) {
            return *category;
        }
    }
    PaperCategory::default()
}

/// Delay between backfill page requests.
const PAGE_DELAY: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// ArxivClient — real PaperIndex over the arXiv Atom API
// ---------------------------------------------------------------------------

pub struct ArxivClient {
    client: reqwest::Client,
}

impl ArxivClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build arXiv HTTP client");
        Self { client }
    }
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperIndex for ArxivClient {
    async fn query(&self, start: usize, max_results: usize) -> Result<Vec<IndexEntry>> {
        let search_query = ARXIV_CATEGORIES
            .iter()
            .map(|c| format!("cat:{c}"))
            .collect::<Vec<_>>()
            .join(" OR ");

        let resp = self
            .client
            .get(ARXIV_API_URL)
            .query(&[
                ("search_query", search_query.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
                ("start", &start.to_string()),
                ("max_results", &max_results.to_string()),
            ])
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| AiwireError::Fetch(format!("arXiv query failed: {e}")))?;

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AiwireError::Fetch(format!("Failed to read arXiv response: {e}")))?;
        parse_atom(&bytes)
    }
}

/// Parse an arXiv Atom response into index entries.
fn parse_atom(bytes: &[u8]) -> Result<Vec<IndexEntry>> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| AiwireError::FeedParse(format!("Invalid arXiv Atom response: {e}")))?;

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let id = bare_id(&entry.id)?;

            let pdf_url = entry
                .links
                .iter()
                .find(|l| l.title.as_deref() == Some("pdf"))
                .map(|l| l.href.clone())
                .unwrap_or_else(|| format!("https://arxiv.org/pdf/{id}.pdf"));

            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            Some(IndexEntry {
                url: format!("https://arxiv.org/abs/{id}"),
                title: entry
                    .title
                    .map(|t| collapse_whitespace(&t.content))
                    .unwrap_or_default(),
                authors: entry.authors.into_iter().map(|a| a.name).collect(),
                abstract_text: entry
                    .summary
                    .map(|s| s.content.trim().to_string())
                    .unwrap_or_default(),
                pdf_url,
                published_at,
                categories: entry.categories.into_iter().map(|c| c.term).collect(),
                id,
            })
        })
        .collect();

    Ok(entries)
}

/// Extract the bare identifier from an entry id like
/// `http://arxiv.org/abs/2408.01234v2` → `2408.01234`.
fn bare_id(entry_id: &str) -> Option<String> {
    let tail = entry_id.rsplit("/abs/").next()?;
    if tail.is_empty() {
        return None;
    }
    // Strip a trailing version suffix (vN).
    match tail.rsplit_once('v') {
        Some((head, version))
            if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) =>
        {
            Some(head.to_string())
        }
        _ => Some(tail.to_string()),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// PaperFetcher — latest / backfill modes over a PaperIndex
// ---------------------------------------------------------------------------

pub struct PaperFetcher {
    index: Arc<dyn PaperIndex>,
    latest_n: usize,
    page_size: usize,
    max_pages: usize,
    window_days: i64,
}

impl PaperFetcher {
    pub fn new(
        index: Arc<dyn PaperIndex>,
        latest_n: usize,
        page_size: usize,
        max_pages: usize,
        window_days: i64,
    ) -> Self {
        Self {
            index,
            latest_n,
            page_size,
            max_pages,
            window_days,
        }
    }

    /// Single request for the newest N papers.
    pub async fn latest(&self) -> Vec<NewPaper> {
        let page = self.page(0, self.latest_n).await;
        info!(papers = page.len(), "Fetched latest papers");
        page.into_iter().map(to_new_paper).collect()
    }

    /// Walk pages from offset 0 until the cutoff is crossed, a page is empty,
    /// or the page ceiling is reached.
    pub async fn backfill(&self) -> Vec<NewPaper> {
        let cutoff = Utc::now() - chrono::Duration::days(self.window_days);
        let mut papers: Vec<NewPaper> = Vec::new();

        for page_idx in 0..self.max_pages {
            if page_idx > 0 {
                tokio::time::sleep(PAGE_DELAY).await;
            }

            let page = self.page(page_idx * self.page_size, self.page_size).await;
            if page.is_empty() {
                break;
            }

            let crossed_cutoff = page.iter().any(|e| e.published_at < cutoff);
            papers.extend(
                page.into_iter()
                    .filter(|e| e.published_at >= cutoff)
                    .map(to_new_paper),
            );

            if crossed_cutoff {
                break;
            }
        }

        info!(papers = papers.len(), cutoff = %cutoff, "Backfill complete");
        papers
    }

    /// One index request. Failures are logged and yield an empty page —
    /// indistinguishable from natural exhaustion by design.
    async fn page(&self, start: usize, max_results: usize) -> Vec<IndexEntry> {
        match self.index.query(start, max_results).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(start, max_results, error = %e, "Index request failed, treating as empty page");
                Vec::new()
            }
        }
    }
}

fn to_new_paper(entry: IndexEntry) -> NewPaper {
    let category = map_arxiv_categories(&entry.categories);
    NewPaper {
        url: entry.url,
        title: entry.title,
        authors: entry.authors,
        abstract_text: entry.abstract_text,
        summary: None,
        pdf_url: Some(entry.pdf_url),
        source: "arXiv".to_string(),
        category,
        tags: entry.categories,
        published_at: entry.published_at,
    }
}
