use anyhow::Result;
use async_trait::async_trait;

use aiwire_common::{NewNewsItem, NewOrgUpdate, NewPaper, NewsItem, OrgUpdate, Paper};

/// Storage collaborator for the sync engine.
///
/// The engine only ever looks up by canonical URL, inserts, and counts —
/// stored records are never updated or deleted by a sync run. Implementations
/// must support concurrent inserts across kinds (the three content-kind
/// pipelines run in parallel against independent tables).
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find_paper_by_url(&self, url: &str) -> Result<Option<Paper>>;
    async fn insert_paper(&self, draft: NewPaper) -> Result<Paper>;
    async fn count_papers(&self) -> Result<u64>;

    async fn find_news_by_url(&self, url: &str) -> Result<Option<NewsItem>>;
    async fn insert_news(&self, draft: NewNewsItem) -> Result<NewsItem>;
    async fn count_news(&self) -> Result<u64>;

    async fn find_org_update_by_url(&self, url: &str) -> Result<Option<OrgUpdate>>;
    async fn insert_org_update(&self, draft: NewOrgUpdate) -> Result<OrgUpdate>;
    async fn count_org_updates(&self) -> Result<u64>;
}
