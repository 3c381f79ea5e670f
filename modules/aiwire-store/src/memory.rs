use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use aiwire_common::{
    AiwireError, NewNewsItem, NewOrgUpdate, NewPaper, NewsItem, OrgUpdate, Paper,
};

use crate::store::ContentStore;

/// In-memory content store for tests. Enforces the same URL uniqueness the
/// Postgres schema does: inserting a duplicate URL returns an error.
#[derive(Default)]
pub struct MemoryStore {
    papers: Mutex<HashMap<String, Paper>>,
    news: Mutex<HashMap<String, NewsItem>>,
    org_updates: Mutex<HashMap<String, OrgUpdate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_paper_by_url(&self, url: &str) -> Result<Option<Paper>> {
        Ok(self.papers.lock().unwrap().get(url).cloned())
    }

    async fn insert_paper(&self, draft: NewPaper) -> Result<Paper> {
        let mut papers = self.papers.lock().unwrap();
        if papers.contains_key(&draft.url) {
            return Err(AiwireError::Store(format!("duplicate url: {}", draft.url)).into());
        }
        let paper = Paper {
            id: Uuid::new_v4(),
            url: draft.url.clone(),
            title: draft.title,
            authors: draft.authors,
            abstract_text: draft.abstract_text,
            summary: draft.summary,
            pdf_url: draft.pdf_url,
            source: draft.source,
            category: draft.category,
            tags: draft.tags,
            published_at: draft.published_at,
            created_at: Utc::now(),
        };
        papers.insert(draft.url, paper.clone());
        Ok(paper)
    }

    async fn count_papers(&self) -> Result<u64> {
        Ok(self.papers.lock().unwrap().len() as u64)
    }

    async fn find_news_by_url(&self, url: &str) -> Result<Option<NewsItem>> {
        Ok(self.news.lock().unwrap().get(url).cloned())
    }

    async fn insert_news(&self, draft: NewNewsItem) -> Result<NewsItem> {
        let mut news = self.news.lock().unwrap();
        if news.contains_key(&draft.url) {
            return Err(AiwireError::Store(format!("duplicate url: {}", draft.url)).into());
        }
        let item = NewsItem {
            id: Uuid::new_v4(),
            url: draft.url.clone(),
            title: draft.title,
            content: draft.content,
            summary: draft.summary,
            cover_image: draft.cover_image,
            source: draft.source,
            category: draft.category,
            tags: draft.tags,
            published_at: draft.published_at,
            created_at: Utc::now(),
        };
        news.insert(draft.url, item.clone());
        Ok(item)
    }

    async fn count_news(&self) -> Result<u64> {
        Ok(self.news.lock().unwrap().len() as u64)
    }

    async fn find_org_update_by_url(&self, url: &str) -> Result<Option<OrgUpdate>> {
        Ok(self.org_updates.lock().unwrap().get(url).cloned())
    }

    async fn insert_org_update(&self, draft: NewOrgUpdate) -> Result<OrgUpdate> {
        let mut updates = self.org_updates.lock().unwrap();
        if updates.contains_key(&draft.url) {
            return Err(AiwireError::Store(format!("duplicate url: {}", draft.url)).into());
        }
        let update = OrgUpdate {
            id: Uuid::new_v4(),
            url: draft.url.clone(),
            name: draft.name,
            title: draft.title,
            content: draft.content,
            summary: draft.summary,
            logo: draft.logo,
            source: draft.source,
            category: draft.category,
            tags: draft.tags,
            published_at: draft.published_at,
            created_at: Utc::now(),
        };
        updates.insert(draft.url, update.clone());
        Ok(update)
    }

    async fn count_org_updates(&self) -> Result<u64> {
        Ok(self.org_updates.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use aiwire_common::PaperCategory;

    use super::*;

    fn paper(url: &str) -> NewPaper {
        NewPaper {
            url: url.to_string(),
            title: "A Paper".to_string(),
            authors: vec!["Author".to_string()],
            abstract_text: "Abstract".to_string(),
            summary: None,
            pdf_url: None,
            source: "arXiv".to_string(),
            category: PaperCategory::Ai,
            tags: vec![],
            published_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_url_insert_is_a_store_error() {
        let store = MemoryStore::new();
        store
            .insert_paper(paper("https://arxiv.org/abs/1"))
            .await
            .unwrap();

        let err = store
            .insert_paper(paper("https://arxiv.org/abs/1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AiwireError>(),
            Some(AiwireError::Store(_))
        ));
        assert_eq!(store.count_papers().await.unwrap(), 1);
    }
}
