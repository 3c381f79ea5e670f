use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use aiwire_common::{NewNewsItem, NewOrgUpdate, NewPaper, NewsItem, OrgUpdate, Paper};

use crate::store::ContentStore;

/// Create the content tables if they do not exist. Idempotent; run at startup.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS papers (
            id UUID PRIMARY KEY,
            url TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            authors JSONB NOT NULL DEFAULT '[]',
            abstract_text TEXT NOT NULL DEFAULT '',
            summary TEXT,
            pdf_url TEXT,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            tags JSONB NOT NULL DEFAULT '[]',
            published_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create papers table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS news (
            id UUID PRIMARY KEY,
            url TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            summary TEXT,
            cover_image TEXT,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            tags JSONB NOT NULL DEFAULT '[]',
            published_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create news table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS org_updates (
            id UUID PRIMARY KEY,
            url TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            summary TEXT,
            logo TEXT,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            tags JSONB NOT NULL DEFAULT '[]',
            published_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create org_updates table")?;

    Ok(())
}

/// Postgres-backed content store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn string_vec(value: serde_json::Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_paper_by_url(&self, url: &str) -> Result<Option<Paper>> {
        let row = sqlx::query(
            r#"
            SELECT id, url, title, authors, abstract_text, summary, pdf_url,
                   source, category, tags, published_at, created_at
            FROM papers
            WHERE url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up paper by url")?;

        Ok(row.map(|r| Paper {
            id: r.get("id"),
            url: r.get("url"),
            title: r.get("title"),
            authors: string_vec(r.get("authors")),
            abstract_text: r.get("abstract_text"),
            summary: r.get("summary"),
            pdf_url: r.get("pdf_url"),
            source: r.get("source"),
            category: r.get::<String, _>("category").parse().unwrap_or_default(),
            tags: string_vec(r.get("tags")),
            published_at: r.get("published_at"),
            created_at: r.get("created_at"),
        }))
    }

    async fn insert_paper(&self, draft: NewPaper) -> Result<Paper> {
        let paper = Paper {
            id: Uuid::new_v4(),
            url: draft.url,
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

        sqlx::query(
            r#"
            INSERT INTO papers (
                id, url, title, authors, abstract_text, summary, pdf_url,
                source, category, tags, published_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(paper.id)
        .bind(&paper.url)
        .bind(&paper.title)
        .bind(serde_json::to_value(&paper.authors)?)
        .bind(&paper.abstract_text)
        .bind(&paper.summary)
        .bind(&paper.pdf_url)
        .bind(&paper.source)
        .bind(paper.category.to_string())
        .bind(serde_json::to_value(&paper.tags)?)
        .bind(paper.published_at)
        .bind(paper.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert paper")?;

        Ok(paper)
    }

    async fn count_papers(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM papers")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count papers")?;
        Ok(row.get::<i64, _>("n") as u64)
    }

    async fn find_news_by_url(&self, url: &str) -> Result<Option<NewsItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, url, title, content, summary, cover_image,
                   source, category, tags, published_at, created_at
            FROM news
            WHERE url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up news by url")?;

        Ok(row.map(|r| NewsItem {
            id: r.get("id"),
            url: r.get("url"),
            title: r.get("title"),
            content: r.get("content"),
            summary: r.get("summary"),
            cover_image: r.get("cover_image"),
            source: r.get("source"),
            category: r.get::<String, _>("category").parse().unwrap_or_default(),
            tags: string_vec(r.get("tags")),
            published_at: r.get("published_at"),
            created_at: r.get("created_at"),
        }))
    }

    async fn insert_news(&self, draft: NewNewsItem) -> Result<NewsItem> {
        let item = NewsItem {
            id: Uuid::new_v4(),
            url: draft.url,
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

        sqlx::query(
            r#"
            INSERT INTO news (
                id, url, title, content, summary, cover_image,
                source, category, tags, published_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(item.id)
        .bind(&item.url)
        .bind(&item.title)
        .bind(&item.content)
        .bind(&item.summary)
        .bind(&item.cover_image)
        .bind(&item.source)
        .bind(item.category.to_string())
        .bind(serde_json::to_value(&item.tags)?)
        .bind(item.published_at)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert news item")?;

        Ok(item)
    }

    async fn count_news(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM news")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count news")?;
        Ok(row.get::<i64, _>("n") as u64)
    }

    async fn find_org_update_by_url(&self, url: &str) -> Result<Option<OrgUpdate>> {
        let row = sqlx::query(
            r#"
            SELECT id, url, name, title, content, summary, logo,
                   source, category, tags, published_at, created_at
            FROM org_updates
            WHERE url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up org update by url")?;

        Ok(row.map(|r| OrgUpdate {
            id: r.get("id"),
            url: r.get("url"),
            name: r.get("name"),
            title: r.get("title"),
            content: r.get("content"),
            summary: r.get("summary"),
            logo: r.get("logo"),
            source: r.get("source"),
            category: r.get::<String, _>("category").parse().unwrap_or_default(),
            tags: string_vec(r.get("tags")),
            published_at: r.get("published_at"),
            created_at: r.get("created_at"),
        }))
    }

    async fn insert_org_update(&self, draft: NewOrgUpdate) -> Result<OrgUpdate> {
        let update = OrgUpdate {
            id: Uuid::new_v4(),
            url: draft.url,
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

        sqlx::query(
            r#"
            INSERT INTO org_updates (
                id, url, name, title, content, summary, logo,
                source, category, tags, published_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(update.id)
        .bind(&update.url)
        .bind(&update.name)
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.summary)
        .bind(&update.logo)
        .bind(&update.source)
        .bind(update.category.to_string())
        .bind(serde_json::to_value(&update.tags)?)
        .bind(update.published_at)
        .bind(update.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert org update")?;

        Ok(update)
    }

    async fn count_org_updates(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM org_updates")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count org updates")?;
        Ok(row.get::<i64, _>("n") as u64)
    }
}
