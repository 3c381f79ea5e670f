//! Sync orchestrator: fans out to the paper fetcher and the feed ingester
//! per content kind, fans in the per-kind outcomes.
//!
//! The three content-kind pipelines run concurrently — they address
//! independent upstream sources and independent storage partitions. One
//! pipeline failing yields a zero outcome for that kind and never aborts its
//! siblings, so a run always produces a report.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use aiwire_common::{Config, KindOutcome, SyncReport};
use aiwire_store::ContentStore;

use crate::arxiv::PaperFetcher;
use crate::feeds::FeedIngester;
use crate::persist;
use crate::traits::{FeedFetcher, PaperIndex};

/// How the paper pipeline queries the academic index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperMode {
    /// Top-N newest submissions, single request.
    Latest,
    /// Windowed page walk back to the cutoff.
    Backfill,
}

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub paper_mode: PaperMode,
    pub window_days: i64,
}

#[derive(Clone)]
pub struct SyncEngine {
    store: Arc<dyn ContentStore>,
    papers: Arc<PaperFetcher>,
    feeds: Arc<FeedIngester>,
    window_days: i64,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn ContentStore>,
        index: Arc<dyn PaperIndex>,
        fetcher: Arc<dyn FeedFetcher>,
        config: &Config,
    ) -> Self {
        let papers = Arc::new(PaperFetcher::new(
            index,
            config.arxiv_latest_n,
            config.arxiv_page_size,
            config.arxiv_max_pages,
            config.window_days,
        ));
        Self {
            store,
            papers,
            feeds: Arc::new(FeedIngester::new(fetcher)),
            window_days: config.window_days,
        }
    }

    /// Latest-mode papers plus feeds over the default window. What the
    /// periodic trigger runs.
    pub async fn incremental_sync(&self) -> SyncReport {
        self.sync(SyncOptions {
            paper_mode: PaperMode::Latest,
            window_days: self.window_days,
        })
        .await
    }

    /// Backfill-mode papers plus feeds over an explicit 30-day window. Run
    /// once when a deployment starts from an empty store.
    pub async fn full_backfill_sync(&self) -> SyncReport {
        self.sync(SyncOptions {
            paper_mode: PaperMode::Backfill,
            window_days: 30,
        })
        .await
    }

    pub async fn sync(&self, options: SyncOptions) -> SyncReport {
        let started_at = Utc::now();
        info!(?options.paper_mode, options.window_days, "Sync run starting");

        let (papers, news, organizations) = tokio::join!(
            self.sync_papers(options.paper_mode),
            self.sync_news(options.window_days),
            self.sync_org_updates(options.window_days),
        );

        let report = SyncReport {
            papers,
            news,
            organizations,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            papers_added = report.papers.added,
            news_added = report.news.added,
            orgs_added = report.organizations.added,
            "Sync run complete"
        );
        report
    }

    async fn sync_papers(&self, mode: PaperMode) -> KindOutcome {
        let drafts = match mode {
            PaperMode::Latest => self.papers.latest().await,
            PaperMode::Backfill => self.papers.backfill().await,
        };
        match persist::persist_papers(self.store.as_ref(), drafts).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Paper pipeline failed");
                KindOutcome::default()
            }
        }
    }

    async fn sync_news(&self, window_days: i64) -> KindOutcome {
        let drafts = self.feeds.fetch_news(window_days).await;
        match persist::persist_news(self.store.as_ref(), drafts).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "News pipeline failed");
                KindOutcome::default()
            }
        }
    }

    async fn sync_org_updates(&self, window_days: i64) -> KindOutcome {
        let drafts = self.feeds.fetch_org_updates(window_days).await;
        match persist::persist_org_updates(self.store.as_ref(), drafts).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Org update pipeline failed");
                KindOutcome::default()
            }
        }
    }
}
