//! Deduplicating persistence.
//!
//! Insert-if-absent keyed by canonical URL; existing records are never
//! modified. Within one batch, the first draft carrying a given URL wins —
//! later duplicates (the same item mirrored by two sources) are skipped
//! deterministically regardless of iteration order upstream.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{info, warn};

use aiwire_common::{KindOutcome, NewNewsItem, NewOrgUpdate, NewPaper};
use aiwire_store::ContentStore;

pub async fn persist_papers(store: &dyn ContentStore, drafts: Vec<NewPaper>) -> Result<KindOutcome> {
    let mut outcome = KindOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for draft in drafts {
        if !seen.insert(draft.url.clone()) {
            outcome.skipped += 1;
            continue;
        }
        if store.find_paper_by_url(&draft.url).await?.is_some() {
            outcome.skipped += 1;
            continue;
        }
        match store.insert_paper(draft).await {
            Ok(_) => outcome.added += 1,
            Err(e) => warn!(error = %e, "Failed to insert paper, continuing batch"),
        }
    }

    outcome.total = store.count_papers().await?;
    info!(
        added = outcome.added,
        skipped = outcome.skipped,
        total = outcome.total,
        "Paper persistence complete"
    );
    Ok(outcome)
}

pub async fn persist_news(store: &dyn ContentStore, drafts: Vec<NewNewsItem>) -> Result<KindOutcome> {
    let mut outcome = KindOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for draft in drafts {
        if !seen.insert(draft.url.clone()) {
            outcome.skipped += 1;
            continue;
        }
        if store.find_news_by_url(&draft.url).await?.is_some() {
            outcome.skipped += 1;
            continue;
        }
        match store.insert_news(draft).await {
            Ok(_) => outcome.added += 1,
            Err(e) => warn!(error = %e, "Failed to insert news item, continuing batch"),
        }
    }

    outcome.total = store.count_news().await?;
    info!(
        added = outcome.added,
        skipped = outcome.skipped,
        total = outcome.total,
        "News persistence complete"
    );
    Ok(outcome)
}

pub async fn persist_org_updates(
    store: &dyn ContentStore,
    drafts: Vec<NewOrgUpdate>,
) -> Result<KindOutcome> {
    let mut outcome = KindOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for draft in drafts {
        if !seen.insert(draft.url.clone()) {
            outcome.skipped += 1;
            continue;
        }
        if store.find_org_update_by_url(&draft.url).await?.is_some() {
            outcome.skipped += 1;
            continue;
        }
        match store.insert_org_update(draft).await {
            Ok(_) => outcome.added += 1,
            Err(e) => warn!(error = %e, "Failed to insert org update, continuing batch"),
        }
    }

    outcome.total = store.count_org_updates().await?;
    info!(
        added = outcome.added,
        skipped = outcome.skipped,
        total = outcome.total,
        "Org update persistence complete"
    );
    Ok(outcome)
}
