//! Recurring-trigger lifecycle and run mutual exclusion.
//!
//! One `SyncScheduler` instance owns the run record for the process: the
//! ticker task handle, the busy flag, and the cached last run time/result.
//! There is no module-level state; handlers hold a clone of the scheduler.
//!
//! The busy flag is in-process only. Multiple engine instances would each
//! run their own syncs — coordinating across processes is out of scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;

use aiwire_common::{ControlOutcome, SchedulerStatus, SyncReport};

use crate::sync::SyncEngine;

#[derive(Clone)]
pub struct SyncScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    engine: SyncEngine,
    interval_minutes: u64,
    /// Handle of the periodic ticker task; `Some` while scheduled.
    ticker: Mutex<Option<tokio::task::JoinHandle<()>>>,
    /// Set while a run is executing. Overlapping triggers are dropped, not
    /// queued.
    busy: AtomicBool,
    last_run_time: Mutex<Option<DateTime<Utc>>>,
    last_result: Mutex<Option<SyncReport>>,
}

impl SyncScheduler {
    pub fn new(engine: SyncEngine, interval_minutes: u64) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                interval_minutes,
                ticker: Mutex::new(None),
                busy: AtomicBool::new(false),
                last_run_time: Mutex::new(None),
                last_result: Mutex::new(None),
            }),
        }
    }

    /// Register the periodic trigger. Idempotent: a second call is a no-op
    /// reported through the outcome message, and never creates a second
    /// ticker.
    pub fn start(&self) -> ControlOutcome {
        let mut ticker = self.inner.ticker.lock().unwrap();
        if ticker.is_some() {
            return ControlOutcome::ok("already running");
        }

        let scheduler = self.clone();
        let period = Duration::from_secs(self.inner.interval_minutes * 60);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Consume the immediate first tick; the first run happens one
            // full period after start().
            interval.tick().await;
            loop {
                interval.tick().await;
                // Each run detaches from the ticker so stop() can never kill
                // an in-flight run, only future trigger invocations.
                let scheduler = scheduler.clone();
                tokio::spawn(async move {
                    scheduler.run_now().await;
                });
            }
        });
        *ticker = Some(handle);

        info!(
            interval_minutes = self.inner.interval_minutes,
            "Scheduler started"
        );
        ControlOutcome::ok("scheduler started")
    }

    /// Cancel the periodic trigger. Stopping an unscheduled scheduler is
    /// reported as a failure message.
    pub fn stop(&self) -> ControlOutcome {
        let mut ticker = self.inner.ticker.lock().unwrap();
        match ticker.take() {
            Some(handle) => {
                handle.abort();
                info!("Scheduler stopped");
                ControlOutcome::ok("scheduler stopped")
            }
            None => ControlOutcome::failed("scheduler is not running"),
        }
    }

    /// Run an incremental sync now. If a run is already in flight the
    /// trigger is dropped and the previous result is returned unchanged.
    pub async fn run_now(&self) -> Option<SyncReport> {
        if !self.begin_run() {
            return self.inner.last_result.lock().unwrap().clone();
        }
        let report = self.inner.engine.incremental_sync().await;
        self.finish_run(report.clone());
        Some(report)
    }

    /// Run a full backfill sync now, under the same mutual-exclusion
    /// discipline as `run_now`.
    pub async fn run_initial_sync(&self) -> Option<SyncReport> {
        if !self.begin_run() {
            return self.inner.last_result.lock().unwrap().clone();
        }
        let report = self.inner.engine.full_backfill_sync().await;
        self.finish_run(report.clone());
        Some(report)
    }

    /// Snapshot of the run record.
    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            scheduled: self.inner.ticker.lock().unwrap().is_some(),
            busy: self.inner.busy.load(Ordering::SeqCst),
            schedule: format!("every {} minutes", self.inner.interval_minutes),
            last_run_time: *self.inner.last_run_time.lock().unwrap(),
            last_result: self.inner.last_result.lock().unwrap().clone(),
        }
    }

    fn begin_run(&self) -> bool {
        let acquired = self
            .inner
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if !acquired {
            info!("Sync already in progress, dropping trigger");
        }
        acquired
    }

    fn finish_run(&self, report: SyncReport) {
        *self.inner.last_run_time.lock().unwrap() = Some(report.finished_at);
        *self.inner.last_result.lock().unwrap() = Some(report);
        self.inner.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use anyhow::Result;
    use async_trait::async_trait;

    use aiwire_common::Config;
    use aiwire_store::MemoryStore;

    use crate::traits::{FeedEntry, FeedFetcher, IndexEntry, PaperIndex};

    use super::*;

    /// Index stub that counts queries and holds each one open for a second
    /// of (paused) time.
    struct SlowIndex {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PaperIndex for SlowIndex {
        async fn query(&self, _start: usize, _max_results: usize) -> Result<Vec<IndexEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(Vec::new())
        }
    }

    struct EmptyFeeds;

    #[async_trait]
    impl FeedFetcher for EmptyFeeds {
        async fn fetch(&self, _feed_url: &str) -> Result<Vec<FeedEntry>> {
            Ok(Vec::new())
        }
    }

    fn scheduler(index: Arc<SlowIndex>, interval_minutes: u64) -> SyncScheduler {
        let config = Config {
            database_url: String::new(),
            sync_interval_minutes: interval_minutes,
            window_days: 30,
            arxiv_latest_n: 50,
            arxiv_page_size: 100,
            arxiv_max_pages: 20,
        };
        let engine = SyncEngine::new(
            Arc::new(MemoryStore::new()),
            index,
            Arc::new(EmptyFeeds),
            &config,
        );
        SyncScheduler::new(engine, interval_minutes)
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let scheduler = scheduler(
            Arc::new(SlowIndex {
                calls: AtomicUsize::new(0),
            }),
            10,
        );

        let first = scheduler.start();
        assert!(first.success);
        assert!(scheduler.status().scheduled);

        let second = scheduler.start();
        assert!(second.success);
        assert_eq!(second.message, "already running");

        let stopped = scheduler.stop();
        assert!(stopped.success);
        assert!(!scheduler.status().scheduled);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_start_reports_failure() {
        let scheduler = scheduler(
            Arc::new(SlowIndex {
                calls: AtomicUsize::new(0),
            }),
            10,
        );
        let outcome = scheduler.stop();
        assert!(!outcome.success);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_run_now_executes_once() {
        let index = Arc::new(SlowIndex {
            calls: AtomicUsize::new(0),
        });
        let scheduler = scheduler(index.clone(), 10);

        // Seed a previous result.
        let seed = scheduler.run_now().await.expect("first run executes");
        assert_eq!(index.calls.load(Ordering::SeqCst), 1);

        // Two concurrent triggers: exactly one more execution; the dropped
        // trigger sees the seeded result unchanged.
        let (a, b) = tokio::join!(scheduler.run_now(), scheduler.run_now());
        assert_eq!(index.calls.load(Ordering::SeqCst), 2);

        let reports = [a.unwrap(), b.unwrap()];
        assert!(reports
            .iter()
            .any(|r| r.started_at == seed.started_at && r.finished_at == seed.finished_at));
        assert!(reports.iter().any(|r| r.started_at > seed.started_at));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_trigger_with_no_prior_result_returns_none() {
        let index = Arc::new(SlowIndex {
            calls: AtomicUsize::new(0),
        });
        let scheduler = scheduler(index.clone(), 10);

        let (a, b) = tokio::join!(scheduler.run_now(), scheduler.run_now());
        assert_eq!(index.calls.load(Ordering::SeqCst), 1);
        // One trigger executed, the other was dropped with nothing cached.
        assert_eq!(a.is_some() as u8 + b.is_some() as u8, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_records_time_and_result() {
        let scheduler = scheduler(
            Arc::new(SlowIndex {
                calls: AtomicUsize::new(0),
            }),
            10,
        );

        let before = scheduler.status();
        assert!(before.last_run_time.is_none());
        assert!(before.last_result.is_none());
        assert!(!before.busy);
        assert_eq!(before.schedule, "every 10 minutes");

        scheduler.run_now().await;

        let after = scheduler.status();
        assert!(after.last_run_time.is_some());
        assert!(after.last_result.is_some());
        assert!(!after.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_fires_after_one_period() {
        let index = Arc::new(SlowIndex {
            calls: AtomicUsize::new(0),
        });
        let scheduler = scheduler(index.clone(), 1);

        scheduler.start();
        assert!(scheduler.status().last_run_time.is_none());

        // Cross the first period, then give the detached run (and its paced
        // internal sleeps) time to finish.
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(index.calls.load(Ordering::SeqCst) >= 1);
        assert!(scheduler.status().last_run_time.is_some());

        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn initial_sync_uses_same_exclusion() {
        let index = Arc::new(SlowIndex {
            calls: AtomicUsize::new(0),
        });
        let scheduler = scheduler(index.clone(), 10);

        let (a, b) = tokio::join!(scheduler.run_initial_sync(), scheduler.run_now());
        // Backfill issues one index request (empty first page terminates the
        // walk); the overlapping incremental trigger is dropped.
        assert_eq!(index.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.is_some() as u8 + b.is_some() as u8, 1);
    }
}
