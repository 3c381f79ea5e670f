use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Scheduler
    pub sync_interval_minutes: u64,

    // Ingestion
    pub window_days: i64,
    pub arxiv_latest_n: usize,
    pub arxiv_page_size: usize,
    pub arxiv_max_pages: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            sync_interval_minutes: env_or("AIWIRE_SYNC_INTERVAL_MINUTES", 10),
            window_days: env_or("AIWIRE_WINDOW_DAYS", 30),
            arxiv_latest_n: env_or("AIWIRE_ARXIV_LATEST_N", 50),
            arxiv_page_size: env_or("AIWIRE_ARXIV_PAGE_SIZE", 100),
            arxiv_max_pages: env_or("AIWIRE_ARXIV_MAX_PAGES", 20),
        }
    }

    /// Log the active configuration without credentials.
    pub fn log_redacted(&self) {
        info!(
            sync_interval_minutes = self.sync_interval_minutes,
            window_days = self.window_days,
            arxiv_latest_n = self.arxiv_latest_n,
            arxiv_page_size = self.arxiv_page_size,
            arxiv_max_pages = self.arxiv_max_pages,
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
