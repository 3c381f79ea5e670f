use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Categories ---

/// Research-paper category, derived from arXiv subject tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaperCategory {
    Ai,
    Ml,
    Nlp,
    Cv,
    Robotics,
    Ir,
}

impl Default for PaperCategory {
    fn default() -> Self {
        PaperCategory::Ai
    }
}

impl std::fmt::Display for PaperCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaperCategory::Ai => write!(f, "AI"),
            PaperCategory::Ml => write!(f, "ML"),
            PaperCategory::Nlp => write!(f, "NLP"),
            PaperCategory::Cv => write!(f, "CV"),
            PaperCategory::Robotics => write!(f, "ROBOTICS"),
            PaperCategory::Ir => write!(f, "IR"),
        }
    }
}

impl std::str::FromStr for PaperCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AI" => Ok(PaperCategory::Ai),
            "ML" => Ok(PaperCategory::Ml),
            "NLP" => Ok(PaperCategory::Nlp),
            "CV" => Ok(PaperCategory::Cv),
            "ROBOTICS" => Ok(PaperCategory::Robotics),
            "IR" => Ok(PaperCategory::Ir),
            _ => Err(()),
        }
    }
}

/// News and organization-update category, assigned by the keyword classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewsCategory {
    Funding,
    Product,
    Hiring,
    Acquisition,
    Partnership,
    Policy,
    Trend,
    Tech,
}

impl Default for NewsCategory {
    fn default() -> Self {
        NewsCategory::Tech
    }
}

impl NewsCategory {
    /// Categories that qualify an entry as an organization update.
    pub fn is_org_update(&self) -> bool {
        matches!(
            self,
            NewsCategory::Product
                | NewsCategory::Funding
                | NewsCategory::Acquisition
                | NewsCategory::Partnership
                | NewsCategory::Hiring
        )
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsCategory::Funding => write!(f, "FUNDING"),
            NewsCategory::Product => write!(f, "PRODUCT"),
            NewsCategory::Hiring => write!(f, "HIRING"),
            NewsCategory::Acquisition => write!(f, "ACQUISITION"),
            NewsCategory::Partnership => write!(f, "PARTNERSHIP"),
            NewsCategory::Policy => write!(f, "POLICY"),
            NewsCategory::Trend => write!(f, "TREND"),
            NewsCategory::Tech => write!(f, "TECH"),
        }
    }
}

impl std::str::FromStr for NewsCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FUNDING" => Ok(NewsCategory::Funding),
            "PRODUCT" => Ok(NewsCategory::Product),
            "HIRING" => Ok(NewsCategory::Hiring),
            "ACQUISITION" => Ok(NewsCategory::Acquisition),
            "PARTNERSHIP" => Ok(NewsCategory::Partnership),
            "POLICY" => Ok(NewsCategory::Policy),
            "TREND" => Ok(NewsCategory::Trend),
            "TECH" => Ok(NewsCategory::Tech),
            _ => Err(()),
        }
    }
}

// --- Stored content items ---

/// Research paper, deduplicated on `url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub summary: Option<String>,
    pub pdf_url: Option<String>,
    pub source: String,
    pub category: PaperCategory,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Industry news article, deduplicated on `url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub source: String,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Organization announcement (product launch, funding round, etc.),
/// deduplicated on `url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgUpdate {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub logo: Option<String>,
    pub source: String,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// --- Draft forms (pre-persistence; id/created_at assigned by the store) ---

#[derive(Debug, Clone)]
pub struct NewPaper {
    pub url: String,
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub summary: Option<String>,
    pub pdf_url: Option<String>,
    pub source: String,
    pub category: PaperCategory,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNewsItem {
    pub url: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub source: String,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrgUpdate {
    pub url: String,
    pub name: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub logo: Option<String>,
    pub source: String,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
}

// --- Sync outcomes ---

/// Per-kind result of one persistence pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindOutcome {
    /// Items inserted this run.
    pub added: u32,
    /// Items skipped because a record with the same URL already existed.
    pub skipped: u32,
    /// Total records of this kind after the run.
    pub total: u64,
}

/// Aggregate result of one synchronization run across all content kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub papers: KindOutcome,
    pub news: KindOutcome,
    pub organizations: KindOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Sync Run Complete ===")?;
        writeln!(
            f,
            "Papers:        +{} ({} skipped, {} total)",
            self.papers.added, self.papers.skipped, self.papers.total
        )?;
        writeln!(
            f,
            "News:          +{} ({} skipped, {} total)",
            self.news.added, self.news.skipped, self.news.total
        )?;
        writeln!(
            f,
            "Organizations: +{} ({} skipped, {} total)",
            self.organizations.added, self.organizations.skipped, self.organizations.total
        )?;
        write!(
            f,
            "Duration:      {}s",
            (self.finished_at - self.started_at).num_seconds()
        )
    }
}

// --- Control surface ---

/// Result of a scheduler start/stop call. Failures are reported through the
/// message, never through an error return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlOutcome {
    pub success: bool,
    pub message: String,
}

impl ControlOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Snapshot of the scheduler's run record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub scheduled: bool,
    pub busy: bool,
    pub schedule: String,
    pub last_run_time: Option<DateTime<Utc>>,
    pub last_result: Option<SyncReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_round_trips() {
        for cat in [
            NewsCategory::Funding,
            NewsCategory::Product,
            NewsCategory::Hiring,
            NewsCategory::Acquisition,
            NewsCategory::Partnership,
            NewsCategory::Policy,
            NewsCategory::Trend,
            NewsCategory::Tech,
        ] {
            assert_eq!(cat.to_string().parse::<NewsCategory>(), Ok(cat));
        }
        for cat in [
            PaperCategory::Ai,
            PaperCategory::Ml,
            PaperCategory::Nlp,
            PaperCategory::Cv,
            PaperCategory::Robotics,
            PaperCategory::Ir,
        ] {
            assert_eq!(cat.to_string().parse::<PaperCategory>(), Ok(cat));
        }
    }

    #[test]
    fn org_update_categories() {
        assert!(NewsCategory::Funding.is_org_update());
        assert!(NewsCategory::Product.is_org_update());
        assert!(!NewsCategory::Tech.is_org_update());
        assert!(!NewsCategory::Policy.is_org_update());
        assert!(!NewsCategory::Trend.is_org_update());
    }
}
