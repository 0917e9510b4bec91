//! Output module for crawl results
//!
//! This module handles:
//! - The crawl report (page records plus statistics) returned by a run
//! - Printing statistics to the console
//! - Writing markdown reports

mod markdown;
pub mod stats;

pub use markdown::{excerpt, format_markdown_report, generate_markdown_report};
pub use stats::{print_statistics, CrawlStats, StopReason};

use crate::crawler::PageRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a crawl run produced
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Page records, in the order pages were successfully fetched
    pub records: Vec<PageRecord>,

    /// Run statistics
    pub stats: CrawlStats,

    /// When the run ended
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Creates a report stamped with the current time
    pub fn new(records: Vec<PageRecord>, stats: CrawlStats) -> Self {
        Self {
            records,
            stats,
            finished_at: Utc::now(),
        }
    }

    /// Returns true if no page was fetched
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
