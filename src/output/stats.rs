//! Crawl statistics
//!
//! Counters collected by the orchestrator while it runs, plus the reason the run
//! stopped.

use crate::state::TaskOutcome;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Why a crawl run ended
///
/// Every variant is a normal termination; partial results are still returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No pending tasks remain
    FrontierExhausted,
    /// The page budget was reached
    PageLimit,
    /// The wall-clock budget was used up
    Timeout,
    /// An interrupt was requested
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::FrontierExhausted => "frontier exhausted",
            Self::PageLimit => "page limit reached",
            Self::Timeout => "timeout reached",
            Self::Interrupted => "interrupted",
        };
        f.write_str(text)
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    /// Tasks pulled from the frontier
    pub pages_attempted: u64,

    /// Tasks that produced a page record
    pub pages_fetched: u64,

    /// Tasks skipped because robots.txt disallowed them
    pub pages_disallowed: u64,

    /// Tasks whose fetch returned nothing
    pub fetch_failures: u64,

    /// Links found on fetched pages
    pub links_discovered: u64,

    /// Links the frontier accepted
    pub links_enqueued: u64,

    /// Distinct domains contacted
    pub domains_contacted: u64,

    /// Tasks still pending when the run stopped
    pub pending_at_stop: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Why the run ended
    pub stop_reason: StopReason,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self {
            pages_attempted: 0,
            pages_fetched: 0,
            pages_disallowed: 0,
            fetch_failures: 0,
            links_discovered: 0,
            links_enqueued: 0,
            domains_contacted: 0,
            pending_at_stop: 0,
            elapsed: Duration::ZERO,
            stop_reason: StopReason::FrontierExhausted,
        }
    }
}

impl CrawlStats {
    /// Counts one processed task
    pub fn record(&mut self, outcome: &TaskOutcome) {
        self.pages_attempted += 1;
        match outcome {
            TaskOutcome::Fetched {
                links_found,
                links_enqueued,
                ..
            } => {
                self.pages_fetched += 1;
                self.links_discovered += *links_found as u64;
                self.links_enqueued += *links_enqueued as u64;
            }
            TaskOutcome::Disallowed => self.pages_disallowed += 1,
            TaskOutcome::FetchFailed => self.fetch_failures += 1,
        }
    }

    /// Percentage of attempted tasks that produced a record
    pub fn success_rate(&self) -> f64 {
        if self.pages_attempted == 0 {
            0.0
        } else {
            (self.pages_fetched as f64 / self.pages_attempted as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Stop reason: {}", stats.stop_reason);
    println!("  Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
    println!("  Domains contacted: {}", stats.domains_contacted);
    println!("  Still pending: {}", stats.pending_at_stop);
    println!();

    println!("Pages:");
    println!("  Attempted: {}", stats.pages_attempted);
    println!("  Fetched: {}", stats.pages_fetched);
    println!("  Disallowed by robots.txt: {}", stats.pages_disallowed);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!();

    println!("Links:");
    println!("  Discovered: {}", stats.links_discovered);
    println!("  Enqueued: {}", stats.links_enqueued);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_attempted
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::PageRecord;

    #[test]
    fn test_record_outcomes() {
        let mut stats = CrawlStats::default();
        stats.record(&TaskOutcome::Fetched {
            record: PageRecord {
                url: "https://a.test".to_string(),
                title: "A".to_string(),
                content: "hi".to_string(),
            },
            links_found: 4,
            links_enqueued: 3,
        });
        stats.record(&TaskOutcome::Disallowed);
        stats.record(&TaskOutcome::FetchFailed);
        stats.record(&TaskOutcome::FetchFailed);

        assert_eq!(stats.pages_attempted, 4);
        assert_eq!(stats.pages_fetched, 1);
        assert_eq!(stats.pages_disallowed, 1);
        assert_eq!(stats.fetch_failures, 2);
        assert_eq!(stats.links_discovered, 4);
        assert_eq!(stats.links_enqueued, 3);
        assert_eq!(stats.success_rate(), 25.0);
    }

    #[test]
    fn test_success_rate_with_no_attempts() {
        assert_eq!(CrawlStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::Timeout.to_string(), "timeout reached");
        assert_eq!(StopReason::PageLimit.to_string(), "page limit reached");
    }
}
