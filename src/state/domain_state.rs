use crate::robots::ParsedRobots;
use std::time::{Duration, Instant};

/// Tracks the politeness state of one domain during a crawl
///
/// Holds the two pieces of per-domain memory the crawler keeps for a whole run:
/// when the domain was last fetched, and its robots.txt policy. Both live until the
/// crawl ends; nothing is evicted or refreshed.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Instant of the last fetch to this domain
    pub last_fetch_time: Option<Instant>,

    /// Number of fetches paced for this domain
    pub fetch_count: u32,

    /// Robots.txt policy, once loaded
    pub robots: Option<ParsedRobots>,

    /// Crawl-delay from robots.txt for the crawler's user agent, in seconds
    pub crawl_delay: Option<f64>,
}

impl DomainState {
    /// Creates a new DomainState with nothing recorded yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the time until the next fetch may start
    ///
    /// # Arguments
    ///
    /// * `min_delay` - The minimum spacing between two fetches to this domain
    /// * `now` - The current time instant
    ///
    /// # Returns
    ///
    /// * `None` - A fetch may start now
    /// * `Some(Duration)` - The remaining wait
    pub fn time_until_next_fetch(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_fetch_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= min_delay {
            None
        } else {
            Some(min_delay - elapsed)
        }
    }

    /// Records that a fetch to this domain is starting
    pub fn record_fetch(&mut self, now: Instant) {
        self.fetch_count += 1;
        self.last_fetch_time = Some(now);
    }

    /// Returns true once robots.txt has been loaded (or defaulted) for this domain
    pub fn has_robots(&self) -> bool {
        self.robots.is_some()
    }

    /// Stores the robots.txt policy and the crawl delay it sets for `user_agent`
    pub fn set_robots(&mut self, robots: ParsedRobots, user_agent: &str) {
        self.crawl_delay = robots.crawl_delay(user_agent);
        self.robots = Some(robots);
    }

    /// Checks a URL against the stored robots.txt policy
    ///
    /// A domain whose policy has not been loaded yet is treated as allowing everything.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.robots
            .as_ref()
            .map_or(true, |robots| robots.is_allowed(url, user_agent))
    }

    /// The spacing to enforce for this domain
    ///
    /// # Arguments
    ///
    /// * `min_delay` - The configured minimum delay
    /// * `respect_crawl_delay` - Whether a larger robots.txt Crawl-delay applies
    pub fn effective_delay(&self, min_delay: Duration, respect_crawl_delay: bool) -> Duration {
        if !respect_crawl_delay {
            return min_delay;
        }

        let robots_delay = self
            .crawl_delay
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
            .unwrap_or(Duration::ZERO);

        std::cmp::max(min_delay, robots_delay)
    }
}
