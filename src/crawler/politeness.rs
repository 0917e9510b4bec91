//! Politeness manager: robots.txt gating and per-domain pacing
//!
//! This module handles:
//! - Lazily loading and caching each domain's robots.txt for the whole crawl
//! - Deciding whether a URL may be fetched
//! - Enforcing a minimum delay between fetches to the same domain
//! - Optionally honouring a larger robots.txt crawl delay

use crate::config::CrawlerConfig;
use crate::robots::{load_robots, RobotsSource};
use crate::state::DomainState;
use crate::url::domain_of;
use crate::UrlResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Gates and paces requests per domain
///
/// All per-domain state is keyed by `host[:port]` and lives as long as the manager.
/// A domain's robots.txt is retrieved at most once; if it cannot be retrieved the
/// domain is treated as allowing everything.
pub struct PolitenessManager {
    /// Minimum time between two fetches to one domain
    min_delay: Duration,

    /// Whether a larger robots.txt Crawl-delay overrides `min_delay`
    respect_crawl_delay: bool,

    /// Per-domain state tracking
    domain_states: HashMap<String, DomainState>,

    /// Where robots.txt files come from
    robots_source: Box<dyn RobotsSource>,
}

impl PolitenessManager {
    /// Creates a new politeness manager
    ///
    /// # Arguments
    ///
    /// * `min_delay` - Minimum spacing between fetches to the same domain
    /// * `robots_source` - Where to retrieve robots.txt from
    pub fn new(min_delay: Duration, robots_source: Box<dyn RobotsSource>) -> Self {
        Self {
            min_delay,
            respect_crawl_delay: false,
            domain_states: HashMap::new(),
            robots_source,
        }
    }

    /// Creates a manager using the delay settings of a crawler configuration
    pub fn from_config(config: &CrawlerConfig, robots_source: Box<dyn RobotsSource>) -> Self {
        Self::new(config.min_delay_duration(), robots_source)
            .with_crawl_delay(config.respect_crawl_delay)
    }

    /// Enables or disables honouring robots.txt Crawl-delay
    pub fn with_crawl_delay(mut self, respect: bool) -> Self {
        self.respect_crawl_delay = respect;
        self
    }

    /// Decides whether `user_agent` may fetch `url`
    ///
    /// Loads the domain's robots.txt on first contact. Retrieval failures never
    /// surface; they install an allow-all policy instead.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - Whether the URL may be fetched
    /// * `Err(UrlError)` - The URL has no resolvable domain
    pub async fn can_fetch(&mut self, url: &str, user_agent: &str) -> UrlResult<bool> {
        let domain = domain_of(url)?;

        let needs_robots = self
            .domain_states
            .get(&domain)
            .map_or(true, |state| !state.has_robots());

        if needs_robots {
            tracing::debug!("Fetching robots.txt for domain: {}", domain);
            let robots = load_robots(self.robots_source.as_ref(), &domain).await;
            self.domain_states
                .entry(domain.clone())
                .or_insert_with(DomainState::new)
                .set_robots(robots, user_agent);
        }

        let allowed = self
            .domain_states
            .get(&domain)
            .map_or(true, |state| state.is_allowed(url, user_agent));

        if !allowed {
            tracing::debug!("URL {} disallowed by robots.txt", url);
        }

        Ok(allowed)
    }

    /// Blocks until `url`'s domain may be fetched again, then records the fetch
    ///
    /// Must be awaited immediately before the fetch. The domain's last-fetch time
    /// is set to "now" on every exit, whether or not a wait happened.
    ///
    /// # Returns
    ///
    /// * `Ok(Duration)` - How long the call waited
    /// * `Err(UrlError)` - The URL has no resolvable domain
    pub async fn wait_if_needed(&mut self, url: &str) -> UrlResult<Duration> {
        let domain = domain_of(url)?;
        let state = self
            .domain_states
            .entry(domain.clone())
            .or_insert_with(DomainState::new);

        let delay = state.effective_delay(self.min_delay, self.respect_crawl_delay);
        let wait = state
            .time_until_next_fetch(delay, Instant::now())
            .unwrap_or(Duration::ZERO);

        if !wait.is_zero() {
            tracing::debug!("Waiting {:?} before next request to {}", wait, domain);
            tokio::time::sleep(wait).await;
        }

        state.record_fetch(Instant::now());
        Ok(wait)
    }

    /// Returns the configured minimum delay
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Gets the state recorded for a specific domain
    pub fn domain_state(&self, domain: &str) -> Option<&DomainState> {
        self.domain_states.get(domain)
    }

    /// Returns the number of domains contacted so far
    pub fn domain_count(&self) -> usize {
        self.domain_states.len()
    }
}
