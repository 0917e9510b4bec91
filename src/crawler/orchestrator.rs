//! Crawl orchestrator - main crawl loop
//!
//! Ties the frontier, politeness manager, fetcher and parser together. One task
//! is fully processed (robots check, pacing, fetch, parse, enqueue links) before
//! the next one is pulled. The loop stops when any of these holds at the top of
//! an iteration:
//! - the frontier is empty
//! - the page budget is used up
//! - the wall-clock budget is used up
//! - an interrupt was requested
//!
//! Stop conditions are not checked mid-fetch, so a slow fetch can overrun the
//! timeout by at most one request timeout.

use crate::config::{validate_crawler_config, Config, CrawlerConfig};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, UrlTask};
use crate::crawler::parser::{HtmlParser, PageParser};
use crate::crawler::politeness::PolitenessManager;
use crate::output::{CrawlReport, CrawlStats, StopReason};
use crate::robots::HttpRobotsSource;
use crate::state::TaskOutcome;
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Drives a single bounded crawl run
pub struct CrawlOrchestrator {
    frontier: Frontier,
    politeness: PolitenessManager,
    fetcher: Box<dyn Fetcher>,
    parser: Box<dyn PageParser>,
    max_pages: usize,
    timeout: Duration,
    user_agent: String,
    interrupt: Arc<AtomicBool>,
}

impl CrawlOrchestrator {
    /// Creates an orchestrator and seeds its frontier
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl settings (seeds, depth, budgets)
    /// * `user_agent` - Agent name checked against robots.txt
    /// * `politeness` - The politeness manager for this run
    /// * `fetcher` - Page fetcher
    /// * `parser` - Link and data extractor
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOrchestrator)` - Ready to run
    /// * `Err(CrawlError)` - The crawler configuration is invalid
    pub fn new(
        config: &CrawlerConfig,
        user_agent: impl Into<String>,
        politeness: PolitenessManager,
        fetcher: Box<dyn Fetcher>,
        parser: Box<dyn PageParser>,
    ) -> Result<Self> {
        validate_crawler_config(config)?;

        let mut frontier = Frontier::new(config.max_depth);
        for seed in &config.seeds {
            frontier.add(UrlTask::seed(seed.as_str()));
        }

        Ok(Self {
            frontier,
            politeness,
            fetcher,
            parser,
            max_pages: config.max_pages,
            timeout: config.timeout_duration(),
            user_agent: user_agent.into(),
            interrupt: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Creates an orchestrator backed by HTTP, robots.txt and HTML parsing
    ///
    /// The page fetcher and robots.txt source share one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        crate::config::validate_fetcher_config(&config.fetcher)?;

        let fetcher = HttpFetcher::from_config(&config.fetcher)?;
        let robots_source = HttpRobotsSource::new(fetcher.client().clone())
            .with_scheme(config.fetcher.robots_scheme.as_str());
        let politeness = PolitenessManager::from_config(&config.crawler, Box::new(robots_source));

        Self::new(
            &config.crawler,
            config.fetcher.user_agent.as_str(),
            politeness,
            Box::new(fetcher),
            Box::new(HtmlParser),
        )
    }

    /// Uses an externally owned interrupt flag
    ///
    /// Setting the flag stops the crawl at the next loop iteration; records collected
    /// so far are still returned.
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Returns a handle that stops the crawl when set to true
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Read access to the frontier
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Read access to the politeness manager
    pub fn politeness(&self) -> &PolitenessManager {
        &self.politeness
    }

    /// Runs the crawl loop until a stop condition holds
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Records in fetch order, plus statistics
    /// * `Err(CrawlError)` - A task URL had no resolvable domain
    pub async fn run(&mut self) -> Result<CrawlReport> {
        tracing::info!(
            "Starting crawl: {} seed(s), max depth {}, max pages {}, timeout {:?}",
            self.frontier.len(),
            self.frontier.max_depth(),
            self.max_pages,
            self.timeout
        );

        let start_time = Instant::now();
        let mut records = Vec::new();
        let mut stats = CrawlStats::default();

        let stop_reason = loop {
            if let Some(reason) = self.stop_condition(records.len(), start_time) {
                break reason;
            }

            let Some(task) = self.frontier.next() else {
                break StopReason::FrontierExhausted;
            };

            tracing::debug!("Processing URL: {} (depth {})", task.url, task.depth);
            let outcome = self.process_task(&task).await?;
            stats.record(&outcome);

            if let TaskOutcome::Fetched { record, .. } = outcome {
                records.push(record);

                if records.len() % 10 == 0 {
                    let elapsed = start_time.elapsed();
                    tracing::info!(
                        "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                        records.len(),
                        self.frontier.len(),
                        records.len() as f64 / elapsed.as_secs_f64()
                    );
                }
            }
        };

        stats.stop_reason = stop_reason;
        stats.elapsed = start_time.elapsed();
        stats.domains_contacted = self.politeness.domain_count() as u64;
        stats.pending_at_stop = self.frontier.len() as u64;

        tracing::info!(
            "Crawl finished ({}): {} pages fetched of {} attempted in {:?}",
            stop_reason,
            stats.pages_fetched,
            stats.pages_attempted,
            stats.elapsed
        );

        Ok(CrawlReport::new(records, stats))
    }

    /// Checks the loop guard, returning why the crawl must stop
    fn stop_condition(&self, pages_crawled: usize, start_time: Instant) -> Option<StopReason> {
        if pages_crawled >= self.max_pages {
            return Some(StopReason::PageLimit);
        }
        if start_time.elapsed() >= self.timeout {
            tracing::info!("Crawl timeout reached after {:?}", self.timeout);
            return Some(StopReason::Timeout);
        }
        if self.interrupt.load(Ordering::SeqCst) {
            tracing::info!("Crawl interrupted");
            return Some(StopReason::Interrupted);
        }
        if self.frontier.is_empty() {
            return Some(StopReason::FrontierExhausted);
        }
        None
    }

    /// Processes a single task
    ///
    /// 1. Checks robots.txt
    /// 2. Waits out the domain's delay
    /// 3. Fetches the page
    /// 4. Extracts the record and enqueues discovered links
    async fn process_task(&mut self, task: &UrlTask) -> Result<TaskOutcome> {
        if !self.politeness.can_fetch(&task.url, &self.user_agent).await? {
            return Ok(TaskOutcome::Disallowed);
        }

        self.politeness.wait_if_needed(&task.url).await?;

        let Some(html) = self.fetcher.fetch(&task.url).await else {
            tracing::debug!("No content from {}, skipping", task.url);
            return Ok(TaskOutcome::FetchFailed);
        };

        let record = self.parser.extract_data(&task.url, &html);
        let links = self.parser.extract_links(&task.url, &html);

        let links_found = links.len();
        let links_enqueued = links
            .into_iter()
            .filter(|link| self.frontier.add(task.child(link.as_str())).is_accepted())
            .count();

        tracing::debug!(
            "Fetched {}: {} links found, {} enqueued",
            task.url,
            links_found,
            links_enqueued
        );

        Ok(TaskOutcome::Fetched {
            record,
            links_found,
            links_enqueued,
        })
    }
}
