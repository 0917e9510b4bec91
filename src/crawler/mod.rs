//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier of pending URLs
//! - HTTP fetching of HTML pages
//! - HTML parsing for titles, main text and links
//! - Robots.txt gating and per-domain pacing
//! - Overall crawl orchestration

mod fetcher;
mod frontier;
mod orchestrator;
mod parser;
mod politeness;

pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher};
pub use frontier::{AddOutcome, Frontier, UrlTask};
pub use orchestrator::CrawlOrchestrator;
pub use parser::{HtmlParser, PageParser, PageRecord};
pub use politeness::PolitenessManager;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client shared by page and robots.txt requests
/// 2. Seed the frontier
/// 3. Fetch pages breadth-first, honouring robots.txt and per-domain delays
/// 4. Stop on the first of: empty frontier, page limit, timeout
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Page records in fetch order, plus run statistics
/// * `Err(CrawlError)` - The configuration is invalid or the client could not be built
pub async fn crawl(config: Config) -> Result<CrawlReport> {
    CrawlOrchestrator::from_config(&config)?.run().await
}
