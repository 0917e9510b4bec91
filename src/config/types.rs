use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Crawl
///
/// Every section and key is optional; missing values fall back to the defaults
/// documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// Crawl scheduling and budget configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Seed URLs, crawled at depth 0
    pub seeds: Vec<String>,

    /// Maximum link depth from a seed (default 2)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Minimum time between requests to the same domain, in seconds (default 1.0)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Maximum number of successfully fetched pages (default 100)
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Wall-clock budget for the whole run, in seconds (default 30)
    pub timeout: f64,

    /// Honour a robots.txt `Crawl-delay` larger than `min-delay` (default false)
    #[serde(rename = "respect-crawl-delay")]
    pub respect_crawl_delay: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            max_depth: 2,
            min_delay: 1.0,
            max_pages: 100,
            timeout: 30.0,
            respect_crawl_delay: false,
        }
    }
}

impl CrawlerConfig {
    /// Minimum per-domain delay as a Duration (negative or NaN values clamp to zero)
    pub fn min_delay_duration(&self) -> Duration {
        seconds_to_duration(self.min_delay)
    }

    /// Crawl timeout as a Duration (negative or NaN values clamp to zero)
    pub fn timeout_duration(&self) -> Duration {
        seconds_to_duration(self.timeout)
    }
}

/// HTTP fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User agent sent with requests and matched against robots.txt (default "MyCrawler")
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds (default 10)
    #[serde(rename = "request-timeout")]
    pub request_timeout: f64,

    /// Scheme used to request robots.txt (default "https")
    #[serde(rename = "robots-scheme")]
    pub robots_scheme: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "MyCrawler".to_string(),
            request_timeout: 10.0,
            robots_scheme: "https".to_string(),
        }
    }
}

impl FetcherConfig {
    /// Per-request timeout as a Duration
    pub fn request_timeout_duration(&self) -> Duration {
        seconds_to_duration(self.request_timeout)
    }
}

/// Negative and NaN values become zero; values too large for a Duration saturate
fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}
