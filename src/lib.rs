//! Sumi-Crawl: a bounded, polite web crawler
//!
//! This crate visits pages breadth-first from a set of seed URLs, up to a depth and
//! page budget, while honouring robots.txt and a minimum delay between requests to
//! the same domain. It returns the title and main text of every page it fetched.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Crawl operations
///
/// Network and content irregularities (failed fetches, missing robots.txt,
/// non-HTML pages) never surface here; they only shrink the result set.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

/// Result type alias for Sumi-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOrchestrator, Frontier, PageRecord, PolitenessManager, UrlTask};
pub use output::{CrawlReport, CrawlStats, StopReason};
pub use state::{DomainState, TaskOutcome};
pub use crate::url::{domain_of, extract_domain};
