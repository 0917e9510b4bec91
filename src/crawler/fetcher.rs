//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler:
//! - Building HTTP clients with the configured user agent and timeout
//! - Single GET requests (no retries)
//! - Classifying responses so only successful HTML pages yield markup

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::Client;

/// Something that can fetch the markup of a page
///
/// Implementations return `None` rather than an error for every failure; the
/// crawler treats an unfetchable page as simply absent.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, returning its HTML body or `None`
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Result of a single page request
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_crawl::config::FetcherConfig;
/// use sumi_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout_duration())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with `text/html` | Success |
/// | 2xx with other Content-Type | ContentMismatch |
/// | non-2xx status | HttpError |
/// | timeout, connect or body error | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Fetcher backed by a reqwest client
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// The underlying client, shared with the robots.txt source
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::trace!("Fetched {} (HTTP {}, final URL {})", url, status_code, final_url);
                Some(body)
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {}: not HTML ({})", url, content_type);
                None
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!("Skipping {}: HTTP {}", url, status_code);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Skipping {}: {}", url, error);
                None
            }
        }
    }
}
