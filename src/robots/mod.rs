//! Robots.txt handling module
//!
//! This module retrieves and parses robots.txt files. Retrieval is behind the
//! [`RobotsSource`] trait so the politeness layer can be driven without a network.
//! Every retrieval failure collapses to "no rules", which the caller turns into an
//! allow-all policy.

mod parser;

pub use parser::{product_token, ParsedRobots};

use crate::url::robots_url;
use async_trait::async_trait;
use reqwest::Client;

/// Something that can retrieve the robots.txt body of a domain
#[async_trait]
pub trait RobotsSource: Send + Sync {
    /// Returns the robots.txt body for `domain`, or `None` if it is unavailable
    async fn fetch_robots(&self, domain: &str) -> Option<String>;
}

/// Retrieves robots.txt over HTTP from the domain's well-known location
///
/// Every non-2xx answer is reported as unavailable, including 401 and 403, so a
/// domain that refuses access to its robots.txt is crawled as if it had none.
pub struct HttpRobotsSource {
    client: Client,
    scheme: String,
}

impl HttpRobotsSource {
    /// Creates a source that requests `https://{domain}/robots.txt`
    pub fn new(client: Client) -> Self {
        Self {
            client,
            scheme: "https".to_string(),
        }
    }

    /// Overrides the scheme robots.txt is requested over
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }
}

#[async_trait]
impl RobotsSource for HttpRobotsSource {
    async fn fetch_robots(&self, domain: &str) -> Option<String> {
        let url = robots_url(&self.scheme, domain);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("robots.txt request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("robots.txt at {} returned HTTP {}", url, status.as_u16());
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!("Failed to read robots.txt body from {}: {}", url, e);
                None
            }
        }
    }
}

/// Loads the robots policy of a domain, falling back to allow-all
///
/// # Arguments
///
/// * `source` - Where to retrieve robots.txt from
/// * `domain` - The `host[:port]` authority
pub async fn load_robots(source: &dyn RobotsSource, domain: &str) -> ParsedRobots {
    match source.fetch_robots(domain).await {
        Some(body) => ParsedRobots::from_content(&body),
        None => {
            tracing::debug!("No robots.txt for {}, allowing all paths", domain);
            ParsedRobots::allow_all()
        }
    }
}
