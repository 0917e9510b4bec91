//! URL handling module for Sumi-Crawl
//!
//! This module resolves the domain (network authority) of a URL, which is the key
//! for per-domain rate limiting and robots.txt caching.
//!
//! URL identity elsewhere in the crawler is exact string equality: no trailing
//! slash, query ordering or fragment normalization is applied.

mod domain;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_domain;

/// Parses a URL string and returns its domain
///
/// # Arguments
///
/// * `url` - The absolute URL string
///
/// # Returns
///
/// * `Ok(String)` - The lowercase `host[:port]` authority
/// * `Err(UrlError)` - The URL could not be parsed or has no host
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::domain_of;
///
/// assert_eq!(domain_of("https://Example.com/a").unwrap(), "example.com");
/// assert_eq!(domain_of("http://127.0.0.1:8080/").unwrap(), "127.0.0.1:8080");
/// assert!(domain_of("not a url").is_err());
/// ```
pub fn domain_of(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;
    extract_domain(&parsed).ok_or_else(|| UrlError::MissingDomain(url.to_string()))
}

/// Builds the well-known robots.txt location for a domain
///
/// # Arguments
///
/// * `scheme` - Scheme to request it over (normally `https`)
/// * `domain` - The `host[:port]` authority
pub fn robots_url(scheme: &str, domain: &str) -> String {
    format!("{}://{}/robots.txt", scheme, domain)
}
