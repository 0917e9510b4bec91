use url::Url;

/// Extracts the domain from a URL
///
/// The domain is the network authority: the lowercase host, followed by `:port`
/// when the URL names a non-default port. Two servers on the same host but
/// different ports are therefore paced and robots-checked independently.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase `host[:port]`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_crawl::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://example.com:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com:8443".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
