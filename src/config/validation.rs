use crate::config::types::{Config, CrawlerConfig, FetcherConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    Ok(())
}

/// Validates crawler configuration
///
/// An empty seed list is valid: the crawl simply returns no pages.
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    for seed in &config.seeds {
        validate_seed(seed)?;
    }

    validate_seconds("min-delay", config.min_delay)?;
    validate_seconds("timeout", config.timeout)?;

    Ok(())
}

/// Validates fetcher configuration
pub fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    validate_seconds("request-timeout", config.request_timeout)?;
    if config.request_timeout == 0.0 {
        return Err(ConfigError::Validation(
            "request-timeout must be greater than zero".to_string(),
        ));
    }

    if config.robots_scheme != "http" && config.robots_scheme != "https" {
        return Err(ConfigError::Validation(format!(
            "robots-scheme must be 'http' or 'https', got '{}'",
            config.robots_scheme
        )));
    }

    Ok(())
}

/// Seeds must be absolute http(s) URLs with a host
fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_seed() {
        assert!(validate_seed("https://example.com").is_ok());
        assert!(validate_seed("http://127.0.0.1:8080/start").is_ok());

        assert!(validate_seed("").is_err());
        assert!(validate_seed("example.com").is_err());
        assert!(validate_seed("ftp://example.com/").is_err());
        assert!(validate_seed("mailto:user@example.com").is_err());
    }

    #[test]
    fn test_validate_seconds() {
        assert!(validate_seconds("timeout", 0.0).is_ok());
        assert!(validate_seconds("timeout", 1.5).is_ok());

        assert!(validate_seconds("timeout", -0.1).is_err());
        assert!(validate_seconds("timeout", f64::NAN).is_err());
        assert!(validate_seconds("timeout", f64::INFINITY).is_err());
    }

    #[test]
    fn test_zero_budgets_are_valid() {
        let crawler = CrawlerConfig {
            seeds: vec!["https://a.test".to_string()],
            max_pages: 0,
            timeout: 0.0,
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&crawler).is_ok());
    }

    #[test]
    fn test_validate_fetcher_config() {
        assert!(validate_fetcher_config(&FetcherConfig::default()).is_ok());

        let empty_agent = FetcherConfig {
            user_agent: "  ".to_string(),
            ..FetcherConfig::default()
        };
        assert!(validate_fetcher_config(&empty_agent).is_err());

        let zero_timeout = FetcherConfig {
            request_timeout: 0.0,
            ..FetcherConfig::default()
        };
        assert!(validate_fetcher_config(&zero_timeout).is_err());

        let bad_scheme = FetcherConfig {
            robots_scheme: "gopher".to_string(),
            ..FetcherConfig::default()
        };
        assert!(validate_fetcher_config(&bad_scheme).is_err());
    }
}
