//! Robots.txt rule matching
//!
//! Allow/Disallow matching is delegated to the robotstxt crate; `Crawl-delay`, which
//! that crate does not expose, is read directly from the grouped directives.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
///
/// Either the raw rules of a domain or the permissive default that is installed
/// whenever a domain's robots.txt cannot be retrieved.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    /// Whether every path is allowed regardless of content
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when robots.txt is missing, unreachable, or unreadable.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns true if this is the permissive default
    pub fn is_allow_all(&self) -> bool {
        self.allow_all
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL (or path) to check
    /// * `user_agent` - The user agent string; only its product token is matched
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, product_token(user_agent), url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group naming the agent's product token wins over the `*` group. Consecutive
    /// `User-agent` lines share one group; any other directive closes the list of agents.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no applicable crawl delay is specified
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.allow_all {
            return None;
        }

        let agent = product_token(user_agent).to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut group_closed = false;
        let mut specific: Option<f64> = None;
        let mut wildcard: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    if group_closed {
                        group.clear();
                        group_closed = false;
                    }
                    group.push(product_token(value).to_lowercase());
                }
                "crawl-delay" => {
                    group_closed = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if !delay.is_finite() || delay < 0.0 {
                        continue;
                    }

                    let names_agent = group
                        .iter()
                        .any(|ua| ua != "*" && !ua.is_empty() && *ua == agent);
                    if names_agent {
                        specific.get_or_insert(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        wildcard.get_or_insert(delay);
                    }
                }
                _ => group_closed = true,
            }
        }

        specific.or(wildcard)
    }
}

/// The product token of a user agent: everything before the first `/` or whitespace
///
/// `MyCrawler/1.0 (+https://example.com/bot)` matches robots.txt groups as `MyCrawler`.
pub fn product_token(user_agent: &str) -> &str {
    let user_agent = user_agent.trim();
    user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or(user_agent)
}
