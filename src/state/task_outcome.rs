use crate::crawler::PageRecord;
use std::fmt;

/// Outcome of processing a single crawl task
///
/// Every task pulled from the frontier ends in exactly one of these. None of them is
/// an error: disallowed and failed URLs stay visited and are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Page was fetched and parsed
    Fetched {
        /// The extracted page data
        record: PageRecord,
        /// Links found on the page
        links_found: usize,
        /// Links the frontier accepted
        links_enqueued: usize,
    },

    /// robots.txt does not allow the crawler to fetch this URL
    Disallowed,

    /// Fetch returned nothing (bad status, non-HTML, network error or timeout)
    FetchFailed,
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched { .. } => write!(f, "fetched"),
            Self::Disallowed => write!(f, "disallowed"),
            Self::FetchFailed => write!(f, "fetch_failed"),
        }
    }
}
