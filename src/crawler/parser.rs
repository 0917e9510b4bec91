//! HTML parser for extracting links and page data
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from `<a href>` tags), resolved to absolute URLs
//! - A page record: title plus the page's main text

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Data extracted from one fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The URL the page was requested as
    pub url: String,

    /// Trimmed `<title>` text, or empty
    pub title: String,

    /// Best-effort main text of the page
    pub content: String,
}

/// Extracts links and page data from markup
pub trait PageParser: Send + Sync {
    /// Returns every followable link on the page as an absolute URL
    fn extract_links(&self, base_url: &str, html: &str) -> Vec<String>;

    /// Returns the page's title and main content
    fn extract_data(&self, url: &str, html: &str) -> PageRecord;
}

/// scraper-based HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl PageParser for HtmlParser {
    fn extract_links(&self, base_url: &str, html: &str) -> Vec<String> {
        let Ok(base_url) = Url::parse(base_url) else {
            tracing::debug!("Cannot resolve links against invalid base URL {}", base_url);
            return Vec::new();
        };
        extract_links(&Html::parse_document(html), &base_url)
    }

    fn extract_data(&self, url: &str, html: &str) -> PageRecord {
        let document = Html::parse_document(html);
        PageRecord {
            url: url.to_string(),
            title: extract_title(&document).unwrap_or_default(),
            content: extract_content(&document),
        }
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the main text of the page
///
/// Tries, in order: the first `<article>`, the first `<main>`, the text of every
/// `<p>` (one line each), then the text of the whole document.
fn extract_content(document: &Html) -> String {
    for container in ["article", "main"] {
        if let Some(element) = select_first(document, container) {
            return block_text(element);
        }
    }

    if let Ok(p_selector) = Selector::parse("p") {
        let paragraphs: Vec<String> = document
            .select(&p_selector)
            .map(|p| p.text().map(str::trim).collect::<String>())
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join("\n");
        }
    }

    block_text(document.root_element())
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Text fragments of an element, each trimmed, blanks dropped, one per line
fn block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
