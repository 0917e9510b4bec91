//! Markdown report generation
//!
//! Writes a human-readable summary of a crawl: run statistics followed by the
//! list of fetched pages with a short excerpt of each.

use crate::output::CrawlReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Characters of page content shown per page
const EXCERPT_CHARS: usize = 200;

/// Writes a markdown report of a crawl to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(io::Error)` - Failed to create or write the file
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let stats = &report.stats;
    let mut md = String::new();

    md.push_str("# Sumi-Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        stats.elapsed.as_secs_f64()
    ));
    md.push_str(&format!("- **Stop Reason**: {}\n\n", stats.stop_reason));

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Attempted | {} |\n", stats.pages_attempted));
    md.push_str(&format!("| Fetched | {} |\n", stats.pages_fetched));
    md.push_str(&format!("| Disallowed | {} |\n", stats.pages_disallowed));
    md.push_str(&format!("| Fetch Failures | {} |\n", stats.fetch_failures));
    md.push_str(&format!("| Links Discovered | {} |\n", stats.links_discovered));
    md.push_str(&format!("| Links Enqueued | {} |\n", stats.links_enqueued));
    md.push_str(&format!("| Domains Contacted | {} |\n", stats.domains_contacted));
    md.push_str(&format!("| Pending At Stop | {} |\n\n", stats.pending_at_stop));

    md.push_str("## Pages\n\n");
    if report.records.is_empty() {
        md.push_str("_No pages were fetched._\n");
    }

    for (index, record) in report.records.iter().enumerate() {
        let title = if record.title.is_empty() {
            "(untitled)"
        } else {
            record.title.as_str()
        };
        md.push_str(&format!("### {}. {}\n\n", index + 1, escape_markdown(title)));
        md.push_str(&format!("<{}>\n\n", record.url));

        let excerpt = excerpt(&record.content, EXCERPT_CHARS);
        if !excerpt.is_empty() {
            for line in excerpt.lines() {
                md.push_str(&format!("> {}\n", line));
            }
            md.push('\n');
        }
    }

    md
}

/// First `max_chars` characters of `text`, with an ellipsis if truncated
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '[' | ']' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
