//! Sumi-Crawl main entry point
//!
//! This is the command-line interface for the Sumi-Crawl polite web crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use sumi_crawl::config::{load_config_with_hash, validate, Config};
use sumi_crawl::output::{excerpt, generate_markdown_report, print_statistics};
use sumi_crawl::{CrawlOrchestrator, CrawlReport};
use tracing_subscriber::EnvFilter;

/// Characters of page content printed per page
const PREVIEW_CHARS: usize = 200;

/// Sumi-Crawl: A bounded, polite web crawler
///
/// Sumi-Crawl visits pages breadth-first from the given seeds while respecting
/// robots.txt and a minimum delay between requests to the same domain, and
/// prints the title and main text of every page it fetched.
#[derive(Parser, Debug)]
#[command(name = "sumi-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, polite web crawler", long_about = None)]
struct Cli {
    /// Seed URLs to start from (added to any seeds in the config file)
    #[arg(value_name = "SEEDS")]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth from a seed
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Minimum seconds between requests to the same domain
    #[arg(long, value_name = "SECONDS")]
    min_delay: Option<f64>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Wall-clock budget for the whole crawl, in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// User agent sent with requests and matched against robots.txt
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Print page records as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write a markdown report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = handle_crawl(&config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.records)?);
    } else {
        print_records(&report);
        println!();
        print_statistics(&report.stats);
    }

    if let Some(path) = &cli.report {
        generate_markdown_report(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_crawl=info,warn"),
            1 => EnvFilter::new("sumi_crawl=debug,info"),
            2 => EnvFilter::new("sumi_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Layers command-line flags over the file (or default) configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    config.crawler.seeds.extend(cli.seeds.iter().cloned());

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(min_delay) = cli.min_delay {
        config.crawler.min_delay = min_delay;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout = timeout;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.fetcher.user_agent = user_agent.clone();
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Min delay per domain: {}s", config.crawler.min_delay);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Timeout: {}s", config.crawler.timeout);
    println!(
        "  Respect robots.txt Crawl-delay: {}",
        config.crawler.respect_crawl_delay
    );

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Request timeout: {}s", config.fetcher.request_timeout);
    println!("  robots.txt scheme: {}", config.fetcher.robots_scheme);

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// Ctrl-C stops the crawl after the current page; records gathered so far are kept.
async fn handle_crawl(config: &Config) -> anyhow::Result<CrawlReport> {
    tracing::info!("Total seed URLs: {}", config.crawler.seeds.len());

    let mut orchestrator =
        CrawlOrchestrator::from_config(config).context("Failed to set up crawler")?;

    let interrupt = orchestrator.interrupt_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            interrupt.store(true, Ordering::SeqCst);
        }
    });

    match orchestrator.run().await {
        Ok(report) => {
            tracing::info!("Crawl completed: {} pages", report.records.len());
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Prints each record as `url -> title` followed by a content preview
fn print_records(report: &CrawlReport) {
    for record in &report.records {
        println!("{} -> {}", record.url, record.title);
        println!("{}", excerpt(&record.content, PREVIEW_CHARS));
        println!();
    }
}
