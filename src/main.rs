//! wavecrawl main entry point
//!
//! This is the command-line interface for the wavecrawl breadth-first crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wavecrawl::config::{load_config, validate, Config};
use wavecrawl::output::{print_summary, write_markdown_summary};
use wavecrawl::{extract_host, HostFilter, HttpDownloader, WebCrawler};

/// wavecrawl: a concurrent, depth-bounded web crawler
///
/// wavecrawl downloads pages breadth-first from a seed URL, following links
/// for a fixed number of levels while bounding the number of parallel
/// downloads, link extractions and requests per host.
#[derive(Parser, Debug)]
#[command(name = "wavecrawl")]
#[command(version)]
#[command(about = "A concurrent, depth-bounded web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Number of breadth-first levels to download
    #[arg(value_name = "DEPTH")]
    depth: Option<u32>,

    /// Number of parallel downloads
    #[arg(value_name = "DOWNLOADERS")]
    downloaders: Option<usize>,

    /// Number of parallel link extractions
    #[arg(value_name = "EXTRACTORS")]
    extractors: Option<usize>,

    /// Maximum number of parallel downloads per host
    #[arg(value_name = "PER_HOST")]
    per_host: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only report URLs on this host (repeatable)
    #[arg(long = "host", value_name = "HOST")]
    hosts: Vec<String>,

    /// Write a markdown summary to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

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

    let config = resolve_config(&cli)?;

    extract_host(&cli.url).with_context(|| format!("Invalid seed URL: {}", cli.url))?;

    let filter = if config.hosts.allow.is_empty() {
        HostFilter::Any
    } else {
        tracing::info!("Reporting only hosts: {}", config.hosts.allow.join(", "));
        HostFilter::allow(&config.hosts.allow)
    };

    let downloader = HttpDownloader::new(&config.user_agent)
        .context("Failed to build HTTP client")?;
    let crawler = WebCrawler::from_config(Arc::new(downloader), &config.crawler)?;

    let outcome = crawler.crawl(&cli.url, config.crawler.depth, filter).await;
    crawler.close();

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_summary(&result);
    }

    if let Some(path) = &cli.summary {
        write_markdown_summary(&result, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to: {}", path.display());
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
            0 => EnvFilter::new("wavecrawl=info,warn"),
            1 => EnvFilter::new("wavecrawl=debug,info"),
            2 => EnvFilter::new("wavecrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.depth = depth;
    }
    if let Some(downloaders) = cli.downloaders {
        config.crawler.downloaders = downloaders;
    }
    if let Some(extractors) = cli.extractors {
        config.crawler.extractors = extractors;
    }
    if let Some(per_host) = cli.per_host {
        config.crawler.per_host = per_host;
    }
    config.hosts.allow.extend(cli.hosts.iter().cloned());

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}
