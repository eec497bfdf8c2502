//! Sumi-Scrape main entry point
//!
//! This is the command-line interface for the Sumi-Scrape batch page scraper.

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_scrape::config::{load_config_with_hash, validate, ScrapeConfig};
use sumi_scrape::output::{
    print_statistics, print_summary, write_results_to_file, OutputFormat, RunStatistics,
};
use sumi_scrape::url::read_url_list;
use sumi_scrape::{Orchestrator, Selector, SelectorExtractor};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Scrape: A polite batch page scraper
///
/// Sumi-Scrape fetches a list of pages under a concurrency limit, spaces
/// requests per host or globally, retries failures with exponential backoff,
/// optionally honours robots.txt, and extracts fields with CSS selectors.
#[derive(Parser, Debug)]
#[command(name = "sumi-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A polite batch page scraper", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "urls_file"])))]
struct Cli {
    /// URL to scrape (repeatable)
    #[arg(long, value_name = "URL")]
    url: Vec<String>,

    /// File with one URL per line (blank lines and # comments are skipped)
    #[arg(long, value_name = "PATH")]
    urls_file: Option<PathBuf>,

    /// Extraction rule as name=css[@attr] (repeatable)
    #[arg(short, long, value_name = "RULE")]
    selector: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of pages fetched at once
    #[arg(long)]
    concurrency: Option<u32>,

    /// Minimum seconds between requests to one scope (0 disables)
    #[arg(long)]
    delay: Option<f64>,

    /// Space requests per host instead of globally
    #[arg(long)]
    per_host: bool,

    /// Attempts per URL, including the first
    #[arg(long)]
    retries: Option<u32>,

    /// Timeout for a single attempt, in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Check robots.txt before fetching
    #[arg(long)]
    respect_robots: bool,

    /// User-Agent header for pages and robots.txt
    #[arg(long)]
    user_agent: Option<String>,

    /// Write results to this file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Format of the results file
    #[arg(long, value_enum)]
    output_format: Option<OutputFormat>,

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

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let urls = load_urls(&cli)?;
    if urls.is_empty() {
        bail!("no URLs to scrape");
    }

    let extractor =
        SelectorExtractor::new(&config.selectors).context("Failed to compile selectors")?;
    let columns = extractor.field_names();

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let orchestrator = Orchestrator::new(&config.fetch, Arc::new(extractor))
        .context("Failed to set up the HTTP client")?
        .with_cancellation(cancel);

    let results = orchestrator.run(&urls).await;

    if !cli.quiet {
        print_summary(&results);
        print_statistics(&RunStatistics::from_results(&results));
    }

    if let Some(path) = &config.output.path {
        write_results_to_file(Path::new(path), config.output.format, columns, &results)
            .with_context(|| format!("Failed to write results to {}", path))?;
        tracing::info!("Wrote {} results to {} ({})", results.len(), path, config.output.format);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scrape=info,warn"),
            1 => EnvFilter::new("sumi_scrape=debug,info"),
            2 => EnvFilter::new("sumi_scrape=trace,debug"),
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

/// Loads the config file (if any) and layers command-line flags on top
fn build_config(cli: &Cli) -> anyhow::Result<ScrapeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => ScrapeConfig::default(),
    };

    let fetch = &mut config.fetch;
    if let Some(concurrency) = cli.concurrency {
        fetch.concurrency = concurrency;
    }
    if let Some(delay) = cli.delay {
        fetch.delay = delay;
    }
    if let Some(retries) = cli.retries {
        fetch.retries = retries;
    }
    if let Some(timeout) = cli.timeout {
        fetch.timeout_per_attempt = timeout;
    }
    if let Some(user_agent) = &cli.user_agent {
        fetch.user_agent = user_agent.clone();
    }
    fetch.per_host |= cli.per_host;
    fetch.respect_robots |= cli.respect_robots;

    if !cli.selector.is_empty() {
        config.selectors = cli
            .selector
            .iter()
            .map(|arg| Selector::parse_arg(arg))
            .collect::<Result<_, _>>()?;
    }

    if let Some(path) = &cli.output {
        config.output.path = Some(path.display().to_string());
    }
    if let Some(format) = cli.output_format {
        config.output.format = format;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Collects the URL list from `--url` flags or `--urls-file`
fn load_urls(cli: &Cli) -> anyhow::Result<Vec<String>> {
    match &cli.urls_file {
        Some(path) => read_url_list(path)
            .with_context(|| format!("Failed to read URL list {}", path.display())),
        None => Ok(cli.url.clone()),
    }
}

/// Cancels `token` on Ctrl-C; unfinished URLs are then reported as cancelled
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling remaining URLs");
            token.cancel();
        }
    });
}
