//! Image-Sweep main entry point
//!
//! This is the command-line interface for the Image-Sweep site image harvester.

use anyhow::Context;
use clap::Parser;
use image_sweep::config::{load_config, validate, Config};
use image_sweep::pipeline::{self, default_output_dir, RunSummary};
use image_sweep::url::parse_start_url;
use image_sweep::{Fetcher, Progress};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Capacity of the progress channel between the download pool and the reporter
const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Image-Sweep: a site image harvester
///
/// Image-Sweep scans a page (or crawls a site) for images referenced from
/// HTML and CSS, downloads them concurrently and packages the result as a
/// manifest plus a zip archive.
#[derive(Parser, Debug)]
#[command(name = "image-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A site image harvester", long_about = None)]
struct Cli {
    /// Start URL; `https://` is assumed when no scheme is given
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (default: images_<host>_<timestamp>)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Follow same-site links from the start page
    #[arg(long)]
    crawl: bool,

    /// Maximum number of pages to visit when crawling
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of concurrent downloads
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Skip creating the zip archive
    #[arg(long)]
    no_zip: bool,

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
    let start = parse_start_url(&cli.url).context("Invalid start URL")?;

    let out_dir = match (&cli.out, &config.output.directory) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => PathBuf::from(dir),
        (None, None) => default_output_dir(&start, chrono::Local::now()),
    };

    tracing::info!("Start URL: {}", start);
    tracing::info!("Output directory: {}", out_dir.display());
    if config.crawler.enabled {
        tracing::info!("Crawling up to {} pages", config.crawler.max_pages);
    }

    let fetcher = Fetcher::new().context("Failed to build HTTP client")?;

    let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
    let reporter = tokio::spawn(report_progress(progress_rx, cli.quiet));

    let result = pipeline::run(
        &fetcher,
        start.as_str(),
        &config,
        &out_dir,
        Some(progress_tx),
    )
    .await;

    // The sender was moved into the pipeline, so the reporter ends once it is dropped
    if let Err(e) = reporter.await {
        tracing::warn!("Progress reporter stopped unexpectedly: {}", e);
    }

    let summary = result.context("Image sweep failed")?;
    if !cli.quiet {
        print_summary(&summary);
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
            0 => EnvFilter::new("image_sweep=info,warn"),
            1 => EnvFilter::new("image_sweep=debug,info"),
            2 => EnvFilter::new("image_sweep=trace,debug"),
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

/// Loads the optional config file, then applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    if cli.crawl {
        config.crawler.enabled = true;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(workers) = cli.workers {
        config.downloader.max_workers = workers;
    }
    if cli.no_zip {
        config.output.archive = false;
    }

    validate(&config).context("Invalid options")?;
    Ok(config)
}

/// Drains progress events until the pool drops its sender
async fn report_progress(mut rx: mpsc::Receiver<Progress>, quiet: bool) {
    while let Some(progress) = rx.recv().await {
        if !quiet {
            println!(
                "Progress: {}/{} ({:.0}%)",
                progress.completed,
                progress.total,
                progress.fraction() * 100.0
            );
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== Image Sweep Complete ===\n");
    println!("Pages scanned:   {}", summary.pages.len());
    println!("Images found:    {}", summary.images_found);
    println!("Data URLs:       {}", summary.data_urls);
    println!("Downloaded:      {}", summary.downloaded);
    println!("Failed:          {}", summary.failed);
    println!("Output:          {}", summary.output_dir.display());

    if let Some(path) = &summary.manifest_path {
        println!("Manifest:        {}", path.display());
    }
    if let Some(path) = &summary.archive_path {
        println!("Archive:         {}", path.display());
    }
    for error in &summary.packaging_errors {
        println!("✗ {}", error);
    }
}
