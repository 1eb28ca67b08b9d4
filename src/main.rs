//! # Berita Crawler
//!
//! Crawls Indonesian news sites for articles matching a keyword, scores how
//! relevant each article is, and exports a deduplicated dataset.
//!
//! ## Features
//!
//! - Searches Detik, CNN Indonesia, Liputan6 and Suara, in that order
//! - Normalizes Indonesian date strings and filters by minimum year
//! - Scores relevance (Low / Medium / High) and extracts keyword sentences
//! - Writes CSV (default) or JSON result files
//! - Ctrl-C stops the crawl cooperatively and still saves what was collected
//!
//! ## Usage
//!
//! ```sh
//! berita_crawler -k "korupsi" -y 2022 -n 100 -o ./hasil
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: Page through each site's search results
//! 2. **Filtering**: Normalize dates, drop old and already-seen articles
//! 3. **Detail**: Fetch and clean each article body, score it
//! 4. **Output**: Hand the collected records to the CSV/JSON writer

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod crawler;
mod dates;
mod error;
mod fetch;
mod models;
mod outputs;
mod relevance;
mod scrapers;
mod utils;

use cli::Cli;
use config::{CrawlConfig, Settings};
use crawler::{CancelFlag, CrawlEvent, CrawlPolicy, Crawler};
use fetch::HttpFetcher;
use utils::ensure_writable_dir;

/// Merge the optional settings file with command-line overrides.
async fn load_settings(args: &Cli) -> Result<Settings, Box<dyn Error>> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path).await?,
        None => Settings::default(),
    };
    if let Some(sites) = &args.sites {
        settings.sites = sites.clone();
    }
    if let Some(ms) = args.delay_min_ms {
        settings.delay_min_ms = ms;
    }
    if let Some(ms) = args.delay_max_ms {
        settings.delay_max_ms = ms;
        // A lone upper bound below the default lower bound lowers both.
        if args.delay_min_ms.is_none() && settings.delay_min_ms > ms {
            settings.delay_min_ms = ms;
        }
    }
    settings.validate()?;
    Ok(settings)
}

/// Cancel the crawl on the first interrupt.
///
/// `next_interrupt` resolves to `true` when an interrupt arrives and `false`
/// when no more can be received. Returns `true` if a second interrupt
/// arrived, meaning the caller should exit immediately.
async fn watch_interrupts<F, Fut>(mut next_interrupt: F, cancel: CancelFlag) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    if !next_interrupt().await {
        return false;
    }
    warn!("Interrupt received; stopping after the current request");
    println!("Stopping after the current request... (press Ctrl-C again to quit now)");
    cancel.cancel();

    next_interrupt().await
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("berita_crawler starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = load_settings(&args).await?;
    let config = CrawlConfig::new(&args.keyword, args.min_year, args.target, &args.output_dir)?;

    // Early check: fail before crawling rather than after
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let adapters = scrapers::adapters_for(&settings.sites)?;
    let fetcher = HttpFetcher::new(&settings)?;
    let cancel = CancelFlag::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    info!(sites = ?settings.sites, keyword = %config.keyword, "Starting crawl");
    let mut crawler = Crawler::new(fetcher, adapters, CrawlPolicy::from(&settings), cancel.clone(), tx);
    let run_config = config.clone();
    let handle = tokio::spawn(async move {
        let outcome = crawler.run(&run_config).await;
        debug!(status = %crawler.status(), "Crawler stopped");
        outcome
    });

    let ctrl_c_flag = cancel.clone();
    tokio::spawn(async move {
        let next_ctrl_c = || async { tokio::signal::ctrl_c().await.is_ok() };
        if watch_interrupts(next_ctrl_c, ctrl_c_flag).await {
            error!("Second interrupt received; exiting without saving");
            std::process::exit(130);
        }
    });

    // The channel closes when the crawl task drops its sender.
    while let Some(event) = rx.recv().await {
        match event {
            CrawlEvent::Log(line) => println!("{line}"),
            CrawlEvent::Progress(n) => println!("    Progress: {n}/{}", config.target_count),
            CrawlEvent::Finished { status, collected } => {
                info!(%status, collected, "Crawl task finished")
            }
        }
    }

    let outcome = handle.await?;

    if outcome.is_empty() {
        println!("\nNo articles were collected.");
        info!(status = %outcome.status, "No results to write");
    } else {
        match outputs::persist(args.format, &outcome.records, &config.output_dir, &config.keyword).await {
            Ok(path) => {
                println!("\nSaved {} articles to {}", outcome.records.len(), path.display());
                info!(path = %path.display(), count = outcome.records.len(), "Results written");
            }
            Err(e) => {
                println!("\nFailed to save results: {e}");
                error!(error = %e, "Failed to write results");
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        status = %outcome.status,
        finished_at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        "Execution complete"
    );

    Ok(())
}
