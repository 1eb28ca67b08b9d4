//! Command-line interface definitions.
//!
//! The CLI collects the run parameters ([`crate::config::CrawlConfig`]) and
//! optional overrides for the YAML settings file.

use crate::config::MAX_TARGET;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output file format for the collected records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Collect 50 articles about "korupsi" published in 2020 or later
/// berita_crawler -k korupsi
///
/// # Only Detik and Suara, no politeness delay, JSON output
/// berita_crawler -k banjir -n 10 --sites detik,suara --delay-max-ms 0 --format json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Keyword to search for
    #[arg(short, long)]
    pub keyword: String,

    /// Skip articles published before this year
    #[arg(short = 'y', long, default_value_t = 2020)]
    pub min_year: i32,

    /// Number of articles to collect
    #[arg(short = 'n', long, default_value_t = 50, value_parser = parse_target)]
    pub target: usize,

    /// Directory the result file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Result file format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Comma-separated sites to crawl, in priority order
    #[arg(long, value_delimiter = ',')]
    pub sites: Option<Vec<String>>,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lower bound of the randomized delay between articles
    #[arg(long)]
    pub delay_min_ms: Option<u64>,

    /// Upper bound of the randomized delay between articles
    #[arg(long)]
    pub delay_max_ms: Option<u64>,
}

fn parse_target(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (1..=MAX_TARGET).contains(&n) {
        Ok(n)
    } else {
        Err(format!("target must be between 1 and {MAX_TARGET}"))
    }
}
