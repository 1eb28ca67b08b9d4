//! Site-agnostic crawl loop.
//!
//! A [`Crawler`] walks its adapters in priority order and pages through each
//! one's search results. For every listed article it normalizes the date,
//! applies the year filter and URL dedup, fetches the detail page, and turns
//! bodies that pass the length check into [`ArticleRecord`]s.
//!
//! The run is strictly sequential: one request in flight at a time, with a
//! randomized pause after each collected article. Failures never end the
//! run. A failed listing fetch counts as an empty page, a failed detail
//! fetch skips that article, and a site is abandoned after
//! [`CrawlPolicy::max_empty_pages`] consecutive pages that yield nothing new.
//!
//! # Events
//!
//! Progress is pushed to the caller as [`CrawlEvent`]s over an unbounded
//! channel, so the crawl task never blocks on its consumer.
//!
//! # Cancellation
//!
//! [`CancelFlag`] is polled before every listing fetch and before every
//! detail fetch. Requests already in flight are allowed to finish.

use crate::config::{CrawlConfig, Settings};
use crate::dates;
use crate::fetch::Fetcher;
use crate::models::{ArticleRecord, ArticleStub};
use crate::relevance;
use crate::scrapers::SiteAdapter;
use crate::utils::{truncate_chars, truncate_for_log};
use rand::{Rng, rng};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a crawl run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CrawlStatus::Idle => "idle",
            CrawlStatus::Running => "running",
            CrawlStatus::Completed => "completed",
            CrawlStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Notifications sent from the crawl task to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// Human-readable narration line.
    Log(String),
    /// Number of records collected so far. Increases by one per record.
    Progress(usize),
    /// Sent once when the run ends.
    Finished { status: CrawlStatus, collected: usize },
}

/// Cooperative stop signal shared between the caller and the crawl task.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Randomized politeness delay between article fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Pacing {
    fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng().random_range(min..=max))
    }
}

/// Stopping and filtering rules of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlPolicy {
    pub pacing: Pacing,
    pub max_empty_pages: u32,
    pub min_content_chars: usize,
    pub full_text_cap: usize,
}

impl From<&Settings> for CrawlPolicy {
    fn from(settings: &Settings) -> Self {
        let (min, max) = settings.delay_range();
        Self {
            pacing: Pacing { min, max },
            max_empty_pages: settings.max_empty_pages,
            min_content_chars: settings.min_content_chars,
            full_text_cap: settings.full_text_cap,
        }
    }
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        CrawlPolicy::from(&Settings::default())
    }
}

/// What a finished run hands back: the terminal status and every record
/// collected, including those gathered before a cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub status: CrawlStatus,
    pub records: Vec<ArticleRecord>,
}

impl RunOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Mutable bookkeeping of one run. Discarded when the run ends.
#[derive(Debug, Default)]
struct RunState {
    records: Vec<ArticleRecord>,
    seen_urls: HashSet<String>,
    consecutive_empty_pages: u32,
    /// Set once the cancel flag is observed before the target was met.
    interrupted: bool,
}

impl RunState {
    fn collected(&self) -> usize {
        self.records.len()
    }
}

/// Result of processing one stub.
enum StubOutcome {
    Added,
    Skipped,
}

/// Drives adapters through pagination, filtering and scoring.
pub struct Crawler<F> {
    fetcher: F,
    adapters: Vec<Box<dyn SiteAdapter>>,
    policy: CrawlPolicy,
    cancel: CancelFlag,
    events: UnboundedSender<CrawlEvent>,
    status: CrawlStatus,
}

impl<F: Fetcher> Crawler<F> {
    /// Create an idle crawler.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of listing and detail markup.
    /// * `adapters` - Sites to crawl, in visiting order.
    /// * `policy` - Pacing and filtering thresholds.
    /// * `cancel` - Flag polled before every new request.
    /// * `events` - Receives log, progress and finish events. A closed
    ///   receiver does not affect the run.
    pub fn new(
        fetcher: F,
        adapters: Vec<Box<dyn SiteAdapter>>,
        policy: CrawlPolicy,
        cancel: CancelFlag,
        events: UnboundedSender<CrawlEvent>,
    ) -> Self {
        Self {
            fetcher,
            adapters,
            policy,
            cancel,
            events,
            status: CrawlStatus::Idle,
        }
    }

    pub fn status(&self) -> CrawlStatus {
        self.status
    }

    fn emit(&self, event: CrawlEvent) {
        // A dropped receiver only means nobody is watching any more.
        let _ = self.events.send(event);
    }

    fn log(&self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "crawl_log", "{line}");
        self.emit(CrawlEvent::Log(line));
    }

    /// Whether the run must stop before starting more work.
    ///
    /// Reaching the target takes precedence over the cancel flag, so a run
    /// that fills its target while a cancellation is pending still completes.
    fn should_stop(&self, config: &CrawlConfig, state: &mut RunState) -> bool {
        if state.collected() >= config.target_count {
            return true;
        }
        if self.cancel.is_cancelled() {
            state.interrupted = true;
            return true;
        }
        false
    }

    /// Run the crawl to completion or cancellation.
    ///
    /// # Returns
    ///
    /// The collected records and the final status. Records gathered before
    /// a cancellation are kept.
    #[instrument(level = "info", skip_all, fields(keyword = %config.keyword, target = config.target_count))]
    pub async fn run(&mut self, config: &CrawlConfig) -> RunOutcome {
        self.status = CrawlStatus::Running;
        let mut state = RunState::default();

        self.log(format!("=== Crawling for '{}' ===", config.keyword));
        self.log(format!(
            "Target: {} articles | Minimum year: {}",
            config.target_count, config.min_year
        ));

        for index in 0..self.adapters.len() {
            if self.should_stop(config, &mut state) {
                break;
            }
            self.crawl_site(index, config, &mut state).await;
        }

        self.status = if state.interrupted {
            CrawlStatus::Cancelled
        } else {
            CrawlStatus::Completed
        };

        let collected = state.collected();
        match self.status {
            CrawlStatus::Cancelled => self.log(format!("Crawl cancelled with {collected} articles collected")),
            _ => self.log(format!("Crawl finished with {collected} articles collected")),
        }
        info!(status = %self.status, collected, "Crawl run ended");
        self.emit(CrawlEvent::Finished {
            status: self.status,
            collected,
        });

        RunOutcome {
            status: self.status,
            records: state.records,
        }
    }

    #[instrument(level = "info", skip_all, fields(site = self.adapters[index].name()))]
    async fn crawl_site(&self, index: usize, config: &CrawlConfig, state: &mut RunState) {
        let adapter = self.adapters[index].as_ref();
        self.log(format!("---> Crawling {}", adapter.name()));
        state.consecutive_empty_pages = 0;
        let mut page: u32 = 1;

        loop {
            // Exhaustion is checked first so a pending cancel does not mask it.
            if state.consecutive_empty_pages >= self.policy.max_empty_pages {
                self.log(format!(
                    "    [STOP] Too many empty pages on {}",
                    adapter.name()
                ));
                info!(page, "Site exhausted");
                return;
            }
            if self.should_stop(config, state) {
                return;
            }

            let url = adapter.listing_url(&config.keyword, page);
            let stubs = match self.fetcher.fetch(&url).await {
                Ok(markup) => adapter.parse_listing(&markup),
                Err(e) => {
                    warn!(page, %url, error = %e, "Listing fetch failed");
                    self.log(format!("    [ERR] Listing page {page} failed: {e}"));
                    state.consecutive_empty_pages += 1;
                    page += 1;
                    continue;
                }
            };

            if stubs.is_empty() {
                debug!(page, "Listing page had no articles");
                state.consecutive_empty_pages += 1;
                page += 1;
                continue;
            }

            let mut added = 0usize;
            for stub in &stubs {
                if self.should_stop(config, state) {
                    break;
                }
                if let StubOutcome::Added = self.process_stub(adapter, stub, config, state).await {
                    added += 1;
                }
            }

            if added == 0 {
                state.consecutive_empty_pages += 1;
            } else {
                state.consecutive_empty_pages = 0;
            }
            debug!(page, listed = stubs.len(), added, "Listing page processed");
            page += 1;
        }
    }

    async fn process_stub(
        &self,
        adapter: &dyn SiteAdapter,
        stub: &ArticleStub,
        config: &CrawlConfig,
        state: &mut RunState,
    ) -> StubOutcome {
        let date = dates::normalize(&stub.raw_date);
        if date.year().is_some_and(|year| year < config.min_year) {
            debug!(url = %stub.url, %date, "Older than minimum year");
            return StubOutcome::Skipped;
        }
        if state.seen_urls.contains(&stub.url) {
            debug!(url = %stub.url, "Already collected");
            return StubOutcome::Skipped;
        }

        let full_text = match self.fetcher.fetch(&stub.url).await {
            Ok(markup) => adapter.parse_content(&markup),
            Err(e) => {
                warn!(url = %stub.url, error = %e, "Detail fetch failed");
                self.log(format!("    [ERR] Failed to fetch {}: {e}", stub.url));
                return StubOutcome::Skipped;
            }
        };

        if full_text.chars().count() < self.policy.min_content_chars {
            debug!(url = %stub.url, chars = full_text.chars().count(), "Body too short");
            return StubOutcome::Skipped;
        }

        let record = ArticleRecord {
            site: adapter.name().to_string(),
            keyword: config.keyword.clone(),
            level: relevance::score(&stub.title, &full_text, &config.keyword),
            date,
            title: stub.title.clone(),
            context: relevance::extract_context(&full_text, &config.keyword),
            url: stub.url.clone(),
            full_text: truncate_chars(&full_text, self.policy.full_text_cap).to_string(),
        };

        self.log(format!(
            "    [OK] {} ({})",
            truncate_for_log(&record.title, 50),
            record.date
        ));
        state.seen_urls.insert(record.url.clone());
        state.records.push(record);
        self.emit(CrawlEvent::Progress(state.collected()));

        if !self.should_stop(config, state) {
            let delay = self.policy.pacing.sample();
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
        StubOutcome::Added
    }
}
