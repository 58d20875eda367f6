//! Breadth-first crawl of a documentation site.
//!
//! [`Frontier`] owns the queue and the visited set and decides what is fetched
//! next. [`Crawler`] drives it: fetch, clean, write, enqueue in-scope links.
//! One page is processed at a time.
//!
//! ```rust,no_run
//! use docmirror_core::crawl::Crawler;
//! use docmirror_core::discovery::SitemapSeeder;
//! use docmirror_core::firecrawl::FirecrawlCli;
//! use docmirror_core::writer::DocumentWriter;
//! use docmirror_core::Config;
//!
//! # async fn example() -> docmirror_core::Result<()> {
//! let config = Config::load()?;
//! let seeder = SitemapSeeder::new(&config.site.sitemap_url, config.site.scope())?;
//! let crawler = Crawler::new(
//!     FirecrawlCli::detect().await?,
//!     DocumentWriter::create(&config.paths.docs_dir)?,
//!     config.site.scope(),
//! )
//! .with_limit(config.crawl.limit);
//!
//! let report = crawler.run(seeder.seed().await, &config.site.base_url).await;
//! println!("saved {} of {} pages", report.saved.len(), report.visited);
//! # Ok(())
//! # }
//! ```

use crate::clean::ContentCleaner;
use crate::fetch::PageFetcher;
use crate::url::{CrawlScope, normalize_url};
use crate::writer::{CleanedDocument, DocumentWriter};
use crate::Error;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default page limit.
pub const DEFAULT_LIMIT: usize = 300;

/// Work queue and visited set.
///
/// Queue entries keep the URL as discovered; both sets hold normalized forms.
/// `queued` remembers everything ever enqueued, so a link is never queued
/// twice even after it has been popped.
#[derive(Debug, Clone)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    limit: usize,
}

impl Frontier {
    /// Create an empty frontier that stops after `limit` visits.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            limit,
        }
    }

    /// Seed from sitemap URLs, or from `base_url` when there are none.
    ///
    /// Sitemap seeds are truncated to the limit.
    pub fn seed(&mut self, sitemap_urls: Vec<String>, base_url: &str) {
        if sitemap_urls.is_empty() {
            debug!(base_url, "No sitemap seeds, starting from base URL");
            self.push(base_url.to_string());
        } else {
            for url in sitemap_urls.into_iter().take(self.limit) {
                self.push(url);
            }
        }
    }

    fn push(&mut self, url: String) {
        self.queued.insert(normalize_url(&url));
        self.queue.push_back(url);
    }

    /// Pop the next unvisited URL and mark it visited.
    ///
    /// Returns `None` once the queue is empty or the limit is reached.
    pub fn next_target(&mut self) -> Option<String> {
        while self.visited.len() < self.limit {
            let url = self.queue.pop_front()?;
            if self.visited.insert(normalize_url(&url)) {
                return Some(url);
            }
        }
        None
    }

    /// Append a normalized, in-scope URL unless it was seen before.
    ///
    /// Returns whether it was added.
    pub fn enqueue(&mut self, normalized: String) -> bool {
        if self.visited.contains(&normalized) || self.queued.contains(&normalized) {
            return false;
        }
        self.queued.insert(normalized.clone());
        self.queue.push_back(normalized);
        true
    }

    /// Number of URLs visited so far.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// URLs waiting to be fetched.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of visits.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// A page written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    /// URL the page was fetched from.
    pub url: String,
    /// File it was written to.
    pub path: PathBuf,
}

/// A page that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    /// URL that failed.
    pub url: String,
    /// Error category, as in [`Error::category`].
    pub category: &'static str,
    /// Human readable cause.
    pub error: String,
}

/// Outcome of a crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// URLs visited, successfully or not.
    pub visited: usize,
    /// Pages written, in crawl order.
    pub saved: Vec<SavedPage>,
    /// Pages skipped, in crawl order.
    pub failures: Vec<CrawlFailure>,
}

impl CrawlReport {
    fn record_failure(&mut self, url: &str, err: &Error) {
        warn!(url, category = err.category(), error = %err, "Skipping page");
        self.failures.push(CrawlFailure {
            url: url.to_string(),
            category: err.category(),
            error: err.to_string(),
        });
    }
}

/// Fetches, cleans and stores pages reachable from the seeds.
#[derive(Debug)]
pub struct Crawler<F> {
    fetcher: F,
    writer: DocumentWriter,
    scope: CrawlScope,
    cleaner: ContentCleaner,
    settle_delay: Option<Duration>,
    limit: usize,
}

impl<F: PageFetcher> Crawler<F> {
    /// Create a crawler with default cleaning markers, no settle delay and
    /// a limit of [`DEFAULT_LIMIT`] pages.
    pub fn new(fetcher: F, writer: DocumentWriter, scope: CrawlScope) -> Self {
        Self {
            fetcher,
            writer,
            scope,
            cleaner: ContentCleaner::default(),
            settle_delay: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the maximum number of pages visited.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set how long the fetcher waits for client-side rendering.
    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay: Option<Duration>) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Replace the content cleaner.
    #[must_use]
    pub fn with_cleaner(mut self, cleaner: ContentCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Crawl breadth-first from `seeds`, or from `base_url` if `seeds` is empty.
    ///
    /// Page failures are recorded in the report; they never stop the crawl.
    #[instrument(skip(self, seeds), fields(seeds = seeds.len(), limit = self.limit))]
    pub async fn run(&self, seeds: Vec<String>, base_url: &str) -> CrawlReport {
        let mut frontier = Frontier::new(self.limit);
        frontier.seed(seeds, base_url);
        info!(pending = frontier.pending(), "Starting crawl");

        let mut report = CrawlReport::default();
        while let Some(url) = frontier.next_target() {
            info!("[{}/{}] Crawling: {}", frontier.visited_count(), frontier.limit(), url);
            match self.process(&url).await {
                Ok((saved, links)) => {
                    report.saved.push(saved);
                    let added = links
                        .into_iter()
                        .map(|link| frontier.enqueue(link))
                        .filter(|added| *added)
                        .count();
                    debug!(url = %url, added, pending = frontier.pending(), "Queued links");
                },
                Err(e) => report.record_failure(&url, &e),
            }
        }

        report.visited = frontier.visited_count();
        info!(
            visited = report.visited,
            limit = frontier.limit(),
            pending = frontier.pending(),
            saved = report.saved.len(),
            failed = report.failures.len(),
            "Crawl complete"
        );
        report
    }

    /// Fetch, clean and write one page; return it with its in-scope links.
    async fn process(&self, url: &str) -> crate::Result<(SavedPage, Vec<String>)> {
        let page = self.fetcher.fetch(url, self.settle_delay).await?;

        let body = self.cleaner.clean(&page.markdown);
        let doc = CleanedDocument::new(url, page.title(), body);
        let path = self.writer.write(&doc)?;

        let links = page
            .links
            .iter()
            .filter_map(|link| self.scope.resolve(url, &link.href))
            .collect();

        Ok((
            SavedPage {
                url: url.to_string(),
                path,
            },
            links,
        ))
    }
}
