//! Firecrawl CLI integration for page rendering.
//!
//! The crawler renders documentation pages through the `firecrawl` command line
//! tool, which runs the page's JavaScript and returns markdown plus the links it
//! found. [`FirecrawlCli`] implements [`PageFetcher`](crate::fetch::PageFetcher).
//!
//! ```rust,no_run
//! use docmirror_core::fetch::PageFetcher;
//! use docmirror_core::firecrawl::FirecrawlCli;
//! use std::time::Duration;
//!
//! # async fn example() -> docmirror_core::Result<()> {
//! let cli = FirecrawlCli::detect().await?;
//! let page = cli
//!     .fetch("https://docs.langchain.com/oss/python/langchain/overview", Some(Duration::from_secs(2)))
//!     .await?;
//! println!("{} links on {}", page.links.len(), page.url);
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod scrape;

pub use detect::FirecrawlCli;
pub use scrape::ScrapeOptions;

/// Minimum required version of Firecrawl CLI.
///
/// `--format markdown,links` and `--wait-for` need at least this version.
pub const MIN_VERSION: &str = "1.1.0";
