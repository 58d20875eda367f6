//! # docmirror-core
//!
//! Core functionality for docmirror: mirror a documentation site into local
//! markdown files and search them by keyword.
//!
//! ## Architecture
//!
//! - **Crawling**: [`discovery`] seeds the [`crawl::Frontier`] from the site's
//!   sitemap, [`crawl::Crawler`] fetches pages through a [`fetch::PageFetcher`]
//!   (the [`firecrawl`] CLI in production), [`clean`] strips site chrome and
//!   [`writer`] persists one file per page
//! - **Searching**: [`store::DocumentStore`] loads the files once and
//!   [`search::SearchEngine`] scores them by literal term frequency
//! - **Configuration** and **error handling** are shared by both halves
//!
//! ## Quick Start
//!
//! ```rust
//! use docmirror_core::store::{DocumentStore, StoredDocument};
//! use docmirror_core::SearchEngine;
//! use std::sync::Arc;
//!
//! let store = DocumentStore::with_documents(vec![StoredDocument::from_content(
//!     "oss_python_agents.md",
//!     "---\nurl: https://docs.example.com/oss/python/agents\ntitle: Agents\n---\n\nAgents call tools.",
//! )]);
//! let engine = SearchEngine::new(Arc::new(store));
//!
//! let text = engine.query("agents", 5);
//! assert!(text.starts_with("## Agents (Score: 31)\nSource: oss_python_agents.md"));
//! ```

/// Boilerplate removal for rendered pages
pub mod clean;
/// Configuration loading and validation
pub mod config;
/// Breadth-first crawl frontier and driver
pub mod crawl;
/// Sitemap-based crawl seeding
pub mod discovery;
/// Error types and result aliases
pub mod error;
/// Page fetching boundary
pub mod fetch;
/// Firecrawl CLI page renderer
pub mod firecrawl;
/// Keyword scoring and result formatting
pub mod search;
/// In-memory document collection
pub mod store;
/// URL normalization and crawl scope
pub mod url;
/// Writing cleaned pages to disk
pub mod writer;

pub use clean::ContentCleaner;
pub use config::Config;
pub use crawl::{CrawlReport, Crawler, Frontier};
pub use error::{Error, Result};
pub use fetch::{FetchedPage, PageFetcher, PageLink};
pub use search::{NO_RESULTS, ScoredResult, SearchEngine};
pub use store::{DocumentStore, StoredDocument};
pub use url::{CrawlScope, normalize_url};
pub use writer::{CleanedDocument, DocumentWriter};
