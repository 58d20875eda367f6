//! Sitemap XML parsing and crawl seeding.
//!
//! The seeder fetches the configured sitemap, keeps the `<url><loc>` entries
//! that contain the in-scope path marker and returns them in sitemap order.
//! Seeding never fails: network and parse errors are logged and produce an
//! empty list, which makes the crawler fall back to the base URL.
//!
//! ## Quick Start
//!
//! ```rust
//! use docmirror_core::discovery::sitemap::parse_sitemap;
//!
//! let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://docs.example.com/oss/python/overview</loc></url>
//! </urlset>"#;
//!
//! let urls = parse_sitemap(xml)?;
//! assert_eq!(urls, vec!["https://docs.example.com/oss/python/overview"]);
//! # Ok::<(), docmirror_core::Error>(())
//! ```
//!
//! ## Sitemap Formats
//!
//! - **Standard sitemap**: `<urlset>` with `<url>` entries
//! - **Sitemap index**: `<sitemapindex>` with `<sitemap>` entries pointing to
//!   other sitemaps, fetched recursively in index order
//!
//! Only elements bound to the `http://www.sitemaps.org/schemas/sitemap/0.9`
//! namespace are recognized; extension elements such as `<image:loc>` are
//! ignored.

use crate::url::CrawlScope;
use crate::{Error, Result};
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// Namespace every sitemap element must be bound to.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Default timeout for sitemap fetch requests.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum recursion depth for sitemap index files.
const MAX_INDEX_DEPTH: u8 = 2;

/// Maximum number of child sitemaps to fetch from an index.
const MAX_CHILD_SITEMAPS: usize = 50;

/// Maximum redirects followed per sitemap request.
const MAX_REDIRECTS: usize = 10;

/// Result of parsing a sitemap document.
#[derive(Debug, PartialEq, Eq)]
enum SitemapContent {
    /// Page URLs from a `<urlset>`.
    Entries(Vec<String>),
    /// Child sitemap URLs from a `<sitemapindex>`.
    Index(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Url,
    Sitemap,
}

/// Parse a standard sitemap into its page URLs, in document order.
///
/// # Errors
///
/// Returns an error if the XML is malformed or is a sitemap index.
#[instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>> {
    match parse_sitemap_content(xml)? {
        SitemapContent::Entries(entries) => Ok(entries),
        SitemapContent::Index(_) => Err(Error::Parse(
            "XML is a sitemap index, not a standard sitemap".to_string(),
        )),
    }
}

fn parse_sitemap_content(xml: &str) -> Result<SitemapContent> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut locs = Vec::new();
    let mut is_index = false;
    let mut container: Option<Container> = None;
    let mut in_loc = false;
    let mut current_loc: Option<String> = None;

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(e))) if in_sitemap_ns(&ns) => {
                match e.local_name().as_ref() {
                    b"sitemapindex" => is_index = true,
                    b"url" => {
                        container = Some(Container::Url);
                        current_loc = None;
                    },
                    b"sitemap" => {
                        container = Some(Container::Sitemap);
                        current_loc = None;
                    },
                    b"loc" if container.is_some() => in_loc = true,
                    _ => {},
                }
            },
            Ok((ns, Event::End(e))) if in_sitemap_ns(&ns) => {
                match e.local_name().as_ref() {
                    b"loc" => in_loc = false,
                    b"url" | b"sitemap" => {
                        if let Some(loc) = current_loc.take().filter(|loc| !loc.is_empty()) {
                            locs.push(loc);
                        }
                        container = None;
                    },
                    _ => {},
                }
            },
            Ok((_, Event::Text(e))) if in_loc => {
                let text = e.unescape().map_err(|e| Error::Parse(e.to_string()))?;
                current_loc = Some(text.trim().to_string());
            },
            Ok((_, Event::CData(e))) if in_loc => {
                current_loc = Some(String::from_utf8_lossy(&e.into_inner()).trim().to_string());
            },
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(Error::Parse(format!("XML parse error: {e}"))),
            _ => {},
        }
        buf.clear();
    }

    Ok(if is_index {
        SitemapContent::Index(locs)
    } else {
        SitemapContent::Entries(locs)
    })
}

fn in_sitemap_ns(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SITEMAP_NS.as_bytes())
}

/// Fetches the sitemap and turns it into an ordered, in-scope seed list.
#[derive(Debug, Clone)]
pub struct SitemapSeeder {
    client: Client,
    sitemap_url: String,
    scope: CrawlScope,
}

impl SitemapSeeder {
    /// Create a seeder with strict certificate validation.
    pub fn new(sitemap_url: impl Into<String>, scope: CrawlScope) -> Result<Self> {
        Self::with_tls_validation(sitemap_url, scope, true)
    }

    /// Create a seeder, optionally accepting invalid TLS certificates.
    ///
    /// Passing `validate_certs = false` is meant for test environments only.
    pub fn with_tls_validation(
        sitemap_url: impl Into<String>,
        scope: CrawlScope,
        validate_certs: bool,
    ) -> Result<Self> {
        if !validate_certs {
            tracing::warn!("TLS certificate validation disabled for sitemap requests");
        }
        Ok(Self {
            client: build_sitemap_client(!validate_certs)?,
            sitemap_url: sitemap_url.into(),
            scope,
        })
    }

    /// Sitemap endpoint this seeder reads.
    #[must_use]
    pub fn sitemap_url(&self) -> &str {
        &self.sitemap_url
    }

    /// Return in-scope sitemap URLs, or an empty list on any failure.
    #[instrument(skip(self), fields(url = %self.sitemap_url))]
    pub async fn seed(&self) -> Vec<String> {
        tracing::info!("Fetching sitemap from {}", self.sitemap_url);
        match self.fetch_urls().await {
            Ok(urls) => {
                let seeds: Vec<String> = urls
                    .into_iter()
                    .filter(|url| self.scope.matches_marker(url))
                    .collect();
                tracing::info!("Found {} URLs in sitemap", seeds.len());
                seeds
            },
            Err(e) => {
                tracing::warn!(error = %e, category = e.category(), "Failed to fetch sitemap");
                Vec::new()
            },
        }
    }

    /// Fetch every page URL in the sitemap, following index files.
    pub async fn fetch_urls(&self) -> Result<Vec<String>> {
        fetch_sitemap_recursive(self.client.clone(), self.sitemap_url.clone(), 0).await
    }
}

/// Boxed so the recursive future has a known size.
fn fetch_sitemap_recursive(
    client: Client,
    url: String,
    depth: u8,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<String>>> + Send>> {
    Box::pin(async move {
        if depth > MAX_INDEX_DEPTH {
            return Err(Error::Parse(format!(
                "Sitemap index recursion depth exceeded (max: {MAX_INDEX_DEPTH})"
            )));
        }

        tracing::debug!(url = %url, depth, "Fetching sitemap");

        let response = client.get(&url).send().await?.error_for_status()?;
        let xml = response.text().await?;

        match parse_sitemap_content(&xml)? {
            SitemapContent::Entries(entries) => Ok(entries),
            SitemapContent::Index(children) => {
                tracing::debug!(child_count = children.len(), "Fetching child sitemaps from index");

                let mut all_entries = Vec::new();
                for child_url in children.into_iter().take(MAX_CHILD_SITEMAPS) {
                    match fetch_sitemap_recursive(client.clone(), child_url.clone(), depth + 1).await
                    {
                        Ok(entries) => all_entries.extend(entries),
                        Err(e) => {
                            tracing::warn!(url = %child_url, error = %e, "Failed to fetch child sitemap");
                        },
                    }
                }
                Ok(all_entries)
            },
        }
    })
}

/// Build an HTTP client configured for fetching sitemaps.
fn build_sitemap_client(accept_invalid_certs: bool) -> Result<Client> {
    Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("docmirror/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(Error::Network)
}
