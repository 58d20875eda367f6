//! Page fetching boundary.
//!
//! Rendering a page (running its JavaScript, converting it to markdown and
//! collecting links) is delegated to an external collaborator behind the
//! [`PageFetcher`] trait. The crawler only ever sees [`FetchedPage`] values, so
//! tests drive it with an in-memory fake and production uses the Firecrawl CLI.
//!
//! Collaborators report links in more than one shape. [`RawLink`] accepts all of
//! them and [`collect_links`] turns them into [`PageLink`] records, dropping
//! anything without a usable `href`.

use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Metadata key holding the page title.
pub const TITLE_KEY: &str = "title";

/// Renders a single page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch and render `url`, waiting `settle_delay` for client-side scripts.
    ///
    /// # Errors
    ///
    /// Any error is treated by the crawler as a per-page failure.
    async fn fetch(&self, url: &str, settle_delay: Option<Duration>) -> Result<FetchedPage>;
}

/// Outbound link reported by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageLink {
    /// Link target as written on the page, possibly relative.
    pub href: String,
}

impl PageLink {
    /// Create a link record.
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// A rendered page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPage {
    /// URL that was requested.
    pub url: String,
    /// Rendered markdown.
    pub markdown: String,
    /// Outbound links in page order.
    pub links: Vec<PageLink>,
    /// Collaborator metadata, at least a `title` when the page has one.
    pub metadata: Map<String, Value>,
}

impl FetchedPage {
    /// Create a page without links or metadata.
    pub fn new(url: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markdown: markdown.into(),
            ..Self::default()
        }
    }

    /// Add outbound links.
    #[must_use]
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links.extend(links.into_iter().map(PageLink::new));
        self
    }

    /// Set the page title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata
            .insert(TITLE_KEY.to_string(), Value::String(title.into()));
        self
    }

    /// Title from metadata, if present and non-empty.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get(TITLE_KEY)
            .and_then(Value::as_str)
            .filter(|title| !title.trim().is_empty())
    }
}

/// A link as reported on the wire: a bare string or an object with `href`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLink {
    /// `"https://..."`
    Href(String),
    /// `{ "href": "https://...", "text": "..." }`
    Object {
        /// Link target, when the object carries one.
        #[serde(default)]
        href: Option<String>,
    },
    /// Anything else (numbers, nulls, objects with a non-string `href`).
    Unknown(Value),
}

impl RawLink {
    /// Convert to a [`PageLink`], or `None` when there is no usable target.
    #[must_use]
    pub fn into_page_link(self) -> Option<PageLink> {
        let href = match self {
            Self::Href(href) | Self::Object { href: Some(href) } => href,
            Self::Object { href: None } | Self::Unknown(_) => return None,
        };
        let href = href.trim();
        if href.is_empty() {
            None
        } else {
            Some(PageLink::new(href))
        }
    }
}

/// Normalize a collaborator link list, keeping order and dropping unusable entries.
pub fn collect_links(raw: impl IntoIterator<Item = RawLink>) -> Vec<PageLink> {
    raw.into_iter().filter_map(RawLink::into_page_link).collect()
}
