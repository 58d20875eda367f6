//! URL canonicalization and crawl scope filtering.
//!
//! The normalized form produced by [`normalize_url`] is the only dedup key used
//! by the frontier: two URLs that differ by a fragment or a trailing slash are
//! the same crawl target.
//!
//! ```rust
//! use docmirror_core::url::{normalize_url, CrawlScope};
//!
//! assert_eq!(
//!     normalize_url("https://docs.example.com/oss/python/overview/#install"),
//!     "https://docs.example.com/oss/python/overview"
//! );
//!
//! let scope = CrawlScope::new("docs.example.com", "/oss/python/");
//! let link = scope.resolve("https://docs.example.com/oss/python/a", "../python/b/");
//! assert_eq!(link.as_deref(), Some("https://docs.example.com/oss/python/b"));
//! assert!(scope.resolve("https://docs.example.com/oss/python/a", "/blog/post").is_none());
//! ```

use url::Url;

/// Canonicalize a URL for visited-set and pending-set membership.
///
/// Drops everything from the first `#`, then any trailing `/`.
///
/// A run of trailing slashes is removed as a whole so that normalizing an
/// already-normalized URL is always a no-op.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
    without_fragment.trim_end_matches('/').to_string()
}

/// Host and path constraints a discovered link must satisfy to be followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    host: String,
    path_marker: String,
}

impl CrawlScope {
    /// Create a scope from a host (`docs.example.com` or `127.0.0.1:8080`) and a path marker.
    pub fn new(host: impl Into<String>, path_marker: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path_marker: path_marker.into(),
        }
    }

    /// Host links must match.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path segment links must contain.
    #[must_use]
    pub fn path_marker(&self) -> &str {
        &self.path_marker
    }

    /// Whether a raw URL string contains the path marker.
    ///
    /// Used for sitemap entries, which are filtered on the marker alone.
    #[must_use]
    pub fn matches_marker(&self, url: &str) -> bool {
        url.contains(&self.path_marker)
    }

    /// Whether an absolute URL is on the configured host and under the marker.
    #[must_use]
    pub fn contains(&self, url: &Url) -> bool {
        authority(url).is_some_and(|auth| auth == self.host) && url.path().contains(&self.path_marker)
    }

    /// Resolve `href` against `base` and return its normalized form when in scope.
    ///
    /// Unparseable bases or links, and anything outside the scope, yield `None`.
    #[must_use]
    pub fn resolve(&self, base: &str, href: &str) -> Option<String> {
        let base = Url::parse(base).ok()?;
        let resolved = base.join(href).ok()?;
        if self.contains(&resolved) {
            Some(normalize_url(resolved.as_str()))
        } else {
            None
        }
    }
}

/// Host plus an explicit port when it differs from the scheme default.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OVERVIEW: &str = "https://docs.langchain.com/oss/python/langchain/overview";

    fn scope() -> CrawlScope {
        CrawlScope::new("docs.langchain.com", "/oss/python/")
    }

    #[test]
    fn test_trailing_slash_and_fragment_collapse() {
        let variants = [
            format!("{OVERVIEW}/"),
            format!("{OVERVIEW}#section"),
            format!("{OVERVIEW}/#section"),
            OVERVIEW.to_string(),
        ];
        for variant in &variants {
            assert_eq!(normalize_url(variant), OVERVIEW, "variant {variant}");
        }
    }

    #[test]
    fn test_repeated_trailing_slashes_are_removed() {
        assert_eq!(normalize_url("https://a.dev/x//"), "https://a.dev/x");
        assert_eq!(normalize_url("https://a.dev/x//#top"), "https://a.dev/x");
    }

    #[test]
    fn test_fragment_cut_at_first_hash() {
        assert_eq!(normalize_url("https://a.dev/x#one#two"), "https://a.dev/x");
        assert_eq!(normalize_url("#only-fragment"), "");
    }

    #[test]
    fn test_resolves_relative_links() {
        let base = "https://docs.langchain.com/oss/python/langchain/overview";
        assert_eq!(
            scope().resolve(base, "agents#tools").as_deref(),
            Some("https://docs.langchain.com/oss/python/langchain/agents")
        );
        assert_eq!(
            scope().resolve(base, "/oss/python/integrations/").as_deref(),
            Some("https://docs.langchain.com/oss/python/integrations")
        );
    }

    #[test]
    fn test_rejects_other_hosts_and_paths() {
        let base = "https://docs.langchain.com/oss/python/langchain/overview";
        assert!(scope()
            .resolve(base, "https://python.langchain.com/oss/python/x")
            .is_none());
        assert!(scope().resolve(base, "/oss/javascript/overview").is_none());
        assert!(scope().resolve(base, "mailto:team@langchain.dev").is_none());
    }

    #[test]
    fn test_marker_must_be_in_path_not_query() {
        let base = "https://docs.langchain.com/oss/python/a";
        assert!(scope()
            .resolve(base, "/search?from=/oss/python/a")
            .is_none());
    }

    #[test]
    fn test_host_with_port() {
        let scope = CrawlScope::new("127.0.0.1:8080", "/docs/");
        assert!(scope.resolve("http://127.0.0.1:8080/docs/a", "b").is_some());
        assert!(scope.resolve("http://127.0.0.1:9090/docs/a", "b").is_none());
    }

    #[test]
    fn test_unparseable_base_yields_none() {
        assert!(scope().resolve("not a url", "/oss/python/a").is_none());
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(url in ".*") {
            let once = normalize_url(&url);
            prop_assert_eq!(normalize_url(&once), once.clone());
        }

        #[test]
        fn prop_fragment_and_slash_variants_agree(
            path in "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
            fragment in "[a-z0-9-]{0,10}",
        ) {
            let base = format!("https://docs.example.com/{path}");
            prop_assert_eq!(normalize_url(&format!("{base}/")), base.clone());
            prop_assert_eq!(normalize_url(&format!("{base}#{fragment}")), base.clone());
        }
    }
}
