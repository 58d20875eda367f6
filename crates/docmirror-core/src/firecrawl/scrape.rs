//! Page scraping through `firecrawl scrape`.
//!
//! The command is run as
//! `firecrawl scrape <url> --format markdown,links --json [--wait-for <ms>]`
//! and its stdout is parsed as:
//!
//! ```json
//! {
//!   "success": true,
//!   "markdown": "# Overview ...",
//!   "links": ["https://...", { "href": "/oss/python/..." }],
//!   "metadata": { "title": "Overview" }
//! }
//! ```
//!
//! Every failure (spawn error, non-zero exit, timeout, unreadable output or
//! `success: false`) becomes [`Error::FetchFailed`] for the page.

use crate::fetch::{FetchedPage, PageFetcher, RawLink, collect_links};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::process::Command;
use tracing::instrument;

use super::FirecrawlCli;

/// Upper bound on a single scrape.
const SCRAPE_TIMEOUT: Duration = Duration::from_secs(60);

/// Options for one scrape invocation.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
    /// Time to let client-side scripts run before capturing. Maps to `--wait-for`.
    pub wait_for: Option<Duration>,
}

impl ScrapeOptions {
    /// Set the settle delay.
    #[must_use]
    pub const fn with_wait_for(mut self, wait_for: Option<Duration>) -> Self {
        self.wait_for = wait_for;
        self
    }

    fn args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "scrape".to_string(),
            url.to_string(),
            "--format".to_string(),
            "markdown,links".to_string(),
            "--json".to_string(),
        ];
        if let Some(wait_for) = self.wait_for.filter(|d| !d.is_zero()) {
            args.push("--wait-for".to_string());
            args.push(wait_for.as_millis().to_string());
        }
        args
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeOutput {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    links: Option<Vec<RawLink>>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

/// Turn `firecrawl scrape --json` stdout into a page.
fn parse_scrape_output(url: &str, stdout: &[u8]) -> Result<FetchedPage> {
    let output: ScrapeOutput = serde_json::from_slice(stdout).map_err(|e| Error::FetchFailed {
        url: url.to_string(),
        reason: format!("failed to parse output: {e}"),
    })?;

    if output.success == Some(false) {
        return Err(Error::FetchFailed {
            url: url.to_string(),
            reason: output
                .error
                .unwrap_or_else(|| "scrape reported failure".to_string()),
        });
    }

    Ok(FetchedPage {
        url: url.to_string(),
        markdown: output.markdown.unwrap_or_default(),
        links: collect_links(output.links.unwrap_or_default()),
        metadata: output.metadata.unwrap_or_default(),
    })
}

impl FirecrawlCli {
    /// Render `url` to markdown and collect its links.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchFailed`] for any per-page failure.
    #[instrument(level = "debug", skip(self, options), fields(url = %url))]
    pub async fn scrape(&self, url: &str, options: ScrapeOptions) -> Result<FetchedPage> {
        let args = options.args(url);

        tracing::debug!(path = %self.path(), ?args, "Executing firecrawl scrape command");

        let scraped = tokio::time::timeout(SCRAPE_TIMEOUT, self.execute_command(&args)).await;
        let output = match scraped {
            Ok(result) => result.map_err(|e| Error::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => {
                return Err(Error::FetchFailed {
                    url: url.to_string(),
                    reason: format!("timed out after {}s", SCRAPE_TIMEOUT.as_secs()),
                });
            },
        };

        parse_scrape_output(url, &output.stdout).inspect_err(|_| {
            tracing::warn!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Unusable firecrawl scrape output"
            );
        })
    }

    async fn execute_command(&self, args: &[String]) -> Result<std::process::Output> {
        let output = Command::new(self.path())
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                exit_code = ?output.status.code(),
                stderr = %stderr,
                "Firecrawl command failed"
            );
            return Err(Error::FirecrawlCommandFailed(stderr.trim().to_string()));
        }

        Ok(output)
    }
}

#[async_trait]
impl PageFetcher for FirecrawlCli {
    async fn fetch(&self, url: &str, settle_delay: Option<Duration>) -> Result<FetchedPage> {
        self.scrape(url, ScrapeOptions::default().with_wait_for(settle_delay))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::fetch::PageLink;

    const URL: &str = "https://docs.example.com/oss/python/overview";

    #[test]
    fn test_args_without_wait() {
        let args = ScrapeOptions::default().args(URL);
        assert_eq!(
            args,
            vec!["scrape", URL, "--format", "markdown,links", "--json"]
        );
    }

    #[test]
    fn test_args_with_wait() {
        let args = ScrapeOptions::default()
            .with_wait_for(Some(Duration::from_secs(2)))
            .args(URL);
        assert_eq!(&args[5..], ["--wait-for", "2000"]);

        let zero = ScrapeOptions::default()
            .with_wait_for(Some(Duration::ZERO))
            .args(URL);
        assert!(!zero.contains(&"--wait-for".to_string()));
    }

    #[test]
    fn test_parses_successful_output() {
        // Given a successful scrape payload with both link shapes
        let stdout = br#"{
            "success": true,
            "markdown": "Copy page\n# Overview",
            "links": ["https://docs.example.com/oss/python/a", {"href": "b", "text": "B"}],
            "metadata": {"title": "Overview", "statusCode": 200}
        }"#;

        // When it is parsed
        let page = parse_scrape_output(URL, stdout).unwrap();

        // Then markdown, links and title are carried through
        assert_eq!(page.url, URL);
        assert_eq!(page.markdown, "Copy page\n# Overview");
        assert_eq!(
            page.links,
            vec![
                PageLink::new("https://docs.example.com/oss/python/a"),
                PageLink::new("b")
            ]
        );
        assert_eq!(page.title(), Some("Overview"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let page = parse_scrape_output(URL, br#"{"links": null}"#).unwrap();
        assert!(page.markdown.is_empty());
        assert!(page.links.is_empty());
        assert_eq!(page.title(), None);
    }

    #[test]
    fn test_reported_failure_carries_message() {
        let stdout = br#"{"success": false, "error": "blocked by robots"}"#;
        match parse_scrape_output(URL, stdout) {
            Err(Error::FetchFailed { url, reason }) => {
                assert_eq!(url, URL);
                assert_eq!(reason, "blocked by robots");
            },
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_output_is_fetch_failure() {
        let err = parse_scrape_output(URL, b"Error: not logged in").unwrap_err();
        assert!(matches!(err, Error::FetchFailed { .. }));
        assert!(err.is_recoverable());
    }
}
