//! Configuration management for docmirror.
//!
//! Configuration is stored in TOML format. Every table is optional; missing
//! tables and fields fall back to the defaults, which mirror the LangChain
//! Python documentation site.
//!
//! ## Lookup order
//!
//! 1. `DOCMIRROR_CONFIG` environment variable (path to a TOML file)
//! 2. Platform config directory: `<config_dir>/config.toml`
//! 3. Built-in defaults when no file exists
//!
//! `DOCMIRROR_DOCS_DIR` overrides `paths.docs_dir` regardless of the file.
//!
//! ## Example
//!
//! ```toml
//! [site]
//! base_url = "https://docs.langchain.com/oss/python/langchain/overview"
//! sitemap_url = "https://docs.langchain.com/sitemap.xml"
//! host = "docs.langchain.com"
//! path_marker = "/oss/python/"
//!
//! [crawl]
//! limit = 300
//! settle_delay_ms = 2000
//!
//! [search]
//! default_limit = 5
//! ```
//!
//! ```rust
//! use docmirror_core::Config;
//!
//! let config: Config = toml::from_str("[crawl]\nlimit = 25\n")?;
//! assert_eq!(config.crawl.limit, 25);
//! assert_eq!(config.search.default_limit, 5);
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::url::CrawlScope;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "DOCMIRROR_CONFIG";
/// Environment variable overriding the document directory.
pub const DOCS_DIR_ENV: &str = "DOCMIRROR_DOCS_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which site is mirrored and what counts as in scope
    pub site: SiteConfig,
    /// Crawl bounds and fetch behavior
    pub crawl: CrawlConfig,
    /// Boilerplate markers stripped from rendered pages
    pub cleaning: CleaningConfig,
    /// Search defaults
    pub search: SearchConfig,
    /// Filesystem locations
    pub paths: PathsConfig,
}

/// The documentation site being mirrored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Seed used when the sitemap yields nothing.
    pub base_url: String,
    /// Sitemap endpoint used for seeding.
    pub sitemap_url: String,
    /// Host (with explicit port when non-default) a link must have to be followed.
    pub host: String,
    /// Path segment a link must contain to be followed.
    pub path_marker: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docs.langchain.com/oss/python/langchain/overview".to_string(),
            sitemap_url: "https://docs.langchain.com/sitemap.xml".to_string(),
            host: "docs.langchain.com".to_string(),
            path_marker: "/oss/python/".to_string(),
        }
    }
}

impl SiteConfig {
    /// Scope filter derived from `host` and `path_marker`.
    #[must_use]
    pub fn scope(&self) -> CrawlScope {
        CrawlScope::new(self.host.clone(), self.path_marker.clone())
    }
}

/// Crawl bounds and fetch behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum number of distinct pages attempted per run.
    pub limit: usize,
    /// Effective limit used by "crawl everything" runs.
    pub all_pages_limit: usize,
    /// Time the renderer waits after page load before extracting content.
    pub settle_delay_ms: u64,
    /// Skip TLS certificate validation for sitemap requests.
    ///
    /// Off by default; only meant for test environments with self-signed
    /// intermediates.
    pub accept_invalid_certs: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            limit: 300,
            all_pages_limit: 10_000,
            settle_delay_ms: 2_000,
            accept_invalid_certs: false,
        }
    }
}

impl CrawlConfig {
    /// Settle delay as a [`Duration`], `None` when zero.
    #[must_use]
    pub const fn settle_delay(&self) -> Option<Duration> {
        if self.settle_delay_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.settle_delay_ms))
        }
    }
}

/// Marker strings used by the content cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Artifact line removed everywhere it appears.
    pub copy_page_artifact: String,
    /// Everything up to and including the first occurrence is dropped.
    pub skip_marker: String,
    /// Everything from the first occurrence onward is dropped.
    pub feedback_marker: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            copy_page_artifact: "Copy page\n".to_string(),
            skip_marker: "Skip to main content".to_string(),
            feedback_marker: "Was this page helpful?".to_string(),
        }
    }
}

/// Search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results returned when the caller does not ask for a limit.
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the mirrored `*.md` documents.
    ///
    /// Default locations:
    /// - Linux: `~/.local/share/docmirror/docs`
    /// - macOS: `~/Library/Application Support/dev.docmirror.docmirror/docs`
    /// - Windows: `%APPDATA%\docmirror\docmirror\data\docs`
    pub docs_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            docs_dir: directories::ProjectDirs::from("dev", "docmirror", "docmirror").map_or_else(
                || PathBuf::from("data").join("docs"),
                |dirs| dirs.data_dir().join("docs"),
            ),
        }
    }
}

impl Config {
    /// Load configuration from `DOCMIRROR_CONFIG` or the platform config directory.
    ///
    /// A missing file yields the defaults. `DOCMIRROR_DOCS_DIR` is applied on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the resulting values fail [`Config::validate`].
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Reject values the crawler and search engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.crawl.limit == 0 || self.crawl.all_pages_limit == 0 {
            return Err(Error::Config("crawl limits must be positive".into()));
        }
        if self.site.host.trim().is_empty() {
            return Err(Error::Config("site.host must not be empty".into()));
        }
        if self.site.path_marker.is_empty() {
            return Err(Error::Config("site.path_marker must not be empty".into()));
        }
        if self.search.default_limit == 0 {
            return Err(Error::Config("search.default_limit must be positive".into()));
        }
        url::Url::parse(&self.site.base_url)
            .map_err(|e| Error::Config(format!("site.base_url is not a URL: {e}")))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(DOCS_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                self.paths.docs_dir = PathBuf::from(trimmed);
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let project_dirs = directories::ProjectDirs::from("dev", "docmirror", "docmirror")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
