//! Error types and handling for docmirror-core operations.
//!
//! Every fallible operation in the crate returns [`Result<T, Error>`]. Errors are
//! categorized so that the crawler can decide whether a failure only affects a
//! single page (skip and continue) or the whole run (abort with a clear message).
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading stored documents, writing mirrored pages
//! - **Network Errors**: sitemap requests
//! - **Fetch Errors**: page rendering through the fetch collaborator
//! - **Parse Errors**: sitemap XML, collaborator JSON output
//! - **Configuration Errors**: malformed config files or invalid values
//!
//! ```rust
//! use docmirror_core::Error;
//!
//! let err = Error::FetchFailed {
//!     url: "https://docs.example.com/page".to_string(),
//!     reason: "renderer crashed".to_string(),
//! };
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), "fetch");
//! ```

use thiserror::Error;

/// The main error type for docmirror-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading stored documents, creating the output directory and
    /// spawning the fetch collaborator process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed (connection, TLS, non-success status).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Content did not match the expected format.
    ///
    /// Raised for malformed sitemap XML and unreadable collaborator output.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Document storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The fetch collaborator reported a failure for a single page.
    ///
    /// The crawler treats this as a per-page skip; it never aborts a crawl.
    #[error("Fetch failed for '{url}': {reason}")]
    FetchFailed {
        /// URL that could not be rendered.
        url: String,
        /// Reason reported by the collaborator.
        reason: String,
    },

    /// Firecrawl CLI is not installed or not in PATH.
    ///
    /// ## Resolution
    ///
    /// Install Firecrawl CLI with: `npm install -g firecrawl`
    #[error("Firecrawl CLI not installed. Install with: npm install -g firecrawl")]
    FirecrawlNotInstalled,

    /// Firecrawl CLI version is too old.
    #[error("Firecrawl CLI version {found} is too old (minimum required: {required})")]
    FirecrawlVersionTooOld {
        /// Version that was found.
        found: String,
        /// Minimum required version.
        required: String,
    },

    /// Firecrawl command execution failed.
    #[error("Firecrawl command failed: {0}")]
    FirecrawlCommandFailed(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error is transient.
    ///
    /// Returns `true` for failures that only concern the item being processed
    /// (connection failures, collaborator hiccups). Nothing in the
    /// crate retries; the flag exists so callers can report transient and
    /// permanent failures differently.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::FetchFailed { .. } | Self::FirecrawlCommandFailed(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Used as a structured field in log records.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Serialization(_) => "serialization",
            Self::FetchFailed { .. } => "fetch",
            Self::FirecrawlNotInstalled
            | Self::FirecrawlVersionTooOld { .. }
            | Self::FirecrawlCommandFailed(_) => "firecrawl",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
