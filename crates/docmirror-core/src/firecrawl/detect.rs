//! Locating the Firecrawl CLI and validating its version.

use crate::{Error, Result};
use regex::Regex;
use semver::Version;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::instrument;

use super::MIN_VERSION;

/// Handle to a validated Firecrawl CLI installation.
#[derive(Debug, Clone)]
pub struct FirecrawlCli {
    path: String,
    version: Version,
}

impl FirecrawlCli {
    /// Find `firecrawl` on `PATH` and check it meets [`MIN_VERSION`].
    ///
    /// # Errors
    ///
    /// - [`Error::FirecrawlNotInstalled`] when the binary cannot be found or
    ///   does not report a version
    /// - [`Error::FirecrawlVersionTooOld`] when it is older than required
    #[instrument(level = "debug")]
    pub async fn detect() -> Result<Self> {
        let path = find_firecrawl_path()
            .await
            .map_err(|_| Error::FirecrawlNotInstalled)?;
        Self::at_path(path).await
    }

    /// Validate the Firecrawl binary at an explicit location.
    ///
    /// # Errors
    ///
    /// Same as [`FirecrawlCli::detect`].
    #[instrument(level = "debug")]
    pub async fn at_path(path: String) -> Result<Self> {
        let version = get_firecrawl_version(&path).await.map_err(|e| {
            tracing::debug!(error = %e, path = %path, "firecrawl version probe failed");
            Error::FirecrawlNotInstalled
        })?;
        check_min_version(&version)?;

        tracing::debug!(%version, path = %path, "Using firecrawl");
        Ok(Self { path, version })
    }

    /// Path to the Firecrawl executable.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Detected Firecrawl version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Whether `firecrawl whoami` succeeds.
    ///
    /// Scrapes fail without credentials, so callers warn early when this is false.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    #[instrument(level = "debug", skip(self))]
    pub async fn is_authenticated(&self) -> Result<bool> {
        let output = Command::new(&self.path).arg("whoami").output().await?;
        Ok(output.status.success())
    }
}

fn check_min_version(version: &Version) -> Result<()> {
    let min_version = Version::parse(MIN_VERSION)
        .map_err(|e| Error::Config(format!("Invalid MIN_VERSION constant: {e}")))?;

    if *version < min_version {
        return Err(Error::FirecrawlVersionTooOld {
            found: version.to_string(),
            required: min_version.to_string(),
        });
    }
    Ok(())
}

async fn find_firecrawl_path() -> Result<String> {
    #[cfg(windows)]
    let which_cmd = "where";
    #[cfg(not(windows))]
    let which_cmd = "which";

    let output = Command::new(which_cmd).arg("firecrawl").output().await?;

    if !output.status.success() {
        return Err(Error::NotFound("firecrawl not found in PATH".to_string()));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| Error::NotFound("firecrawl not found in PATH".to_string()))
}

async fn get_firecrawl_version(path: &str) -> Result<Version> {
    let output = Command::new(path).arg("--version").output().await?;

    if !output.status.success() {
        return Err(Error::FirecrawlCommandFailed(
            "firecrawl --version exited with an error".to_string(),
        ));
    }

    parse_version(&String::from_utf8_lossy(&output.stdout))
}

/// Extract the first `X.Y.Z` from `firecrawl --version` output.
fn parse_version(output: &str) -> Result<Version> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    let re = VERSION_RE
        .get_or_init(|| Regex::new(r"v?(\d+\.\d+\.\d+)").expect("version regex is valid"));

    let version_str = re
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            Error::Parse(format!(
                "Could not parse version from firecrawl output: {}",
                output.trim()
            ))
        })?;

    Version::parse(version_str)
        .map_err(|e| Error::Parse(format!("Invalid version format '{version_str}': {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_version_formats() {
        let cases = [
            ("1.2.3", Version::new(1, 2, 3)),
            ("firecrawl 1.2.3", Version::new(1, 2, 3)),
            ("Firecrawl CLI v1.1.0", Version::new(1, 1, 0)),
            ("firecrawl 2.0.1\n", Version::new(2, 0, 1)),
            ("version 1.2.3 (build 4.5.6)", Version::new(1, 2, 3)),
        ];
        for (output, expected) in cases {
            assert_eq!(parse_version(output).unwrap(), expected, "output {output:?}");
        }
    }

    #[test]
    fn test_version_parsing_invalid() {
        assert!(matches!(parse_version("no version here"), Err(Error::Parse(_))));
        assert!(parse_version("").is_err());
        assert!(parse_version("1.2").is_err());
    }

    #[test]
    fn test_min_version_check() {
        assert!(check_min_version(&Version::new(1, 1, 0)).is_ok());
        assert!(check_min_version(&Version::new(2, 0, 0)).is_ok());

        match check_min_version(&Version::new(1, 0, 9)) {
            Err(Error::FirecrawlVersionTooOld { found, required }) => {
                assert_eq!(found, "1.0.9");
                assert_eq!(required, MIN_VERSION);
            },
            other => panic!("expected FirecrawlVersionTooOld, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_installed() {
        let result = FirecrawlCli::at_path("/nonexistent/firecrawl-binary".to_string()).await;
        assert!(matches!(result, Err(Error::FirecrawlNotInstalled)));
    }
}
