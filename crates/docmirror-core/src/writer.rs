//! Persisting cleaned pages as markdown files.
//!
//! Each page becomes one file named after its URL path:
//!
//! ```rust
//! use docmirror_core::writer::filename_for_url;
//!
//! assert_eq!(
//!     filename_for_url("https://docs.langchain.com/oss/python/overview"),
//!     "oss_python_overview.md"
//! );
//! assert_eq!(filename_for_url("https://docs.langchain.com/"), "index.md");
//! ```
//!
//! with a small frontmatter header:
//!
//! ```text
//! ---
//! url: <source url>
//! title: <page title>
//! ---
//!
//! <cleaned body>
//! ```

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Title used when the page metadata carries none.
pub const UNTITLED: &str = "No Title";

/// Derive the storage filename for a page URL.
///
/// Leading and trailing slashes of the path are stripped, an empty path maps
/// to `index.md` and remaining slashes become underscores.
#[must_use]
pub fn filename_for_url(url: &str) -> String {
    let path = Url::parse(url).map_or_else(|_| url.to_string(), |parsed| parsed.path().to_string());
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index.md".to_string()
    } else {
        format!("{}.md", trimmed.replace('/', "_"))
    }
}

/// A cleaned page ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedDocument {
    /// URL the page was fetched from.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Cleaned body text.
    pub body: String,
}

impl CleanedDocument {
    /// Build a document, falling back to [`UNTITLED`] when no title is known.
    pub fn new(url: impl Into<String>, title: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.unwrap_or(UNTITLED).to_string(),
            body: body.into(),
        }
    }

    /// Frontmatter block preceding the body.
    #[must_use]
    pub fn header(&self) -> String {
        format!("---\nurl: {}\ntitle: {}\n---\n", self.url, self.title)
    }

    /// Full file contents.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}\n{}", self.header(), self.body.trim())
    }

    /// Storage filename.
    #[must_use]
    pub fn filename(&self) -> String {
        filename_for_url(&self.url)
    }
}

/// Writes documents into a single flat directory.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    dir: PathBuf,
}

impl DocumentWriter {
    /// Open `dir` for writing, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the directory cannot be created. Callers
    /// treat this as fatal.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::Storage(format!(
                "Failed to create output directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `doc`, replacing any earlier file for the same URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the file cannot be written.
    pub fn write(&self, doc: &CleanedDocument) -> Result<PathBuf> {
        let path = self.dir.join(doc.filename());
        let tmp_path = path.with_extension("md.tmp");

        fs::write(&tmp_path, doc.render()).map_err(|e| {
            Error::Storage(format!("Failed to write {}: {e}", tmp_path.display()))
        })?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                Error::Storage(format!("Failed to replace {}: {e}", path.display()))
            })?;
        }

        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to commit {}: {e}", path.display())))?;

        debug!(path = %path.display(), "Saved document");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filenames() {
        let cases = [
            ("https://docs.langchain.com/oss/python/overview", "oss_python_overview.md"),
            ("https://docs.langchain.com/oss/python/overview/", "oss_python_overview.md"),
            ("https://docs.langchain.com", "index.md"),
            ("https://docs.langchain.com/", "index.md"),
            ("https://docs.langchain.com/a?x=1", "a.md"),
            ("/oss/python/x", "oss_python_x.md"),
        ];
        for (url, expected) in cases {
            assert_eq!(filename_for_url(url), expected, "url {url}");
        }
    }

    #[test]
    fn test_render_format() {
        let doc = CleanedDocument::new(
            "https://docs.example.com/oss/python/a",
            Some("Agents"),
            "# Agents\nBody\n",
        );
        assert_eq!(
            doc.render(),
            "---\nurl: https://docs.example.com/oss/python/a\ntitle: Agents\n---\n\n# Agents\nBody"
        );
    }

    #[test]
    fn test_missing_title() {
        let doc = CleanedDocument::new("https://a.dev/x", None, "body");
        assert_eq!(doc.title, "No Title");
        assert!(doc.render().contains("title: No Title\n"));
    }

    #[test]
    fn test_write_creates_dir_and_overwrites() {
        // Given a writer on a nested directory that does not exist yet
        let tmp = TempDir::new().unwrap();
        let writer = DocumentWriter::create(tmp.path().join("nested/docs")).unwrap();
        assert!(writer.dir().is_dir());

        // When the same URL is written twice
        let url = "https://docs.example.com/oss/python/a";
        writer
            .write(&CleanedDocument::new(url, Some("Old"), "old"))
            .unwrap();
        let path = writer
            .write(&CleanedDocument::new(url, Some("New"), "new"))
            .unwrap();

        // Then a single file holds the latest content
        assert_eq!(path.file_name().unwrap(), "oss_python_a.md");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("\nnew"));
        assert_eq!(fs::read_dir(writer.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_uncreatable_directory_is_storage_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = DocumentWriter::create(blocker.join("docs")).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
