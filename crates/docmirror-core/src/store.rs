//! In-memory document collection backing search.
//!
//! [`DocumentStore`] reads every `*.md` file in its directory once, on first
//! use, and keeps the records for the lifetime of the store. Later calls to
//! [`DocumentStore::load`] return the same records even if files were added on
//! disk in the meantime; [`DocumentStore::reset`] forgets them.
//!
//! ```rust
//! use docmirror_core::store::{DocumentStore, StoredDocument};
//!
//! let store = DocumentStore::with_documents(vec![StoredDocument::from_content(
//!     "agents.md",
//!     "---\nurl: https://docs.example.com/agents\ntitle: Agents\n---\n\nBuild Agents",
//! )]);
//! assert!(store.is_loaded());
//! assert_eq!(store.load()[0].title, "Agents");
//! assert_eq!(store.load()[0].searchable, "\n\nbuild agents");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Frontmatter delimiter.
const FRONTMATTER_MARKER: &str = "---";

/// Number of leading lines scanned for a title.
const TITLE_SCAN_LINES: usize = 20;

/// Line prefixes that carry a title, checked per line in this order.
const TITLE_PREFIXES: [&str; 2] = ["title: ", "# "];

/// A loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Location on disk.
    pub path: PathBuf,
    /// File name including the `.md` extension.
    pub filename: String,
    /// Display title.
    pub title: String,
    /// Full file contents, header included.
    pub content: String,
    /// Contents with the leading frontmatter block removed, original case.
    pub body: String,
    /// Lower-cased [`body`](Self::body); what queries are matched against.
    pub searchable: String,
}

impl StoredDocument {
    /// Build a record from a file path and its contents.
    pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = extract_title(&content).unwrap_or_else(|| title_from_filename(&filename));
        let body = strip_frontmatter(&content).to_string();
        let searchable = fold_case(&body);

        Self {
            path,
            filename,
            title,
            content,
            body,
            searchable,
        }
    }
}

/// Lower-case `text` one character at a time.
///
/// Characters whose lower-case form is more than one character are kept as-is
/// so that character offsets in the result line up with the input.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

/// Remove one leading `---` ... `---` block.
fn strip_frontmatter(content: &str) -> &str {
    content
        .strip_prefix(FRONTMATTER_MARKER)
        .and_then(|rest| rest.split_once(FRONTMATTER_MARKER))
        .map_or(content, |(_, after)| after)
}

fn extract_title(content: &str) -> Option<String> {
    content.lines().take(TITLE_SCAN_LINES).find_map(|line| {
        TITLE_PREFIXES
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix))
            .map(|title| title.trim().to_string())
    })
}

/// `oss_python_tool-calling.md` → `Oss Python Tool-Calling`.
fn title_from_filename(filename: &str) -> String {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    let mut title = String::with_capacity(stem.len());
    let mut prev_alpha = false;
    for c in stem.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if c.is_alphabetic() {
            if prev_alpha {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            title.push(c);
            prev_alpha = false;
        }
    }
    title
}

/// Lazily loaded, immutable set of documents from one directory.
#[derive(Debug, Default)]
pub struct DocumentStore {
    dir: PathBuf,
    docs: OnceLock<Vec<StoredDocument>>,
}

impl DocumentStore {
    /// Create an unloaded store over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            docs: OnceLock::new(),
        }
    }

    /// Create a store that is already loaded with `docs`.
    #[must_use]
    pub fn with_documents(docs: Vec<StoredDocument>) -> Self {
        let store = Self::default();
        let _ = store.docs.set(docs);
        store
    }

    /// Directory documents are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load documents on first call and return them.
    ///
    /// Concurrent first callers block until a single load completes.
    pub fn load(&self) -> &[StoredDocument] {
        self.docs.get_or_init(|| read_documents(&self.dir))
    }

    /// Whether documents have been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.docs.get().is_some()
    }

    /// Forget loaded documents so the next [`load`](Self::load) reads the directory again.
    pub fn reset(&mut self) {
        self.docs = OnceLock::new();
    }
}

fn read_documents(dir: &Path) -> Vec<StoredDocument> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Documentation directory not readable");
            return Vec::new();
        },
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    let docs: Vec<StoredDocument> = paths
        .into_iter()
        .filter_map(|path| match fs::read_to_string(&path) {
            Ok(content) => Some(StoredDocument::from_content(path, content)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                None
            },
        })
        .collect();

    info!("Loaded {} documents from {}", docs.len(), dir.display());
    debug!(titles = ?docs.iter().map(|d| d.title.as_str()).collect::<Vec<_>>(), "Loaded titles");
    docs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_title_from_frontmatter() {
        let doc = StoredDocument::from_content(
            "oss_python_agents.md",
            "---\nurl: https://a.dev/agents\ntitle: Build Agents\n---\n\n# Heading",
        );
        assert_eq!(doc.title, "Build Agents");
        assert_eq!(doc.filename, "oss_python_agents.md");
    }

    #[test]
    fn test_title_from_heading() {
        let doc = StoredDocument::from_content("x.md", "intro\n# Streaming  \nbody");
        assert_eq!(doc.title, "Streaming");
    }

    #[test]
    fn test_title_beyond_scan_window_is_ignored() {
        let mut content = "line\n".repeat(20);
        content.push_str("# Too Late\n");
        let doc = StoredDocument::from_content("oss_python_late_title.md", content);
        assert_eq!(doc.title, "Oss Python Late Title");
    }

    #[test]
    fn test_fallback_title_casing() {
        assert_eq!(title_from_filename("oss_python_tool-calling.md"), "Oss Python Tool-Calling");
        assert_eq!(title_from_filename("index.md"), "Index");
        assert_eq!(title_from_filename("v2_API_docs.md"), "V2 Api Docs");
    }

    #[test]
    fn test_frontmatter_stripped_once() {
        let doc = StoredDocument::from_content("a.md", "---\ntitle: A\n---\nBody --- More");
        assert_eq!(doc.body, "\nBody --- More");
        assert_eq!(doc.searchable, "\nbody --- more");
    }

    #[test]
    fn test_content_without_frontmatter_is_kept() {
        let doc = StoredDocument::from_content("a.md", "Plain Text");
        assert_eq!(doc.searchable, "plain text");

        let unterminated = StoredDocument::from_content("b.md", "---\ntitle: B\nBody");
        assert_eq!(unterminated.body, "---\ntitle: B\nBody");
    }

    #[test]
    fn test_fold_case_keeps_char_alignment() {
        let text = "İstanbul ÄPFEL";
        let folded = fold_case(text);
        assert_eq!(folded.chars().count(), text.chars().count());
        assert!(folded.ends_with("äpfel"));
    }

    #[test]
    fn test_load_reads_md_files_in_name_order() {
        // Given a directory with markdown and other files
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.md", "# Bee");
        write(tmp.path(), "a.md", "# Ay");
        write(tmp.path(), "notes.txt", "# Ignored");
        write(tmp.path(), "c.md.tmp", "# Partial");
        fs::create_dir(tmp.path().join("sub.md")).unwrap();

        // When loaded
        let store = DocumentStore::new(tmp.path());
        assert!(!store.is_loaded());
        let titles: Vec<&str> = store.load().iter().map(|d| d.title.as_str()).collect();

        // Then only top-level .md files appear, sorted by name
        assert_eq!(titles, vec!["Ay", "Bee"]);
        assert!(store.is_loaded());
    }

    #[test]
    fn test_second_load_is_noop() {
        // Given a store loaded once
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "first.md", "# First");
        let mut store = DocumentStore::new(tmp.path());
        assert_eq!(store.load().len(), 1);

        // When a file is added and load is called again
        write(tmp.path(), "second.md", "# Second");

        // Then the new file is absent until reset
        assert_eq!(store.load().len(), 1);
        store.reset();
        assert!(!store.is_loaded());
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn test_missing_directory_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path().join("missing"));
        assert!(store.load().is_empty());
        assert!(store.is_loaded());
    }

    #[test]
    fn test_concurrent_first_load_loads_once() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "# A");
        let store = DocumentStore::new(tmp.path());

        let pointers: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.load().as_ptr() as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", "# Good");
        fs::write(tmp.path().join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();

        let store = DocumentStore::new(tmp.path());
        let titles: Vec<&str> = store.load().iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Good"]);
    }
}
