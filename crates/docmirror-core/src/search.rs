//! Keyword scoring over the loaded documents.
//!
//! Scoring is literal substring counting on lower-cased text:
//!
//! | Signal | Points |
//! |--------|--------|
//! | whole query occurs in the title | 20 |
//! | whole query occurs in the body | 10 |
//! | each non-overlapping occurrence of each query term in the body | 1 |
//!
//! Documents scoring zero are dropped. Ties keep the store's filename order.
//!
//! ```rust
//! use docmirror_core::search::{NO_RESULTS, SearchEngine};
//! use docmirror_core::store::{DocumentStore, StoredDocument};
//! use std::sync::Arc;
//!
//! let store = DocumentStore::with_documents(vec![StoredDocument::from_content(
//!     "tools.md",
//!     "---\ntitle: Custom Tools Guide\n---\nA custom tool wraps a custom tool function.",
//! )]);
//! let engine = SearchEngine::new(Arc::new(store));
//!
//! let results = engine.search("custom tool", 5);
//! assert_eq!(results[0].score, 20 + 10 + 2 + 2);
//! assert_eq!(engine.query("xyz123notfound", 5), NO_RESULTS);
//! ```

use crate::store::{DocumentStore, StoredDocument, fold_case};
use std::sync::Arc;
use tracing::debug;

/// Returned by [`SearchEngine::query`] when nothing matches.
pub const NO_RESULTS: &str = "No documentation found for that query.";

/// Default number of results.
pub const DEFAULT_LIMIT: usize = 5;

const TITLE_MATCH_SCORE: usize = 20;
const CONTENT_MATCH_SCORE: usize = 10;

/// Characters of context kept before the match.
const SNIPPET_BEFORE: usize = 200;
/// Characters kept from the match onward.
const SNIPPET_AFTER: usize = 800;
/// Characters shown when neither the query nor its first term occurs.
const SNIPPET_FALLBACK: usize = 1000;

const RESULT_SEPARATOR: &str = "\n---\n";

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredResult {
    /// Total score, always positive.
    pub score: usize,
    /// Document title.
    pub title: String,
    /// Document filename, shown as the source reference.
    pub filename: String,
    /// Excerpt around the first match.
    pub snippet: String,
}

impl ScoredResult {
    fn render(&self) -> String {
        format!(
            "## {} (Score: {})\nSource: {}\n\n{}\n",
            self.title, self.score, self.filename, self.snippet
        )
    }
}

/// A lower-cased query and its whitespace-separated terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    terms: Vec<String>,
}

impl Query {
    /// Normalize raw user input.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let text = fold_case(raw.trim());
        let terms = text.split_whitespace().map(ToString::to_string).collect();
        Self { text, terms }
    }

    /// Lower-cased, trimmed query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Individual terms.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Score a single document.
#[must_use]
pub fn score_document(doc: &StoredDocument, query: &Query) -> usize {
    let mut score = 0;
    if fold_case(&doc.title).contains(query.text()) {
        score += TITLE_MATCH_SCORE;
    }
    if doc.searchable.contains(query.text()) {
        score += CONTENT_MATCH_SCORE;
    }
    score
        + query
            .terms()
            .iter()
            .map(|term| doc.searchable.matches(term.as_str()).count())
            .sum::<usize>()
}

/// Excerpt of `doc` around the first match of `query`.
///
/// The match is located in the searchable body but the window is cut from the
/// full file, so a frontmatter header shifts the excerpt toward the start by
/// the header's length.
#[must_use]
pub fn extract_snippet(doc: &StoredDocument, query: &Query) -> String {
    let hit = doc.searchable.find(query.text()).or_else(|| {
        query
            .terms()
            .first()
            .and_then(|term| doc.searchable.find(term.as_str()))
    });

    let Some(byte_idx) = hit else {
        return doc.content.chars().take(SNIPPET_FALLBACK).collect();
    };

    let char_idx = doc.searchable[..byte_idx].chars().count();
    let start = char_idx.saturating_sub(SNIPPET_BEFORE);
    let end = char_idx + SNIPPET_AFTER;
    let excerpt: String = doc.content.chars().take(end).skip(start).collect();
    format!("...{excerpt}...")
}

/// Join results into the text block returned to callers.
#[must_use]
pub fn format_results(results: &[ScoredResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }
    results
        .iter()
        .map(ScoredResult::render)
        .collect::<Vec<_>>()
        .join(RESULT_SEPARATOR)
}

/// Ranks documents from a shared [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct SearchEngine {
    store: Arc<DocumentStore>,
}

impl SearchEngine {
    /// Search over `store`, loading it on first query.
    #[must_use]
    pub const fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Top `limit` documents for `raw_query`, best first.
    #[must_use]
    pub fn search(&self, raw_query: &str, limit: usize) -> Vec<ScoredResult> {
        let query = Query::parse(raw_query);
        let mut scored: Vec<(usize, &StoredDocument)> = self
            .store
            .load()
            .iter()
            .map(|doc| (score_document(doc, &query), doc))
            .filter(|(score, _)| *score > 0)
            .collect();

        // stable: equal scores keep load order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(limit);

        debug!(query = %query.text(), hits = scored.len(), "Search complete");

        scored
            .into_iter()
            .map(|(score, doc)| ScoredResult {
                score,
                title: doc.title.clone(),
                filename: doc.filename.clone(),
                snippet: extract_snippet(doc, &query),
            })
            .collect()
    }

    /// Search and format the results as text.
    #[must_use]
    pub fn query(&self, raw_query: &str, limit: usize) -> String {
        format_results(&self.search(raw_query, limit))
    }
}
