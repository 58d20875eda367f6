//! Search command: print the same text block the `query_docs` tool returns.

use std::sync::Arc;

use anyhow::Result;
use docmirror_core::{Config, DocumentStore, SearchEngine};

use crate::cli::SearchArgs;

/// Execute the search command
pub fn execute(args: &SearchArgs, config: &Config) -> Result<()> {
    let docs_dir = args
        .docs_dir
        .clone()
        .unwrap_or_else(|| config.paths.docs_dir.clone());
    let limit = args.limit.unwrap_or(config.search.default_limit);
    let query = args.query.join(" ");

    tracing::debug!(docs_dir = %docs_dir.display(), %query, limit, "searching");

    let engine = SearchEngine::new(Arc::new(DocumentStore::new(docs_dir)));
    println!("{}", engine.query(&query, limit));
    Ok(())
}
