//! `query_docs` tool: keyword search over the mirrored documents

use docmirror_core::SearchEngine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};

/// Tool name as published to clients
pub const QUERY_DOCS_NAME: &str = "query_docs";

/// Tool description as published to clients
pub const QUERY_DOCS_DESCRIPTION: &str = "Search the documentation for a given query. Returns the top 5 relevant documentation snippets with source references.";

/// Parameters for the `query_docs` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryDocsParams {
    /// Free-text search query
    pub query: String,
}

/// JSON schema of [`QueryDocsParams`] as a JSON object
pub fn input_schema() -> McpResult<serde_json::Map<String, serde_json::Value>> {
    match serde_json::to_value(schemars::schema_for!(QueryDocsParams))? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(McpError::Internal(format!(
            "query_docs schema is not an object: {other}"
        ))),
    }
}

/// Run a search and return the formatted result block.
///
/// Scoring reads every loaded document, so it runs on the blocking pool.
pub async fn handle_query_docs(
    engine: &SearchEngine,
    params: QueryDocsParams,
    limit: usize,
) -> McpResult<String> {
    tracing::debug!(query = %params.query, limit, "query_docs");

    let engine = engine.clone();
    tokio::task::spawn_blocking(move || engine.query(&params.query, limit))
        .await
        .map_err(|e| McpError::Internal(format!("search task failed: {e}")))
}
