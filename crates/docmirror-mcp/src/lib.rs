//! docmirror MCP Server
//!
//! Publishes the `query_docs` keyword-search tool over the Model Context
//! Protocol on stdio. stdout carries the protocol, so all logging goes to stderr.

pub mod error;
pub mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use server::McpServer;

use docmirror_core::Config;

/// Load the documents and serve the MCP protocol over stdio.
///
/// # Errors
///
/// Returns an error if the server fails to initialize or run.
pub async fn serve_stdio(config: &Config) -> McpResult<()> {
    tracing::debug!(docs_dir = %config.paths.docs_dir.display(), "initializing docmirror MCP server");

    let server = McpServer::new(config)?;
    let count = server.preload().await?;
    tracing::info!("Serving {} documents", count);

    server.serve_stdio().await
}
