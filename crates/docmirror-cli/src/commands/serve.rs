//! MCP (Model Context Protocol) server command
//!
//! Serves the `query_docs` tool via stdio transport for AI agent integration.

use anyhow::Result;
use docmirror_core::Config;

use crate::cli::ServeArgs;

/// Execute the serve command
///
/// Runs until the client closes stdin.
pub async fn execute(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(dir) = args.docs_dir {
        config.paths.docs_dir = dir;
    }

    // Tracing is already initialized by main; serve_stdio does not touch it.
    docmirror_mcp::serve_stdio(&config).await?;
    Ok(())
}
