//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! # Mirror the first 300 in-scope pages (or every page with --all)
//! docmirror crawl
//! docmirror crawl --limit 50 --output ./docs
//!
//! # Keyword search over the mirror
//! docmirror search custom tools --limit 3
//!
//! # Publish the query_docs tool over MCP on stdio
//! docmirror serve
//! ```
//!
//! Configuration comes from `DOCMIRROR_CONFIG` (or the platform config
//! directory); flags given here override it.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `docmirror` command
#[derive(Parser, Clone, Debug)]
#[command(name = "docmirror")]
#[command(version)]
#[command(about = "docmirror - Mirror a documentation site and search it offline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Crawl the documentation site into local markdown files
    Crawl(CrawlArgs),

    /// Search the mirrored documentation
    Search(SearchArgs),

    /// Serve the query_docs tool over MCP (stdio)
    Serve(ServeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct CrawlArgs {
    /// Maximum number of pages to visit (default from config: 300)
    #[arg(long, value_name = "N", conflicts_with = "all")]
    pub limit: Option<usize>,

    /// Crawl every reachable page (up to the configured all-pages limit)
    #[arg(long)]
    pub all: bool,

    /// Directory the markdown files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Accept invalid TLS certificates when fetching the sitemap
    #[arg(long)]
    pub insecure: bool,
}

#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Search query
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum number of results (default from config: 5)
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Directory holding the mirrored markdown files
    #[arg(long, value_name = "DIR")]
    pub docs_dir: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Directory holding the mirrored markdown files
    #[arg(long, value_name = "DIR")]
    pub docs_dir: Option<PathBuf>,
}
