//! Command implementations, one module per subcommand.

pub mod crawl;
pub mod search;
pub mod serve;
