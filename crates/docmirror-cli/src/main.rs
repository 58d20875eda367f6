//! docmirror CLI - mirror a documentation site and search it offline
//!
//! This is the main entry point for the docmirror command-line interface.
//! Each subcommand lives in its own module under `commands`.

use anyhow::Result;
use clap::Parser;
use docmirror_core::Config;

mod cli;
mod commands;
mod utils;

use cli::{Cli, Commands};
use utils::logging::initialize_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = Config::load()?;

    match cli.command {
        Commands::Crawl(args) => commands::crawl::execute(args, &config).await,
        Commands::Search(args) => commands::search::execute(&args, &config),
        Commands::Serve(args) => commands::serve::execute(args, config).await,
    }
}
