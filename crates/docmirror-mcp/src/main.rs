use anyhow::Result;
use docmirror_core::Config;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load()?;
    docmirror_mcp::serve_stdio(&config).await?;
    Ok(())
}
