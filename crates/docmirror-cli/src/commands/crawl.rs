//! Crawl command: mirror the configured site into markdown files.

use anyhow::{Context, Result, bail};
use docmirror_core::discovery::SitemapSeeder;
use docmirror_core::firecrawl::FirecrawlCli;
use docmirror_core::{Config, ContentCleaner, CrawlReport, Crawler, DocumentWriter};

use crate::cli::CrawlArgs;

/// Execute the crawl command
///
/// Startup failures (output directory, Firecrawl detection) abort; per-page
/// failures are reported in the summary.
pub async fn execute(args: CrawlArgs, config: &Config) -> Result<()> {
    let limit = effective_limit(&args, config)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.paths.docs_dir.clone());

    let writer = DocumentWriter::create(&output).context("Cannot prepare output directory")?;

    let fetcher = FirecrawlCli::detect()
        .await
        .context("Firecrawl CLI is required for crawling")?;
    match fetcher.is_authenticated().await {
        Ok(true) => {},
        Ok(false) => tracing::warn!("firecrawl is not logged in; run `firecrawl login` if scrapes fail"),
        Err(e) => tracing::debug!(error = %e, "could not check firecrawl login"),
    }

    let scope = config.site.scope();
    let validate_certs = !(args.insecure || config.crawl.accept_invalid_certs);
    let seeder =
        SitemapSeeder::with_tls_validation(&config.site.sitemap_url, scope.clone(), validate_certs)?;
    let seeds = seeder.seed().await;

    tracing::info!(
        limit,
        output = %writer.dir().display(),
        "Crawling {}",
        config.site.base_url
    );

    let crawler = Crawler::new(fetcher, writer, scope)
        .with_limit(limit)
        .with_settle_delay(config.crawl.settle_delay())
        .with_cleaner(ContentCleaner::new(config.cleaning.clone()));
    let report = crawler.run(seeds, &config.site.base_url).await;

    println!("{}", summary(&report, &output.display().to_string()));
    Ok(())
}

fn effective_limit(args: &CrawlArgs, config: &Config) -> Result<usize> {
    let limit = if args.all {
        config.crawl.all_pages_limit
    } else {
        args.limit.unwrap_or(config.crawl.limit)
    };
    if limit == 0 {
        bail!("--limit must be at least 1");
    }
    Ok(limit)
}

fn summary(report: &CrawlReport, output: &str) -> String {
    let mut text = format!(
        "Crawled {} pages: {} saved, {} failed. Output: {output}",
        report.visited,
        report.saved.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        text.push_str(&format!("\n  failed {}: {}", failure.url, failure.error));
    }
    text
}
