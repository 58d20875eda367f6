//! Crawl seed discovery.
//!
//! The mirrored site's XML sitemap is the only discovery source. When it is
//! unavailable the crawler starts from the configured base URL instead.

pub mod sitemap;

pub use sitemap::{SitemapSeeder, parse_sitemap};
