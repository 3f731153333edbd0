//! Catalog server example
//!
//! Serves the bundled catalog, the search API and the two feeds.
//!
//! ```sh
//! cargo run --example catalog_server
//! cargo run --example catalog_server -- site.yaml
//! ```

use anyhow::Result;
use opensoftware::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("opensoftware=debug,tower_http=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("loading site config from {}", path);
            SiteConfig::from_yaml_file(&path)?
        }
        None => SiteConfig::default_config(),
    };

    let catalog = Catalog::bundled()?;
    let options = catalog.filter_options();

    println!("🚀 Opensoftware catalog server\n");
    println!("📦 {} products", catalog.len());
    println!("🗂️  {} categories, {} companies", options.categories.len(), options.companies.len());
    println!("\n🌐 http://127.0.0.1:3000");
    println!("  GET /health");
    println!("  GET /api/products?q=photo&sortBy=rating");
    println!("  GET /api/products/{{id}}");
    println!("  GET /api/suggestions?q=adobe");
    println!("  GET /api/filters");
    println!("  GET /rss.xml");
    println!("  GET /sitemap.xml\n");

    ServerBuilder::new()
        .with_catalog(catalog)
        .with_config(config)
        .serve("127.0.0.1:3000")
        .await
}
