use crate::config::{ChangeFrequency, SiteConfig};
use crate::core::catalog::Catalog;
use chrono::NaiveDate;
use serde::Serialize;

/// Change frequency of product pages
pub const PRODUCT_CHANGEFREQ: ChangeFrequency = ChangeFrequency::Weekly;
/// Priority of product pages
pub const PRODUCT_PRIORITY: f32 = 0.9;

pub(super) const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
{%- for url in urls %}
  <url>
    <loc>{{ url.loc | xml }}</loc>
    <lastmod>{{ url.lastmod }}</lastmod>
    <changefreq>{{ url.changefreq }}</changefreq>
    <priority>{{ url.priority }}</priority>
  </url>
{%- endfor %}
</urlset>
"#;

#[derive(Debug, Serialize)]
pub(super) struct UrlSet {
    pub(super) urls: Vec<UrlEntry>,
}

#[derive(Debug, Serialize)]
pub(super) struct UrlEntry {
    pub(super) loc: String,
    pub(super) lastmod: String,
    pub(super) changefreq: &'static str,
    pub(super) priority: String,
}

impl UrlEntry {
    fn new(loc: String, lastmod: NaiveDate, changefreq: ChangeFrequency, priority: f32) -> Self {
        Self {
            loc,
            lastmod: lastmod.format("%Y-%m-%d").to_string(),
            changefreq: changefreq.as_str(),
            priority: format!("{:.1}", priority),
        }
    }
}

impl UrlSet {
    pub(super) fn build(config: &SiteConfig, catalog: &Catalog, today: NaiveDate) -> Self {
        let pages = config.sitemap_pages.iter().map(|page| {
            UrlEntry::new(
                config.site.url(&page.path),
                page.lastmod.unwrap_or(today),
                page.changefreq,
                page.priority,
            )
        });

        let products = catalog.products().iter().map(|product| {
            UrlEntry::new(
                config.site.url(&product.detail_path()),
                product.release_date,
                PRODUCT_CHANGEFREQ,
                PRODUCT_PRIORITY,
            )
        });

        Self {
            urls: pages.chain(products).collect(),
        }
    }
}
