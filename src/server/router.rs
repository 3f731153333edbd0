//! Route tables

use super::handlers::{
    AppState, filter_options, get_product, list_products, list_suggestions, rss_feed, sitemap,
};
use axum::{Router, routing::get};

/// Catalog API routes
///
/// - GET /api/products - Search with filters, sorting and pagination
/// - GET /api/products/{id} - One product
/// - GET /api/suggestions?q= - Live suggestions for the search box
/// - GET /api/filters - Distinct categories, companies, tags and years
pub fn build_catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/suggestions", get(list_suggestions))
        .route("/api/filters", get(filter_options))
        .with_state(state)
}

/// Feed routes
///
/// - GET /rss.xml - Blog RSS 2.0 feed
/// - GET /sitemap.xml - Sitemap of pages and products
pub fn build_feed_routes(state: AppState) -> Router {
    Router::new()
        .route("/rss.xml", get(rss_feed))
        .route("/sitemap.xml", get(sitemap))
        .with_state(state)
}
