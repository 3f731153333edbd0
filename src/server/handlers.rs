//! HTTP handlers for the catalog API and the feeds

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::host::ServerHost;
use crate::config::SiteConfig;
use crate::core::catalog::{Catalog, FilterOptions};
use crate::core::error::CatalogError;
use crate::core::product::Product;
use crate::core::query::{PaginatedResponse, SearchParams};
use crate::feeds::{
    FeedRenderer, RSS_CACHE_CONTROL, RSS_CONTENT_TYPE, SITEMAP_CACHE_CONTROL,
    SITEMAP_CONTENT_TYPE,
};
use crate::search::engine::{search, suggest};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub config: Arc<SiteConfig>,
    pub feeds: Arc<FeedRenderer>,
}

impl From<&ServerHost> for AppState {
    fn from(host: &ServerHost) -> Self {
        Self {
            catalog: host.catalog.clone(),
            config: host.config.clone(),
            feeds: host.feeds.clone(),
        }
    }
}

/// Query of the suggestions endpoint
#[derive(Debug, Deserialize, Default)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

/// One entry of the suggestion dropdown
#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    pub company: String,
    pub category: String,
    pub path: String,
}

impl From<&Product> for Suggestion {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            company: product.company.clone(),
            category: product.category.clone(),
            path: product.detail_path(),
        }
    }
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PaginatedResponse<Product>>, CatalogError> {
    let criteria = params.to_criteria()?;
    let page = params.page()?;
    let limit = params.limit(
        state.config.search.default_page_limit,
        state.config.search.max_page_limit,
    )?;

    let results: Vec<Product> = search(&state.catalog, &criteria)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(PaginatedResponse::paginate(results, page, limit)))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CatalogError> {
    let product = state.catalog.require(&id)?;
    Ok(Json(product.clone()))
}

/// GET /api/suggestions?q=
pub async fn list_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<Vec<Suggestion>> {
    let suggestions = suggest(&state.catalog, &query.q, state.config.search.suggestion_limit)
        .into_iter()
        .map(Suggestion::from)
        .collect();
    Json(suggestions)
}

/// GET /api/filters
pub async fn filter_options(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(state.catalog.filter_options().clone())
}

/// GET /rss.xml
pub async fn rss_feed(State(state): State<AppState>) -> Result<Response, CatalogError> {
    let body = state.feeds.render_rss()?;
    Ok((
        [
            (header::CONTENT_TYPE, RSS_CONTENT_TYPE),
            (header::CACHE_CONTROL, RSS_CACHE_CONTROL),
        ],
        body,
    )
        .into_response())
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> Result<Response, CatalogError> {
    let body = state.feeds.render_sitemap(&state.catalog)?;
    Ok((
        [
            (header::CONTENT_TYPE, SITEMAP_CONTENT_TYPE),
            (header::CACHE_CONTROL, SITEMAP_CACHE_CONTROL),
        ],
        body,
    )
        .into_response())
}
