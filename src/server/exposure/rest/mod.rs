//! REST exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` carrying the health
//! checks, the catalog API, the feeds and any custom routes.

use super::super::handlers::AppState;
use super::super::host::ServerHost;
use crate::server::router::{build_catalog_routes, build_feed_routes};
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// # Arguments
    ///
    /// * `host` - The server host containing the catalog, config and feeds
    /// * `custom_routes` - Additional custom routes to merge
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let state = AppState::from(host.as_ref());

        let mut app = Self::health_routes()
            .merge(build_catalog_routes(state.clone()))
            .merge(build_feed_routes(state));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        // The catalog is public and read-only
        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "opensoftware"
        }))
    }
}
