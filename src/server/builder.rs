//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::SiteConfig;
use crate::core::catalog::Catalog;
use crate::core::clock::{Clock, SystemClock};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the catalog HTTP server
///
/// Without an explicit catalog the bundled product data is served; without an
/// explicit config the site defaults apply.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(SiteConfig::from_yaml_file("site.yaml")?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    catalog: Option<Catalog>,
    config: Option<SiteConfig>,
    clock: Option<Arc<dyn Clock>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            catalog: None,
            config: None,
            clock: None,
            custom_routes: Vec::new(),
        }
    }

    /// Serve this catalog instead of the bundled one
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_config(mut self, config: SiteConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Clock used by the feeds (build date, copyright year, default lastmod)
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Add custom routes to the server
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{Router, routing::get};
    ///
    /// let extra = Router::new().route("/version", get(|| async { "1.0" }));
    ///
    /// ServerBuilder::new()
    ///     .with_custom_routes(extra)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(&mut self) -> Result<ServerHost> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => Catalog::bundled()?,
        };
        let config = self.config.take().unwrap_or_default();
        let clock = self
            .clock
            .take()
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        tracing::debug!(
            products = catalog.len(),
            base_url = %config.site.base_url,
            "building server host"
        );

        Ok(ServerHost::from_builder_components(catalog, config, clock)?)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new().serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_defaults_use_bundled_catalog() {
        let host = ServerBuilder::new().build_host().unwrap();
        assert_eq!(host.product_count(), 15);
        assert_eq!(host.config.site.base_url, "https://opensoftware.com");
    }

    #[test]
    fn test_custom_catalog_and_config() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        let mut config = SiteConfig::default_config();
        config.search.max_page_limit = 10;

        let host = ServerBuilder::new()
            .with_catalog(catalog)
            .with_config(config)
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .build_host()
            .unwrap();

        assert_eq!(host.product_count(), 0);
        assert_eq!(host.config.search.max_page_limit, 10);
    }

    #[tokio::test]
    async fn test_build_router() {
        let router = ServerBuilder::new()
            .with_custom_routes(Router::new().route("/ping", axum::routing::get(|| async { "pong" })))
            .build();
        assert!(router.is_ok());
    }
}
