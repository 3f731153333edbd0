//! Server host holding the state shared by every exposure
//!
//! The host owns the read-only catalog, the site configuration and the feed
//! renderer. Nothing in it is per-user: favorites, recent searches and
//! preferences never reach the server.

use crate::config::SiteConfig;
use crate::core::catalog::Catalog;
use crate::core::clock::Clock;
use crate::core::error::CatalogResult;
use crate::feeds::FeedRenderer;
use std::sync::Arc;

/// Host context containing all server state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(catalog, config, clock)?;
/// let app = RestExposure::build_router(Arc::new(host), vec![])?;
/// ```
pub struct ServerHost {
    /// The product catalog
    pub catalog: Arc<Catalog>,

    /// Site and search settings
    pub config: Arc<SiteConfig>,

    /// RSS and sitemap renderer
    pub feeds: Arc<FeedRenderer>,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(
        catalog: Catalog,
        config: SiteConfig,
        clock: Arc<dyn Clock>,
    ) -> CatalogResult<Self> {
        let config = Arc::new(config);
        let feeds = Arc::new(FeedRenderer::with_clock(config.clone(), clock)?);

        Ok(Self {
            catalog: Arc::new(catalog),
            config,
            feeds,
        })
    }

    /// Number of products served
    pub fn product_count(&self) -> usize {
        self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::SystemClock;

    #[test]
    fn test_host_from_components() {
        let host = ServerHost::from_builder_components(
            Catalog::bundled().unwrap(),
            SiteConfig::default_config(),
            Arc::new(SystemClock),
        )
        .unwrap();

        assert_eq!(host.product_count(), 15);
        assert_eq!(host.config.search.suggestion_limit, 6);
    }
}
