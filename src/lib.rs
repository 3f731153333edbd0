//! # Opensoftware
//!
//! Catalog, search and feed engine for the Opensoftware software directory.
//!
//! ## Features
//!
//! - **Catalog**: read-only product list with id lookup and derived filter vocabularies
//! - **Search Engine**: one-pass filtering, relevance ranking and stable sorting
//! - **Search Box**: live suggestions and persisted recent searches
//! - **Favorites**: favorites and collections over an injected key-value store
//! - **Preferences**: accessibility settings, theme and language
//! - **Feeds**: RSS 2.0 blog feed and sitemap rendered with tera
//! - **Integrity**: download-and-verify with SHA-256 and size checks
//! - **HTTP API**: axum server exposing search, suggestions and feeds
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use opensoftware::prelude::*;
//!
//! let catalog = Catalog::bundled()?;
//! let criteria = FilterCriteria::new()
//!     .with_query("photo")
//!     .with_min_rating(4.5);
//!
//! for product in search(&catalog, &criteria) {
//!     println!("{} ({})", product.name, product.rating);
//! }
//!
//! // Serve the API
//! ServerBuilder::new().serve("127.0.0.1:3000").await?;
//! ```

pub mod config;
pub mod core;
pub mod favorites;
pub mod feeds;
pub mod integrity;
pub mod preferences;
pub mod search;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Catalog, CatalogError, CatalogResult, Clock, FilterCriteria, FilterOptions, FixedClock,
        KeyValueStore, LoadMoreWindow, PaginatedResponse, PaginationMeta, Product, SearchParams,
        SortBy, SortOrder, SystemClock,
    };

    // === Search ===
    pub use crate::search::{SearchSession, search, suggest};

    // === Client state ===
    pub use crate::favorites::{FavoritesController, InlineFavorites, LocalFavorites};
    pub use crate::preferences::{AccessibilitySettings, Language, Theme};
    pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore};

    // === Feeds and integrity ===
    pub use crate::feeds::FeedRenderer;
    pub use crate::integrity::{ExpectedIntegrity, IntegrityVerifier, VerificationStatus};

    // === Configuration ===
    pub use crate::config::SiteConfig;

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};
}
