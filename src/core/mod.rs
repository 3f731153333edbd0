//! Core module containing the catalog model, criteria and shared types

pub mod catalog;
pub mod clock;
pub mod criteria;
pub mod error;
pub mod product;
pub mod query;
pub mod store;

pub use catalog::{Catalog, FilterOptions};
pub use clock::{Clock, FixedClock, SystemClock};
pub use criteria::{FilterCriteria, POPULAR_DOWNLOADS_FLOOR, SortBy, SortOrder, TOP_RATED_FLOOR};
pub use error::{CatalogError, CatalogResult, ErrorResponse};
pub use product::{PriceType, Product, SecurityBadge};
pub use query::{LoadMoreWindow, PageLink, PaginatedResponse, PaginationMeta, SearchParams};
pub use store::{JsonSlot, KeyValueStore};
