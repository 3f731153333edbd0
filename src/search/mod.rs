//! Catalog search: the filter/sort/rank engine and the search box state

pub mod engine;
pub mod relevance;
pub mod session;

pub use engine::{filter_products, matches, search, search_products, sort_products, suggest};
pub use relevance::{locale_compare, relevance_score};
pub use session::{RecentSearches, SearchSession};
