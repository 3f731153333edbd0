//! Query parameters and pagination utilities

use super::criteria::{FilterCriteria, SortBy, SortOrder};
use super::error::QueryError;
use crate::config::SearchSettings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Search parameters for the product listing
///
/// Every value arrives as text and is parsed by [`SearchParams::to_criteria`],
/// so a malformed value yields a [`QueryError`] naming the parameter instead of
/// a generic rejection.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_products(
///     Query(params): Query<SearchParams>,
/// ) -> Result<Json<PaginatedResponse<Product>>, CatalogError> {
///     let criteria = params.to_criteria()?;
///     // ...
/// }
///
/// // Usage:
/// GET /api/products?q=photo&sortBy=rating&sortOrder=desc
/// GET /api/products?tags=ZIP,UX&minRating=4.5&page=2&limit=10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    /// Free-text query
    pub q: Option<String>,

    /// Exact category
    pub category: Option<String>,

    /// Exact company
    pub company: Option<String>,

    /// Comma separated tags, any of which may match
    pub tags: Option<String>,

    pub min_rating: Option<String>,

    pub min_downloads: Option<String>,

    pub release_year: Option<String>,

    /// `relevance`, `rating`, `downloads`, `releaseDate` or `name`
    pub sort_by: Option<String>,

    /// `asc` or `desc`
    pub sort_order: Option<String>,

    /// Page number (starts at 1)
    pub page: Option<String>,

    /// Number of items per page
    pub limit: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, QueryError> {
    present(value)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| QueryError::invalid(name, raw, "not a valid value"))
        })
        .transpose()
}

impl SearchParams {
    /// Build engine criteria from the parameters
    pub fn to_criteria(&self) -> Result<FilterCriteria, QueryError> {
        let mut criteria = FilterCriteria::default();

        if let Some(q) = &self.q {
            criteria.query = q.clone();
        }
        criteria.category = present(&self.category).map(str::to_string);
        criteria.company = present(&self.company).map(str::to_string);

        if let Some(tags) = present(&self.tags) {
            for tag in tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                criteria.add_tag(tag);
            }
        }

        if let Some(rating) = parse::<f64>("minRating", &self.min_rating)? {
            if !rating.is_finite() || rating < 0.0 {
                return Err(QueryError::invalid(
                    "minRating",
                    rating.to_string(),
                    "must be a non-negative number",
                ));
            }
            criteria.min_rating = rating;
        }

        if let Some(downloads) = parse::<u64>("minDownloads", &self.min_downloads)? {
            criteria.min_downloads = downloads;
        }

        criteria.release_year = parse::<i32>("releaseYear", &self.release_year)?;

        if let Some(raw) = present(&self.sort_by) {
            criteria.sort_by = raw.parse::<SortBy>()?;
        }

        if let Some(raw) = present(&self.sort_order) {
            criteria.sort_order = raw.parse::<SortOrder>()?;
        }

        Ok(criteria)
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> Result<usize, QueryError> {
        Ok(parse::<usize>("page", &self.page)?.unwrap_or(1).max(1))
    }

    /// Get limit, clamped to `[1, max]`
    pub fn limit(&self, default: usize, max: usize) -> Result<usize, QueryError> {
        Ok(parse::<usize>("limit", &self.limit)?
            .unwrap_or(default)
            .clamp(1, max.max(1)))
    }
}

/// Paginated response structure
///
/// This structure wraps paginated data with metadata about pagination state.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Cut one page out of the full result list
    pub fn paginate(items: Vec<T>, page: usize, limit: usize) -> Self {
        let pagination = PaginationMeta::new(page, limit, items.len());
        let start = (pagination.page - 1).saturating_mul(pagination.limit);
        let data = items
            .into_iter()
            .skip(start)
            .take(pagination.limit)
            .collect();

        Self { data, pagination }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit and page are at least 1
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = total.div_ceil(limit);
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

/// One slot of a page selector; serializes as the page number or `"..."`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageLink {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageLink::Page(page) => serializer.serialize_u64(*page as u64),
            PageLink::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Page numbers to show around `current`
///
/// The first and last pages are always listed; up to two neighbours on each
/// side of `current` follow, with an ellipsis standing in for any gap.
pub fn visible_pages(current: usize, total_pages: usize) -> Vec<PageLink> {
    const DELTA: isize = 2;

    let current = current as isize;
    let total = total_pages as isize;
    let range_start = (current - DELTA).max(2);
    let range_end = (current + DELTA).min(total - 1);

    let mut pages = vec![PageLink::Page(1)];
    if range_start > 2 {
        pages.push(PageLink::Ellipsis);
    }

    pages.extend((range_start..=range_end).map(|page| PageLink::Page(page as usize)));

    if range_end < total - 1 {
        pages.push(PageLink::Ellipsis);
        pages.push(PageLink::Page(total_pages));
    } else if total > 1 {
        pages.push(PageLink::Page(total_pages));
    }

    pages
}

/// Progressive "load more" window over a result list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMoreWindow {
    initial: usize,
    step: usize,
    total: usize,
    visible: usize,
}

impl LoadMoreWindow {
    pub fn new(total: usize, initial: usize, step: usize) -> Self {
        Self {
            initial,
            step: step.max(1),
            total,
            visible: initial.min(total),
        }
    }

    /// Window sized by the configured first page and step
    pub fn from_settings(total: usize, settings: &SearchSettings) -> Self {
        Self::new(total, settings.initial_page_size, settings.load_more_step)
    }

    /// Number of items currently shown
    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.total
    }

    /// Reveal the next step; returns the new visible count
    pub fn load_more(&mut self) -> usize {
        self.visible = self.visible.saturating_add(self.step).min(self.total);
        self.visible
    }

    /// Start over for a new result list
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.visible = self.initial.min(total);
    }

    /// The visible prefix of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Ellipsis, Page};

    #[test]
    fn test_search_params_defaults() {
        let params = SearchParams::default();
        assert_eq!(params.page().unwrap(), 1);
        assert_eq!(params.limit(20, 100).unwrap(), 20);
        assert_eq!(params.to_criteria().unwrap(), FilterCriteria::default());
    }

    #[test]
    fn test_search_params_to_criteria() {
        let params = SearchParams {
            q: Some("photo".to_string()),
            tags: Some("ZIP, UX,,ZIP".to_string()),
            min_rating: Some("4.5".to_string()),
            release_year: Some("2024".to_string()),
            sort_by: Some("releaseDate".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        };

        let criteria = params.to_criteria().unwrap();
        assert_eq!(criteria.query, "photo");
        assert_eq!(criteria.tags, vec!["ZIP", "UX"]);
        assert_eq!(criteria.min_rating, 4.5);
        assert_eq!(criteria.release_year, Some(2024));
        assert_eq!(criteria.sort_by, SortBy::ReleaseDate);
        assert_eq!(criteria.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_search_params_errors_name_the_parameter() {
        let params = SearchParams {
            sort_by: Some("price".to_string()),
            ..Default::default()
        };
        let QueryError::InvalidParameter { parameter, .. } = params.to_criteria().unwrap_err();
        assert_eq!(parameter, "sortBy");

        let params = SearchParams {
            min_rating: Some("-1".to_string()),
            ..Default::default()
        };
        assert!(params.to_criteria().is_err());

        let params = SearchParams {
            page: Some("two".to_string()),
            ..Default::default()
        };
        assert!(params.page().is_err());
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = SearchParams {
            limit: Some("500".to_string()),
            page: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(params.limit(20, 100).unwrap(), 100);
        assert_eq!(params.page().unwrap(), 1);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);

        let empty = PaginationMeta::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_paginate_slices_items() {
        let page = PaginatedResponse::paginate((1..=15).collect::<Vec<_>>(), 2, 6);
        assert_eq!(page.data, vec![7, 8, 9, 10, 11, 12]);
        assert!(page.pagination.has_next);

        let last = PaginatedResponse::paginate((1..=15).collect::<Vec<_>>(), 3, 6);
        assert_eq!(last.data, vec![13, 14, 15]);
        assert!(!last.pagination.has_next);

        let beyond = PaginatedResponse::paginate((1..=15).collect::<Vec<_>>(), 9, 6);
        assert!(beyond.data.is_empty());
    }

    #[test]
    fn test_visible_pages() {
        assert_eq!(visible_pages(1, 1), vec![Page(1)]);
        assert_eq!(visible_pages(1, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(
            visible_pages(1, 10),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(10)]
        );
        assert_eq!(
            visible_pages(5, 10),
            vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(10)]
        );
        assert_eq!(
            visible_pages(10, 10),
            vec![Page(1), Ellipsis, Page(8), Page(9), Page(10)]
        );

        let json = serde_json::to_value(visible_pages(1, 10)).unwrap();
        assert_eq!(json, serde_json::json!([1, 2, 3, "...", 10]));
    }

    #[test]
    fn test_load_more_window() {
        let mut window = LoadMoreWindow::new(15, 6, 12);
        assert_eq!(window.visible(), 6);
        assert!(window.has_more());

        assert_eq!(window.load_more(), 15);
        assert!(!window.has_more());
        assert_eq!(window.load_more(), 15);

        window.reset(4);
        assert_eq!(window.visible(), 4);
        assert!(!window.has_more());

        let items = [1, 2, 3, 4];
        assert_eq!(window.slice(&items), &[1, 2, 3, 4]);
    }
}
