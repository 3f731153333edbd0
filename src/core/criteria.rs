//! Search criteria driven by the filter controls

use super::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rating floor applied by the "Top Rated" quick filter
pub const TOP_RATED_FLOOR: f64 = 4.5;

/// Downloads floor applied by the "Popular" quick filter
pub const POPULAR_DOWNLOADS_FLOOR: u64 = 1_000_000;

/// Sort key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Relevance,
    Rating,
    Downloads,
    ReleaseDate,
    Name,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Rating => "rating",
            SortBy::Downloads => "downloads",
            SortBy::ReleaseDate => "releaseDate",
            SortBy::Name => "name",
        }
    }
}

impl FromStr for SortBy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortBy::Relevance),
            "rating" => Ok(SortBy::Rating),
            "downloads" => Ok(SortBy::Downloads),
            "releaseDate" | "release_date" => Ok(SortBy::ReleaseDate),
            "name" => Ok(SortBy::Name),
            other => Err(QueryError::invalid(
                "sortBy",
                other,
                "expected one of relevance, rating, downloads, releaseDate, name",
            )),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction toggle layered on top of the sort key's own direction
///
/// `Desc` keeps the key's natural order, `Asc` reverses it. Since most keys
/// already order highest first, `Asc` yields lowest first for them, while for
/// `Name` (naturally A→Z) it yields Z→A.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(QueryError::invalid("sortOrder", other, "expected asc or desc")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Filter and sort parameters for one search interaction
///
/// Created with defaults, edited field by field, reset with [`clear`](Self::clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring; empty means no text constraint
    pub query: String,
    pub category: Option<String>,
    pub company: Option<String>,
    /// A product matches when it carries at least one of these tags
    pub tags: Vec<String>,
    /// Inclusive; 0 disables the floor
    pub min_rating: f64,
    /// Inclusive; 0 disables the floor
    pub min_downloads: u64,
    pub release_year: Option<i32>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_min_downloads(mut self, min_downloads: u64) -> Self {
        self.min_downloads = min_downloads;
        self
    }

    pub fn with_release_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.add_tag(tag);
        self
    }

    /// Add a required tag; a tag already present is ignored
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Reset every field to its default
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any constraint besides the free-text query is set
    pub fn has_active_filters(&self) -> bool {
        self.category.is_some()
            || self.company.is_some()
            || !self.tags.is_empty()
            || self.min_rating > 0.0
            || self.min_downloads > 0
            || self.release_year.is_some()
    }

    /// Apply the "Top Rated" quick filter
    pub fn top_rated(&mut self) {
        self.min_rating = TOP_RATED_FLOOR;
    }

    /// Apply the "Popular" quick filter
    pub fn popular(&mut self) {
        self.min_downloads = POPULAR_DOWNLOADS_FLOOR;
    }
}
