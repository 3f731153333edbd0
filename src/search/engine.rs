//! Filter / sort / rank engine
//!
//! A pure function of `(catalog, criteria)`: every call filters the whole
//! catalog in one pass, then stable-sorts the survivors. Nothing is cached
//! between calls, and equal keys keep their catalog order.

use super::relevance::{locale_compare, relevance_score};
use crate::core::catalog::Catalog;
use crate::core::criteria::{FilterCriteria, SortBy, SortOrder};
use crate::core::product::Product;
use std::cmp::Ordering;

/// Filter and order the catalog
pub fn search<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> Vec<&'a Product> {
    search_products(catalog.products(), criteria)
}

/// [`search`] over an arbitrary product slice
pub fn search_products<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    let mut results = filter_products(products, criteria);
    sort_products(&mut results, criteria);

    tracing::debug!(
        query = %criteria.query,
        sort_by = %criteria.sort_by,
        sort_order = %criteria.sort_order,
        candidates = products.len(),
        matched = results.len(),
        "search pass"
    );

    results
}

/// Keep the products satisfying every active constraint, in input order
pub fn filter_products<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    let needle = criteria.query.to_lowercase();
    products
        .iter()
        .filter(|product| matches_with_needle(product, criteria, &needle))
        .collect()
}

/// Whether a single product satisfies the criteria
pub fn matches(product: &Product, criteria: &FilterCriteria) -> bool {
    matches_with_needle(product, criteria, &criteria.query.to_lowercase())
}

fn matches_with_needle(product: &Product, criteria: &FilterCriteria, needle: &str) -> bool {
    if !needle.is_empty() && !matches_text(product, needle) {
        return false;
    }

    if let Some(category) = &criteria.category {
        if &product.category != category {
            return false;
        }
    }

    if let Some(company) = &criteria.company {
        if &product.company != company {
            return false;
        }
    }

    // OR across the requested tags
    if !criteria.tags.is_empty() && !criteria.tags.iter().any(|tag| product.has_tag(tag)) {
        return false;
    }

    if criteria.min_rating > 0.0 && product.rating < criteria.min_rating {
        return false;
    }

    if criteria.min_downloads > 0 && product.downloads < criteria.min_downloads {
        return false;
    }

    if let Some(year) = criteria.release_year {
        if product.release_year() != year {
            return false;
        }
    }

    true
}

/// Case-insensitive substring match over the searchable text fields
///
/// `needle` must already be lowercase.
pub fn matches_text(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product.full_description.to_lowercase().contains(needle)
        || product.company.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Stable sort by the criteria's key and direction
///
/// Each key has a natural direction (highest / newest first, names A→Z);
/// [`SortOrder::Asc`] then reverses whatever that produced.
pub fn sort_products(results: &mut Vec<&Product>, criteria: &FilterCriteria) {
    let reverse = criteria.sort_order == SortOrder::Asc;
    let direct = |ordering: Ordering| if reverse { ordering.reverse() } else { ordering };

    match criteria.sort_by {
        SortBy::Relevance if !criteria.query.is_empty() => {
            let mut scored: Vec<(f64, &Product)> = results
                .iter()
                .map(|&p| (relevance_score(p, &criteria.query), p))
                .collect();
            scored.sort_by(|(a, _), (b, _)| direct(b.total_cmp(a)));
            *results = scored.into_iter().map(|(_, p)| p).collect();
        }
        // Relevance without a query falls back to downloads
        SortBy::Relevance | SortBy::Downloads => {
            results.sort_by(|a, b| direct(b.downloads.cmp(&a.downloads)));
        }
        SortBy::Rating => {
            results.sort_by(|a, b| direct(b.rating.total_cmp(&a.rating)));
        }
        SortBy::ReleaseDate => {
            results.sort_by(|a, b| direct(b.release_date.cmp(&a.release_date)));
        }
        SortBy::Name => {
            results.sort_by(|a, b| direct(locale_compare(&a.name, &b.name)));
        }
    }
}

/// Live suggestions for a partially typed query
///
/// Applies the text predicate alone (no other criteria), keeps catalog order and
/// returns at most `limit` products. A blank query yields nothing.
pub fn suggest<'a>(catalog: &'a Catalog, query: &str, limit: usize) -> Vec<&'a Product> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    catalog
        .products()
        .iter()
        .filter(|product| matches_text(product, &needle))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::bundled().unwrap()
    }

    fn ids(results: &[&Product]) -> Vec<String> {
        results.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_default_criteria_returns_everything_by_downloads() {
        let catalog = catalog();
        let results = search(&catalog, &FilterCriteria::default());

        assert_eq!(results.len(), catalog.len());
        assert_eq!(results[0].id, "winrar");
        assert!(results.windows(2).all(|w| w[0].downloads >= w[1].downloads));
    }

    #[test]
    fn test_equal_keys_keep_catalog_order() {
        let catalog = catalog();
        let results = search(
            &catalog,
            &FilterCriteria::new().with_sort(SortBy::ReleaseDate, SortOrder::Desc),
        );

        // Photoshop and Illustrator share 2024-10-15 and keep their relative order
        let first_two = ids(&results[..2]);
        assert_eq!(first_two, vec!["adobe-photoshop", "adobe-illustrator"]);
    }

    #[test]
    fn test_text_query_checks_full_description() {
        let catalog = catalog();
        // Only present in Photoshop's long description
        let results = search(&catalog, &FilterCriteria::new().with_query("reemplazo de cielos"));
        assert_eq!(ids(&results), vec!["adobe-photoshop"]);
    }

    #[test]
    fn test_category_and_company_are_exact() {
        let catalog = catalog();
        let results = search(&catalog, &FilterCriteria::new().with_category("Photography"));
        assert_eq!(results.len(), 2);

        let results = search(&catalog, &FilterCriteria::new().with_category("photography"));
        assert!(results.is_empty());

        let results = search(&catalog, &FilterCriteria::new().with_company("Serif"));
        assert_eq!(ids(&results), vec!["affinity-photo"]);
    }

    #[test]
    fn test_tags_use_or_semantics() {
        let catalog = catalog();
        let criteria = FilterCriteria::new().with_tag("ZIP").with_tag("UX");
        let mut found = ids(&search(&catalog, &criteria));
        found.sort();
        assert_eq!(found, vec!["adobe-xd", "winrar"]);
    }

    #[test]
    fn test_rating_floor_is_inclusive() {
        let catalog = catalog();
        let results = search(&catalog, &FilterCriteria::new().with_min_rating(4.8));
        assert!(results.iter().all(|p| p.rating >= 4.8));
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_name_sort_directions() {
        let catalog = catalog();
        let desc = search(
            &catalog,
            &FilterCriteria::new().with_sort(SortBy::Name, SortOrder::Desc),
        );
        assert_eq!(desc.first().unwrap().id, "adobe-acrobat");
        assert_eq!(desc.last().unwrap().id, "winrar");

        let asc = search(
            &catalog,
            &FilterCriteria::new().with_sort(SortBy::Name, SortOrder::Asc),
        );
        assert_eq!(asc.first().unwrap().id, "winrar");
        assert_eq!(asc.last().unwrap().id, "adobe-acrobat");
    }

    #[test]
    fn test_relevance_orders_by_score() {
        let catalog = catalog();
        let results = search(&catalog, &FilterCriteria::new().with_query("photo"));

        let scores: Vec<f64> = results
            .iter()
            .map(|p| relevance_score(p, "photo"))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        let photoshop = results.iter().position(|p| p.id == "adobe-photoshop").unwrap();
        let lightroom = results.iter().position(|p| p.id == "adobe-lightroom").unwrap();
        assert!(photoshop < lightroom);
    }

    #[test]
    fn test_suggestions_are_capped_and_blank_is_empty() {
        let catalog = catalog();
        assert_eq!(suggest(&catalog, "adobe", 6).len(), 6);
        assert!(suggest(&catalog, "   ", 6).is_empty());
        assert!(suggest(&catalog, "", 6).is_empty());

        let found = suggest(&catalog, "WINRAR", 6);
        assert_eq!(ids(&found), vec!["winrar"]);
    }
}
