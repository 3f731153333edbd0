//! Relevance scoring and name collation

use crate::core::product::Product;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Score for an exact (case-insensitive) name match
pub const EXACT_NAME_WEIGHT: f64 = 100.0;
/// Score when the name contains the query
pub const NAME_WEIGHT: f64 = 50.0;
pub const COMPANY_WEIGHT: f64 = 30.0;
pub const CATEGORY_WEIGHT: f64 = 20.0;
pub const DESCRIPTION_WEIGHT: f64 = 15.0;
/// Added once per matching tag
pub const TAG_WEIGHT: f64 = 10.0;

/// Heuristic weight of a product for a free-text query
///
/// Text matches dominate; a popularity boost of `ln(downloads) * 0.1 + rating * 2`
/// separates products with the same match profile. The full description is not
/// scored even though it takes part in filtering.
pub fn relevance_score(product: &Product, query: &str) -> f64 {
    let q = query.to_lowercase();
    let name = product.name.to_lowercase();
    let mut score = 0.0;

    if name == q {
        score += EXACT_NAME_WEIGHT;
    } else if name.contains(&q) {
        score += NAME_WEIGHT;
    }

    if product.company.to_lowercase().contains(&q) {
        score += COMPANY_WEIGHT;
    }

    if product.category.to_lowercase().contains(&q) {
        score += CATEGORY_WEIGHT;
    }

    if product.description.to_lowercase().contains(&q) {
        score += DESCRIPTION_WEIGHT;
    }

    let matching_tags = product
        .tags
        .iter()
        .filter(|tag| tag.to_lowercase().contains(&q))
        .count();
    score += matching_tags as f64 * TAG_WEIGHT;

    score + popularity_boost(product)
}

/// `ln(downloads) * 0.1 + rating * 2`, with zero downloads counted as one
pub fn popularity_boost(product: &Product) -> f64 {
    (product.downloads.max(1) as f64).ln() * 0.1 + product.rating * 2.0
}

/// Locale-style comparison of display names
///
/// Accents and case are ignored first ("édition" sorts with "edition"), then
/// accents break ties, then lowercase sorts before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_key(a).cmp(&case_key(b)))
}

fn primary_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn case_key(s: &str) -> Vec<bool> {
    s.chars().map(char::is_uppercase).collect()
}
