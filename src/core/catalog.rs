//! Read-only catalog store
//!
//! The catalog is built once from the product data file and then only read.
//! Lookups by id go through an index; the filter vocabularies (categories,
//! companies, tags, release years) are derived at construction time.

use super::error::{CatalogResult, ProductError};
use super::product::Product;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Product data bundled with the crate
const BUNDLED_PRODUCTS: &str = include_str!("../../data/products.json");

/// Distinct values present in the catalog, used to populate filter controls
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Ascending
    pub categories: Vec<String>,
    /// Ascending
    pub companies: Vec<String>,
    /// Ascending
    pub tags: Vec<String>,
    /// Most recent first
    pub years: Vec<i32>,
}

impl FilterOptions {
    fn derive(products: &[Product]) -> Self {
        let categories: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
        let companies: BTreeSet<&str> = products.iter().map(|p| p.company.as_str()).collect();
        let tags: BTreeSet<&str> = products
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect();
        let years: BTreeSet<i32> = products.iter().map(Product::release_year).collect();

        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
            companies: companies.into_iter().map(str::to_string).collect(),
            tags: tags.into_iter().map(str::to_string).collect(),
            years: years.into_iter().rev().collect(),
        }
    }
}

/// The in-memory product catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    options: FilterOptions,
}

impl Catalog {
    /// Build a catalog, checking that ids are unique slugs and ratings lie in [0, 5]
    pub fn new(products: Vec<Product>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            if !is_slug(&product.id) {
                return Err(ProductError::InvalidId {
                    id: product.id.clone(),
                }
                .into());
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(ProductError::InvalidRating {
                    id: product.id.clone(),
                    rating: product.rating,
                }
                .into());
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(ProductError::DuplicateId {
                    id: product.id.clone(),
                }
                .into());
            }
        }

        let options = FilterOptions::derive(&products);

        tracing::debug!(
            products = products.len(),
            categories = options.categories.len(),
            companies = options.companies.len(),
            "catalog loaded"
        );

        Ok(Self {
            products,
            index,
            options,
        })
    }

    /// Parse a JSON array of products
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| ProductError::Malformed {
                message: e.to_string(),
            })?;
        Self::new(products)
    }

    /// The catalog shipped with the crate
    pub fn bundled() -> CatalogResult<Self> {
        Self::from_json_str(BUNDLED_PRODUCTS)
    }

    /// All products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    /// Like [`get`](Self::get), but a missing id is an error
    pub fn require(&self, id: &str) -> CatalogResult<&Product> {
        self.get(id).ok_or_else(|| {
            ProductError::NotFound {
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Position of a product in catalog order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn is_slug(id: &str) -> bool {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());
    regex.is_match(id)
}
