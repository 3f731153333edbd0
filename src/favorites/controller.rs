//! Favorites controllers
//!
//! Product cards only need to know whether a product is a favorite and to flip
//! that state. [`FavoritesController`] is that capability; a card either
//! receives the persisted [`LocalFavorites`] or falls back to its own
//! [`InlineFavorites`].

use super::model::{
    ALL_COLLECTIONS, COLLECTION_COLORS, DEFAULT_COLLECTION_ID, FavoriteCollection, FavoriteItem,
    FavoritesExport, FavoritesSort, NewCollection,
};
use crate::core::catalog::Catalog;
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::{CatalogResult, FavoritesError, StorageError};
use crate::core::product::Product;
use crate::core::store::{JsonSlot, KeyValueStore, keys};
use crate::search::relevance::locale_compare;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use uuid::Uuid;

const FAVORITES_SLOT: JsonSlot<Vec<FavoriteItem>> = JsonSlot::new(keys::FAVORITES);
const COLLECTIONS_SLOT: JsonSlot<Vec<FavoriteCollection>> = JsonSlot::new(keys::COLLECTIONS);

type Snapshot = (Vec<FavoriteItem>, IndexMap<String, FavoriteCollection>);

/// Favorite state of products
pub trait FavoritesController {
    fn is_favorite(&self, product_id: &str) -> bool;

    /// Mark as favorite; returns false if it already was
    fn add(&mut self, product_id: &str) -> CatalogResult<bool>;

    /// Unmark; returns false if it was not a favorite
    fn remove(&mut self, product_id: &str) -> CatalogResult<bool>;

    /// Flip the state and return the new one
    fn toggle(&mut self, product_id: &str) -> CatalogResult<bool> {
        if self.is_favorite(product_id) {
            self.remove(product_id)?;
            Ok(false)
        } else {
            self.add(product_id)?;
            Ok(true)
        }
    }
}

/// Unpersisted favorites, local to one view
#[derive(Debug, Clone, Default)]
pub struct InlineFavorites {
    ids: IndexSet<String>,
}

impl InlineFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl FavoritesController for InlineFavorites {
    fn is_favorite(&self, product_id: &str) -> bool {
        self.ids.contains(product_id)
    }

    fn add(&mut self, product_id: &str) -> CatalogResult<bool> {
        Ok(self.ids.insert(product_id.to_string()))
    }

    fn remove(&mut self, product_id: &str) -> CatalogResult<bool> {
        Ok(self.ids.shift_remove(product_id))
    }
}

/// A favorite resolved against the catalog
#[derive(Debug, Clone, Copy)]
pub struct FavoriteEntry<'a> {
    pub item: &'a FavoriteItem,
    pub product: &'a Product,
}

/// Favorites and collections persisted in a [`KeyValueStore`]
///
/// Every mutation writes both lists back immediately. A mutation whose write
/// fails is undone in memory before the error is returned.
pub struct LocalFavorites<S: KeyValueStore> {
    catalog: Arc<Catalog>,
    store: S,
    clock: Arc<dyn Clock>,
    favorites: Vec<FavoriteItem>,
    collections: IndexMap<String, FavoriteCollection>,
}

impl<S: KeyValueStore> LocalFavorites<S> {
    /// Load persisted state using the system clock
    pub fn load(catalog: Arc<Catalog>, store: S) -> Result<Self, StorageError> {
        Self::load_with_clock(catalog, store, Arc::new(SystemClock))
    }

    pub fn load_with_clock(
        catalog: Arc<Catalog>,
        store: S,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        let favorites = FAVORITES_SLOT.load(&store)?;
        let stored = COLLECTIONS_SLOT.load_with(&store, || {
            vec![FavoriteCollection::default_collection(clock.now())]
        })?;

        let mut collections: IndexMap<String, FavoriteCollection> = stored
            .into_iter()
            .map(|collection| (collection.id.clone(), collection))
            .collect();

        if !collections.contains_key(DEFAULT_COLLECTION_ID) {
            collections.shift_insert(
                0,
                DEFAULT_COLLECTION_ID.to_string(),
                FavoriteCollection::default_collection(clock.now()),
            );
        }

        tracing::debug!(
            favorites = favorites.len(),
            collections = collections.len(),
            "loaded favorites"
        );

        Ok(Self {
            catalog,
            store,
            clock,
            favorites,
            collections,
        })
    }

    pub fn favorites(&self) -> &[FavoriteItem] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Collections in creation order, `default` first
    pub fn collections(&self) -> impl Iterator<Item = &FavoriteCollection> {
        self.collections.values()
    }

    pub fn collection(&self, id: &str) -> Option<&FavoriteCollection> {
        self.collections.get(id)
    }

    pub fn favorite(&self, product_id: &str) -> Option<&FavoriteItem> {
        self.favorites.iter().find(|f| f.product_id == product_id)
    }

    /// Add a product to favorites, filed under `collection_ids`
    ///
    /// Unknown collection ids are dropped. Returns false when the product was
    /// already a favorite.
    pub fn add_to(&mut self, product_id: &str, collection_ids: &[&str]) -> CatalogResult<bool> {
        self.catalog.require(product_id)?;
        if self.is_favorite(product_id) {
            return Ok(false);
        }

        let before = self.snapshot();
        let now = self.clock.now();
        let mut filed = Vec::with_capacity(collection_ids.len());
        for &id in collection_ids {
            if let Some(collection) = self.collections.get_mut(id) {
                collection.insert_product(product_id);
                if !filed.iter().any(|f| f == id) {
                    filed.push(id.to_string());
                }
            }
        }

        self.favorites.push(FavoriteItem {
            id: format!("{}_{}", product_id, now.timestamp_millis()),
            product_id: product_id.to_string(),
            date_added: now,
            collections: filed,
            notes: None,
        });

        self.commit(before)?;
        tracing::debug!(product = product_id, "added favorite");
        Ok(true)
    }

    /// File a product under a collection, adding it to favorites if needed
    pub fn add_to_collection(&mut self, product_id: &str, collection_id: &str) -> CatalogResult<()> {
        if !self.collections.contains_key(collection_id) {
            return Err(FavoritesError::CollectionNotFound {
                id: collection_id.to_string(),
            }
            .into());
        }

        if !self.is_favorite(product_id) {
            self.add_to(product_id, &[collection_id])?;
            return Ok(());
        }

        let before = self.snapshot();
        if let Some(item) = self.favorites.iter_mut().find(|f| f.product_id == product_id) {
            if !item.in_collection(collection_id) {
                item.collections.push(collection_id.to_string());
            }
        }
        if let Some(collection) = self.collections.get_mut(collection_id) {
            collection.insert_product(product_id);
        }

        self.commit(before)?;
        Ok(())
    }

    /// Take a product out of one collection; it stays a favorite
    pub fn remove_from_collection(
        &mut self,
        product_id: &str,
        collection_id: &str,
    ) -> CatalogResult<()> {
        let before = self.snapshot();
        let Some(collection) = self.collections.get_mut(collection_id) else {
            return Err(FavoritesError::CollectionNotFound {
                id: collection_id.to_string(),
            }
            .into());
        };
        collection.remove_product(product_id);

        if let Some(item) = self.favorites.iter_mut().find(|f| f.product_id == product_id) {
            item.collections.retain(|c| c != collection_id);
        }

        self.commit(before)?;
        Ok(())
    }

    /// Create a collection and return its id
    pub fn create_collection(&mut self, new: NewCollection) -> CatalogResult<String> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(FavoritesError::BlankCollectionName.into());
        }

        let color = match new.color {
            Some(color) if COLLECTION_COLORS.contains(&color.as_str()) => color,
            Some(color) => return Err(FavoritesError::UnknownColor { color }.into()),
            None => COLLECTION_COLORS[0].to_string(),
        };

        let id = format!("collection_{}", Uuid::new_v4().simple());
        let collection = FavoriteCollection {
            id: id.clone(),
            name: name.to_string(),
            description: new
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            color,
            date_created: self.clock.now(),
            product_ids: Vec::new(),
        };
        let before = self.snapshot();
        self.collections.insert(id.clone(), collection);

        self.commit(before)?;
        tracing::debug!(collection = %id, "created collection");
        Ok(id)
    }

    /// Delete a collection and unfile every favorite from it
    pub fn delete_collection(&mut self, collection_id: &str) -> CatalogResult<()> {
        if collection_id == DEFAULT_COLLECTION_ID {
            return Err(FavoritesError::DefaultCollectionLocked.into());
        }

        let before = self.snapshot();
        if self.collections.shift_remove(collection_id).is_none() {
            return Err(FavoritesError::CollectionNotFound {
                id: collection_id.to_string(),
            }
            .into());
        }

        for item in &mut self.favorites {
            item.collections.retain(|c| c != collection_id);
        }

        self.commit(before)?;
        Ok(())
    }

    /// Favorites in `collection` (or [`ALL_COLLECTIONS`]) ordered by `sort`
    ///
    /// Favorites whose product is no longer in the catalog are skipped.
    pub fn list(&self, collection: &str, sort: FavoritesSort) -> Vec<FavoriteEntry<'_>> {
        let mut entries: Vec<FavoriteEntry<'_>> = self
            .favorites
            .iter()
            .filter(|item| collection == ALL_COLLECTIONS || item.in_collection(collection))
            .filter_map(|item| {
                self.catalog
                    .get(&item.product_id)
                    .map(|product| FavoriteEntry { item, product })
            })
            .collect();

        match sort {
            FavoritesSort::DateAdded => {
                entries.sort_by(|a, b| b.item.date_added.cmp(&a.item.date_added))
            }
            FavoritesSort::Name => {
                entries.sort_by(|a, b| locale_compare(&a.product.name, &b.product.name))
            }
            FavoritesSort::Rating => {
                entries.sort_by(|a, b| b.product.rating.total_cmp(&a.product.rating))
            }
            FavoritesSort::Downloads => {
                entries.sort_by(|a, b| b.product.downloads.cmp(&a.product.downloads))
            }
        }

        entries
    }

    /// Snapshot of both lists for download
    pub fn export(&self) -> FavoritesExport {
        FavoritesExport {
            favorites: self.favorites.clone(),
            collections: self.collections.values().cloned().collect(),
            export_date: self.clock.now(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        (self.favorites.clone(), self.collections.clone())
    }

    /// Persist the current state, or restore `before` if the write fails
    fn commit(&mut self, before: Snapshot) -> Result<(), StorageError> {
        let Err(err) = self.persist() else {
            return Ok(());
        };

        tracing::warn!(error = %err, "favorites not saved, rolling back");
        (self.favorites, self.collections) = before;
        if let Err(restore) = self.persist() {
            tracing::warn!(error = %restore, "could not restore saved favorites");
        }
        Err(err)
    }

    fn persist(&self) -> Result<(), StorageError> {
        FAVORITES_SLOT.save(&self.store, &self.favorites)?;
        let collections: Vec<FavoriteCollection> = self.collections.values().cloned().collect();
        COLLECTIONS_SLOT.save(&self.store, &collections)
    }
}

impl<S: KeyValueStore> FavoritesController for LocalFavorites<S> {
    fn is_favorite(&self, product_id: &str) -> bool {
        self.favorites.iter().any(|f| f.product_id == product_id)
    }

    fn add(&mut self, product_id: &str) -> CatalogResult<bool> {
        self.add_to(product_id, &[DEFAULT_COLLECTION_ID])
    }

    fn remove(&mut self, product_id: &str) -> CatalogResult<bool> {
        if !self.is_favorite(product_id) {
            return Ok(false);
        }

        let before = self.snapshot();
        self.favorites.retain(|f| f.product_id != product_id);
        for collection in self.collections.values_mut() {
            collection.remove_product(product_id);
        }

        self.commit(before)?;
        tracing::debug!(product = product_id, "removed favorite");
        Ok(true)
    }
}
