//! Search input surface
//!
//! Turns keystrokes into a query, keeps the live suggestion list in sync and
//! records submitted terms into the persisted recent-searches list.

use super::engine::suggest;
use crate::config::SearchSettings;
use crate::core::catalog::Catalog;
use crate::core::error::{CatalogResult, StorageError};
use crate::core::product::Product;
use crate::core::store::{JsonSlot, KeyValueStore, keys};
use std::sync::Arc;

/// Number of live suggestions shown under the input
pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// Number of remembered searches
pub const DEFAULT_RECENT_LIMIT: usize = 5;

const RECENT_SLOT: JsonSlot<Vec<String>> = JsonSlot::new(keys::RECENT_SEARCHES);

/// Most-recent-first, deduplicated list of submitted search terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSearches {
    terms: Vec<String>,
    limit: usize,
}

impl RecentSearches {
    pub fn new(limit: usize) -> Self {
        Self {
            terms: Vec::new(),
            limit,
        }
    }

    /// Load the persisted list, truncated to `limit`
    pub fn load(store: &dyn KeyValueStore, limit: usize) -> Result<Self, StorageError> {
        let mut terms = RECENT_SLOT.load(store)?;
        terms.truncate(limit);
        Ok(Self { terms, limit })
    }

    /// Put `term` at the front; returns false when the trimmed term is blank
    pub fn record(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }

        self.terms.retain(|existing| existing != term);
        self.terms.insert(0, term.to_string());
        self.terms.truncate(self.limit);
        true
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        RECENT_SLOT.save(store, &self.terms)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }
}

/// State behind the search box
pub struct SearchSession<S: KeyValueStore> {
    catalog: Arc<Catalog>,
    store: S,
    query: String,
    suggestion_ids: Vec<String>,
    recent: RecentSearches,
    suggestion_limit: usize,
    open: bool,
}

impl<S: KeyValueStore> SearchSession<S> {
    /// Create a session with the default limits
    pub fn new(catalog: Arc<Catalog>, store: S) -> Result<Self, StorageError> {
        Self::with_limits(catalog, store, DEFAULT_SUGGESTION_LIMIT, DEFAULT_RECENT_LIMIT)
    }

    /// Create a session with the limits from the site configuration
    pub fn from_settings(
        catalog: Arc<Catalog>,
        store: S,
        settings: &SearchSettings,
    ) -> Result<Self, StorageError> {
        Self::with_limits(
            catalog,
            store,
            settings.suggestion_limit,
            settings.recent_search_limit,
        )
    }

    pub fn with_limits(
        catalog: Arc<Catalog>,
        store: S,
        suggestion_limit: usize,
        recent_limit: usize,
    ) -> Result<Self, StorageError> {
        let recent = RecentSearches::load(&store, recent_limit)?;
        Ok(Self {
            catalog,
            store,
            query: String::new(),
            suggestion_ids: Vec::new(),
            recent,
            suggestion_limit,
            open: false,
        })
    }

    /// Handle a keystroke: replace the query and recompute suggestions
    pub fn input(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.refresh_suggestions();
        self.open = !self.query.is_empty() || !self.recent.is_empty();
    }

    /// Input gained focus
    pub fn focus(&mut self) {
        self.open = !self.query.is_empty() || !self.recent.is_empty();
    }

    /// Enter pressed: remember the term and close the dropdown
    pub fn submit(&mut self) -> Result<(), StorageError> {
        if self.recent.record(&self.query) {
            self.recent.save(&self.store)?;
        }
        self.open = false;
        Ok(())
    }

    /// A suggestion was picked; returns the product's detail path
    pub fn select(&mut self, product_id: &str) -> CatalogResult<String> {
        let product = self.catalog.require(product_id)?;
        let name = product.name.clone();
        let path = product.detail_path();

        self.input(name.clone());
        self.open = false;
        if self.recent.record(&name) {
            self.recent.save(&self.store)?;
        }

        tracing::debug!(product = product_id, "suggestion selected");
        Ok(path)
    }

    /// Put a recent search back into the input
    pub fn choose_recent(&mut self, term: &str) {
        self.input(term.to_string());
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.suggestion_ids.clear();
        self.open = false;
    }

    pub fn clear_recent(&mut self) -> Result<(), StorageError> {
        self.recent.clear();
        RECENT_SLOT.clear(&self.store)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn recent_searches(&self) -> &[String] {
        self.recent.terms()
    }

    /// Current suggestions, in catalog order
    pub fn suggestions(&self) -> Vec<&Product> {
        self.suggestion_ids
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    fn refresh_suggestions(&mut self) {
        self.suggestion_ids = suggest(&self.catalog, &self.query, self.suggestion_limit)
            .into_iter()
            .map(|p| p.id.clone())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    fn session(store: &InMemoryKeyValueStore) -> SearchSession<InMemoryKeyValueStore> {
        let catalog = Arc::new(Catalog::bundled().unwrap());
        SearchSession::new(catalog, store.clone()).unwrap()
    }

    #[test]
    fn test_recent_searches_front_dedup_and_cap() {
        let mut recent = RecentSearches::new(5);
        for term in ["a", "b", "c", "d", "e", "f"] {
            recent.record(term);
        }
        assert_eq!(recent.terms(), ["f", "e", "d", "c", "b"]);

        recent.record("  d ");
        assert_eq!(recent.terms(), ["d", "f", "e", "c", "b"]);

        assert!(!recent.record("   "));
    }

    #[test]
    fn test_input_updates_suggestions_and_dropdown() {
        let store = InMemoryKeyValueStore::new();
        let mut session = session(&store);

        session.input("adobe");
        assert_eq!(session.suggestions().len(), DEFAULT_SUGGESTION_LIMIT);
        assert!(session.is_open());

        session.input("  ");
        assert!(session.suggestions().is_empty());
        assert!(session.is_open());

        session.input("");
        assert!(!session.is_open());
    }

    #[test]
    fn test_submit_persists_trimmed_term() {
        let store = InMemoryKeyValueStore::new();
        let mut session = session(&store);

        session.input("  winrar ");
        session.submit().unwrap();

        assert!(!session.is_open());
        assert_eq!(session.recent_searches(), ["winrar"]);
        assert_eq!(
            store.get(keys::RECENT_SEARCHES).unwrap().as_deref(),
            Some(r#"["winrar"]"#)
        );
    }

    #[test]
    fn test_select_returns_detail_path() {
        let store = InMemoryKeyValueStore::new();
        let mut session = session(&store);

        let path = session.select("sketchup").unwrap();
        assert_eq!(path, "/software/sketchup");
        assert_eq!(session.query(), "SketchUp");
        assert_eq!(session.recent_searches(), ["SketchUp"]);
        assert!(!session.is_open());

        assert!(session.select("missing").is_err());
    }

    #[test]
    fn test_recent_searches_survive_sessions() {
        let store = InMemoryKeyValueStore::new();
        {
            let mut first = session(&store);
            first.input("photo");
            first.submit().unwrap();
        }

        let mut second = session(&store);
        assert_eq!(second.recent_searches(), ["photo"]);

        second.focus();
        assert!(second.is_open());

        second.clear_recent().unwrap();
        assert!(second.recent_searches().is_empty());
        assert!(store.get(keys::RECENT_SEARCHES).unwrap().is_none());
    }
}
