//! Favorites and favorite collections

pub mod controller;
pub mod model;

pub use controller::{FavoriteEntry, FavoritesController, InlineFavorites, LocalFavorites};
pub use model::{
    ALL_COLLECTIONS, COLLECTION_COLORS, DEFAULT_COLLECTION_ID, FavoriteCollection, FavoriteItem,
    FavoritesExport, FavoritesSort, NewCollection,
};
