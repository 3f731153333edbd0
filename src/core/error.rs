//! Typed error handling for the catalog
//!
//! Every fallible operation in the crate returns a [`CatalogError`] (or one of its
//! category enums, which convert into it with `?`). Handlers return
//! `Result<_, CatalogError>` directly: the error knows its HTTP status, a stable
//! machine-readable code, and how to render itself as JSON.
//!
//! # Error Categories
//!
//! - [`ProductError`]: catalog lookups and catalog invariants
//! - [`QueryError`]: malformed search parameters
//! - [`ConfigError`]: configuration parsing and validation
//! - [`StorageError`]: local key-value persistence
//! - [`FavoritesError`]: favorites and collection management
//! - [`PreferenceError`]: unrecognized theme or language values
//! - [`FeedError`]: RSS / sitemap rendering
//! - [`IntegrityError`]: download and checksum verification
//!
//! # Example
//!
//! ```rust,ignore
//! match catalog.require("winrar") {
//!     Ok(product) => println!("{}", product.name),
//!     Err(CatalogError::Product(ProductError::NotFound { id })) => {
//!         println!("no product {}", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Result alias used across the crate
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// The main error type of the crate
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Favorites(#[from] FavoritesError),

    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Product(e) => e.status_code(),
            CatalogError::Query(_) => StatusCode::BAD_REQUEST,
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Favorites(e) => e.status_code(),
            CatalogError::Preference(_) => StatusCode::BAD_REQUEST,
            CatalogError::Feed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Integrity(e) => e.status_code(),
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Product(e) => e.error_code(),
            CatalogError::Query(_) => "INVALID_QUERY",
            CatalogError::Config(_) => "CONFIG_ERROR",
            CatalogError::Storage(_) => "STORAGE_ERROR",
            CatalogError::Favorites(e) => e.error_code(),
            CatalogError::Preference(e) => e.error_code(),
            CatalogError::Feed(_) => "FEED_ERROR",
            CatalogError::Integrity(e) => e.error_code(),
            CatalogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CatalogError::Product(ProductError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            CatalogError::Query(QueryError::InvalidParameter { parameter, value, .. }) => {
                Some(serde_json::json!({ "parameter": parameter, "value": value }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Product Errors
// =============================================================================

/// Errors related to catalog lookups and catalog invariants
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("product with id '{id}' not found")]
    NotFound { id: String },

    #[error("product id '{id}' appears more than once in the catalog")]
    DuplicateId { id: String },

    #[error("product id '{id}' is not a lowercase slug")]
    InvalidId { id: String },

    #[error("product '{id}' has rating {rating} outside [0, 5]")]
    InvalidRating { id: String, rating: f64 },

    #[error("failed to parse catalog data: {message}")]
    Malformed { message: String },
}

impl ProductError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProductError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ProductError::NotFound { .. } => "PRODUCT_NOT_FOUND",
            ProductError::DuplicateId { .. } => "DUPLICATE_PRODUCT_ID",
            ProductError::InvalidId { .. } => "INVALID_PRODUCT_ID",
            ProductError::InvalidRating { .. } => "INVALID_PRODUCT_RATING",
            ProductError::Malformed { .. } => "MALFORMED_CATALOG",
        }
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while turning request parameters into search criteria
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid value '{value}' for '{parameter}': {message}")]
    InvalidParameter {
        parameter: String,
        value: String,
        message: String,
    },
}

impl QueryError {
    pub fn invalid(
        parameter: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        QueryError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{file}': {message}")]
    Io { file: String, message: String },

    #[error("failed to parse config{}: {message}", config_location(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    ValidationFailed { message: String },
}

fn config_location(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" '{}'", f))
        .unwrap_or_default()
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from a [`KeyValueStore`](crate::core::store::KeyValueStore) backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("failed to encode value for key '{key}': {message}")]
    Encode { key: String, message: String },

    #[error("storage lock poisoned: {message}")]
    LockPoisoned { message: String },
}

// =============================================================================
// Favorites Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("collection '{id}' not found")]
    CollectionNotFound { id: String },

    #[error("the default collection cannot be deleted")]
    DefaultCollectionLocked,

    #[error("collection name must not be blank")]
    BlankCollectionName,

    #[error("color '{color}' is not in the collection palette")]
    UnknownColor { color: String },
}

impl FavoritesError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FavoritesError::CollectionNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FavoritesError::CollectionNotFound { .. } => "COLLECTION_NOT_FOUND",
            FavoritesError::DefaultCollectionLocked => "DEFAULT_COLLECTION_LOCKED",
            FavoritesError::BlankCollectionName => "BLANK_COLLECTION_NAME",
            FavoritesError::UnknownColor { .. } => "UNKNOWN_COLLECTION_COLOR",
        }
    }
}

// =============================================================================
// Preference Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("unknown theme '{value}'")]
    UnknownTheme { value: String },

    #[error("unsupported language '{value}'")]
    UnknownLanguage { value: String },
}

impl PreferenceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PreferenceError::UnknownTheme { .. } => "UNKNOWN_THEME",
            PreferenceError::UnknownLanguage { .. } => "UNSUPPORTED_LANGUAGE",
        }
    }
}

// =============================================================================
// Feed Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to render {feed}: {message}")]
    RenderFailed { feed: String, message: String },
}

// =============================================================================
// Integrity Errors
// =============================================================================

/// Errors of the download-and-verify flow
///
/// A transport failure and a checksum mismatch are both terminal; the caller is
/// expected to surface them the same way.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("download failed: {message}")]
    Network { message: String },

    #[error("{algorithm} mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        algorithm: String,
        expected: String,
        actual: String,
    },

    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("unsupported digest algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },
}

impl IntegrityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntegrityError::Network { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            IntegrityError::Network { .. } => "DOWNLOAD_FAILED",
            IntegrityError::ChecksumMismatch { .. } => "CHECKSUM_MISMATCH",
            IntegrityError::SizeMismatch { .. } => "SIZE_MISMATCH",
            IntegrityError::UnsupportedAlgorithm { .. } => "UNSUPPORTED_DIGEST",
        }
    }
}
