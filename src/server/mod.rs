//! Server module for the catalog HTTP API
//!
//! `ServerBuilder` assembles:
//! - health check routes
//! - the catalog search API
//! - the RSS and sitemap feeds
//! - any custom routes supplied by the caller

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use handlers::AppState;
pub use host::ServerHost;
