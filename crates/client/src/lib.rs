//! salesdesk-client — HTTP and WebSocket clients for the remote backend.
//!
//! - [`catalog`] — product configuration lookup.
//! - [`photos`] — per-group item photo lookup.
//! - [`cart`] — cart line add/update.
//! - [`feed`] — the reconnecting WebSocket notification feed with query
//!   cache invalidation.
//! - [`config`] — environment-based client configuration.
//!
//! The HTTP clients implement the `salesdesk-core` service traits, so the
//! editor controller never depends on this crate directly.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod photos;

pub use cart::CartApi;
pub use catalog::CatalogApi;
pub use config::ClientConfig;
pub use error::ApiError;
pub use feed::NotificationFeed;
pub use photos::PhotoApi;
