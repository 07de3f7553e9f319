//! Service boundaries the editor drives.
//!
//! The editor controller only sees these traits; the HTTP implementations
//! live in `salesdesk-client`, and the editor tests substitute in-memory
//! fakes. All three are remote calls against the same backend, hence the
//! shared [`ServiceError`].

use async_trait::async_trait;

use crate::cart::SavePayload;
use crate::configuration::{ItemPhotos, ProductConfiguration};
use crate::types::{DbId, PricingContext};

/// Errors crossing a service boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("Service unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Service error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Product configuration lookup. Prices are context-dependent, so callers
/// re-fetch whenever the customer or project changes.
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    async fn get_configurations(
        &self,
        product_id: DbId,
        ctx: &PricingContext,
    ) -> Result<ProductConfiguration, ServiceError>;
}

/// Lazy per-group item photo lookup.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn get_group_photos(
        &self,
        group_id: DbId,
        group_name: &str,
        project_id: Option<DbId>,
    ) -> Result<Vec<ItemPhotos>, ServiceError>;
}

/// The editor's output sink: persist a new or updated cart line.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn add_item(&self, payload: &SavePayload) -> Result<(), ServiceError>;

    async fn update_item(&self, line_id: DbId, payload: &SavePayload) -> Result<(), ServiceError>;
}
