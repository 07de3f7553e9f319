//! REST client for the cart service.

use async_trait::async_trait;
use salesdesk_core::cart::SavePayload;
use salesdesk_core::services::{CartService, ServiceError};
use salesdesk_core::types::DbId;

use crate::config::ClientConfig;
use crate::error::{ensure_success, ApiError};

/// HTTP client for cart line add/update.
pub struct CartApi {
    client: reqwest::Client,
    base_url: String,
}

impl CartApi {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Create a client from [`ClientConfig`], applying its request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            config.http_client()?,
            config.api_base_url.clone(),
        ))
    }

    /// Add a new line to the active cart (`POST /cart/items`).
    pub async fn add_item(&self, payload: &SavePayload) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/cart/items", self.base_url))
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Update an existing cart line (`PUT /cart/items/{id}`).
    pub async fn update_item(&self, line_id: DbId, payload: &SavePayload) -> Result<(), ApiError> {
        let response = self
            .client
            .put(format!("{}/cart/items/{line_id}", self.base_url))
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CartService for CartApi {
    async fn add_item(&self, payload: &SavePayload) -> Result<(), ServiceError> {
        CartApi::add_item(self, payload)
            .await
            .map_err(ServiceError::from)
    }

    async fn update_item(&self, line_id: DbId, payload: &SavePayload) -> Result<(), ServiceError> {
        CartApi::update_item(self, line_id, payload)
            .await
            .map_err(ServiceError::from)
    }
}
