//! REST client for the product configuration endpoint.

use async_trait::async_trait;
use salesdesk_core::configuration::ProductConfiguration;
use salesdesk_core::services::{ConfigurationSource, ServiceError};
use salesdesk_core::types::{DbId, PricingContext};

use crate::config::ClientConfig;
use crate::error::{ensure_success, ApiError};

/// HTTP client for product configuration lookups.
pub struct CatalogApi {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogApi {
    /// Create a new client against the given API base URL.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful for
    /// connection pooling across the API clients).
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

    /// Fetch a product's configuration groups and base pricing.
    ///
    /// Sends `GET /products/{id}/configurations` with the pricing context
    /// as query parameters. Prices depend on that context, so a cached
    /// response for one customer/project must never be reused for another.
    pub async fn get_configurations(
        &self,
        product_id: DbId,
        ctx: &PricingContext,
    ) -> Result<ProductConfiguration, ApiError> {
        let mut request = self
            .client
            .get(format!(
                "{}/products/{product_id}/configurations",
                self.base_url
            ));
        if let Some(customer_id) = ctx.customer_id {
            request = request.query(&[("customerId", customer_id)]);
        }
        if let Some(project_id) = ctx.project_id {
            request = request.query(&[("projectId", project_id)]);
        }

        let response = request.send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ConfigurationSource for CatalogApi {
    async fn get_configurations(
        &self,
        product_id: DbId,
        ctx: &PricingContext,
    ) -> Result<ProductConfiguration, ServiceError> {
        CatalogApi::get_configurations(self, product_id, ctx)
            .await
            .map_err(ServiceError::from)
    }
}
