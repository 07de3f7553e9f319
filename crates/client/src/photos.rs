//! REST client for the per-group item photo endpoint.

use async_trait::async_trait;
use salesdesk_core::configuration::ItemPhotos;
use salesdesk_core::services::{PhotoSource, ServiceError};
use salesdesk_core::types::DbId;

use crate::config::ClientConfig;
use crate::error::{ensure_success, ApiError};

/// HTTP client for configuration item photos.
pub struct PhotoApi {
    client: reqwest::Client,
    base_url: String,
}

impl PhotoApi {
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

    /// Fetch the item photos of one configuration group.
    ///
    /// Sends `GET /configuration-groups/{id}/photos` with the group name
    /// and optional project as query parameters.
    pub async fn get_group_photos(
        &self,
        group_id: DbId,
        group_name: &str,
        project_id: Option<DbId>,
    ) -> Result<Vec<ItemPhotos>, ApiError> {
        let mut request = self
            .client
            .get(format!(
                "{}/configuration-groups/{group_id}/photos",
                self.base_url
            ))
            .query(&[("groupName", group_name)]);
        if let Some(project_id) = project_id {
            request = request.query(&[("projectId", project_id)]);
        }

        let response = request.send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PhotoSource for PhotoApi {
    async fn get_group_photos(
        &self,
        group_id: DbId,
        group_name: &str,
        project_id: Option<DbId>,
    ) -> Result<Vec<ItemPhotos>, ServiceError> {
        PhotoApi::get_group_photos(self, group_id, group_name, project_id)
            .await
            .map_err(ServiceError::from)
    }
}
