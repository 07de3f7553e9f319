//! Shared HTTP client error type.

use salesdesk_core::services::ServiceError;

/// Errors from the REST client layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) => ServiceError::Transport(e.to_string()),
            ApiError::Api { status, body } => ServiceError::Api {
                status,
                message: body,
            },
        }
    }
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or an [`ApiError::Api`] carrying the status and
/// body text on failure.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ApiError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
