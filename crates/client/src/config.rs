//! Client configuration loaded from environment variables.

use std::time::Duration;

/// Connection settings for the remote backend.
///
/// All fields have defaults suitable for local development; override via
/// environment variables (a `.env` file is honored by [`ClientConfig::load`]).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base HTTP URL of the REST API (default: `http://localhost:3000/api`).
    pub api_base_url: String,
    /// Base WebSocket URL of the notification feed
    /// (default: `ws://localhost:3000`).
    pub ws_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration, reading a `.env` file first when present.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `API_BASE_URL`         | `http://localhost:3000/api` |
    /// | `WS_URL`               | `ws://localhost:3000`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Self {
        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000/api".into());

        let ws_url = std::env::var("WS_URL").unwrap_or_else(|_| "ws://localhost:3000".into());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_base_url,
            ws_url,
            request_timeout_secs,
        }
    }

    /// Build a [`reqwest::Client`] with [`Self::request_timeout_secs`]
    /// applied to every request.
    ///
    /// Pass the returned client to the API clients' `with_client`
    /// constructors (or use their `from_config`) so they share one
    /// connection pool.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_client_builds_with_configured_timeout() {
        let config = ClientConfig {
            api_base_url: "http://localhost:3000/api".into(),
            ws_url: "ws://localhost:3000".into(),
            request_timeout_secs: 5,
        };
        assert!(config.http_client().is_ok());
    }
}
