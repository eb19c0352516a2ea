pub mod analyze;
pub mod error;
pub mod news;
pub mod provider;
mod wire;

pub use error::{ClientError, ClientResult, CONNECT_FAILURE_MESSAGE, GENERIC_FAILURE_MESSAGE};
pub use provider::AnalysisProvider;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Where the analysis service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` waits for as long as the server takes.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let timeout = std::env::var("SMART_INVEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            base_url: std::env::var("SMART_INVEST_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout,
        }
    }
}

/// HTTP client for the analysis service (`/analyze`, `/news`).
#[derive(Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_defaults() -> ClientResult<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check service health
    pub async fn health(&self) -> ClientResult<bool> {
        let response = self.client.get(self.endpoint("")).send().await?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = AnalysisClient::new(ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.endpoint("analyze"), "http://localhost:5000/analyze");
    }

    #[test]
    fn test_config_timeout_is_optional() {
        let config = ClientConfig::new(DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        let config = config.with_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200).body("ok");
            })
            .await;

        let client = AnalysisClient::new(ClientConfig::new(server.base_url())).unwrap();
        assert!(client.health().await.unwrap());
        mock.assert_async().await;
    }
}
