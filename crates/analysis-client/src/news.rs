use analysis_core::{NewsCategory, NewsFeed};

use crate::error::{ClientError, ClientResult};
use crate::{wire, AnalysisClient};

/// Articles requested per listing page.
pub const DEFAULT_NEWS_LIMIT: u32 = 10;

impl AnalysisClient {
    /// Fetch the market news listing for a category.
    pub async fn fetch_news(&self, category: NewsCategory, limit: u32) -> ClientResult<NewsFeed> {
        let url = self.endpoint("news");
        let limit = limit.to_string();

        tracing::debug!("Fetching {} news (limit {})", category, limit);

        let response = self
            .client
            .get(&url)
            .query(&[("category", category.as_str()), ("limit", limit.as_str())])
            .send()
            .await
            .inspect_err(|e| tracing::warn!("News request to {} failed: {}", url, e))?;

        let status = response.status();
        let body = wire::read_body(response).await?;

        if !status.is_success() {
            let message = wire::error_message_from_body(&body);
            tracing::warn!("News request failed with status {}", status);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let value = wire::parse_lenient(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if let Some(message) = wire::error_message(&value) {
            tracing::warn!("News request returned an error body: {}", message);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: Some(message),
            });
        }

        let feed: NewsFeed = serde_json::from_value(value)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        tracing::info!("Loaded {} {} news articles", feed.articles.len(), category);
        Ok(feed)
    }
}
