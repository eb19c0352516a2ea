use analysis_core::{AnalysisResult, AnalyzeRequest, NewsCategory, NewsFeed};
use async_trait::async_trait;

use crate::error::ClientResult;
use crate::AnalysisClient;

/// Backend-agnostic interface to the analysis service.
///
/// The dashboard only talks to this trait, so views can be driven by a stub
/// in tests.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> ClientResult<AnalysisResult>;

    async fn fetch_news(&self, category: NewsCategory, limit: u32) -> ClientResult<NewsFeed>;

    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl AnalysisProvider for AnalysisClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> ClientResult<AnalysisResult> {
        AnalysisClient::analyze(self, request).await
    }

    async fn fetch_news(&self, category: NewsCategory, limit: u32) -> ClientResult<NewsFeed> {
        AnalysisClient::fetch_news(self, category, limit).await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
