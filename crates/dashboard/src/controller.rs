use analysis_client::{AnalysisProvider, ClientError};
use analysis_core::{AnalyzeRequest, NewsCategory};
use thiserror::Error;

use crate::view::{RequestKind, View, ViewMachine};

/// Articles requested for the news listing.
pub const NEWS_LIMIT: u32 = 10;

/// Message shown to the user when an action fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Alert {
    pub message: String,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&ClientError> for Alert {
    fn from(err: &ClientError) -> Self {
        Alert::new(err.user_message())
    }
}

/// Drives the view machine with one request/response cycle per action.
pub struct Dashboard<P> {
    provider: P,
    view: ViewMachine,
    last_request: Option<AnalyzeRequest>,
}

impl<P: AnalysisProvider> Dashboard<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            view: ViewMachine::new(),
            last_request: None,
        }
    }

    pub fn view(&self) -> &View {
        self.view.state()
    }

    /// The request behind the results currently shown.
    pub fn last_request(&self) -> Option<&AnalyzeRequest> {
        self.last_request.as_ref()
    }

    pub async fn analyze(&mut self, request: AnalyzeRequest) -> Result<&View, Alert> {
        let request = request
            .normalized()
            .map_err(|e| Alert::from(&ClientError::from(e)))?;

        let ticket = self.view.begin(RequestKind::Analysis);
        match self.provider.analyze(&request).await {
            Ok(result) => {
                self.view.resolve_analysis(ticket, result);
                self.last_request = Some(request);
                Ok(self.view.state())
            }
            Err(e) => {
                tracing::warn!(
                    "Analysis of {} via {} failed: {}",
                    request.ticker,
                    self.provider.backend_name(),
                    e
                );
                let alert = Alert::from(&e);
                self.view.fail(ticket, alert.message.clone());
                Err(alert)
            }
        }
    }

    pub async fn show_news(&mut self, category: NewsCategory) -> Result<&View, Alert> {
        self.show_news_limited(category, NEWS_LIMIT).await
    }

    pub async fn show_news_limited(
        &mut self,
        category: NewsCategory,
        limit: u32,
    ) -> Result<&View, Alert> {
        let ticket = self.view.begin(RequestKind::News(category));
        match self.provider.fetch_news(category, limit).await {
            Ok(feed) => {
                self.view.resolve_news(ticket, category, feed);
                Ok(self.view.state())
            }
            Err(e) => {
                tracing::warn!("Loading {} news failed: {}", category, e);
                let alert = Alert::from(&e);
                self.view.fail(ticket, alert.message.clone());
                Err(alert)
            }
        }
    }

    pub fn go_home(&mut self) {
        self.view.go_home();
    }
}
