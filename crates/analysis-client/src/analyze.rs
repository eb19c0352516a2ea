use analysis_core::{AnalysisResult, AnalyzeRequest};

use crate::error::{ClientError, ClientResult};
use crate::{wire, AnalysisClient};

impl AnalysisClient {
    /// Run one analysis. The request is normalized and validated before it
    /// is sent; a body without the required scores is an `InvalidResponse`.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> ClientResult<AnalysisResult> {
        let request = request.clone().normalized()?;
        let url = self.endpoint("analyze");

        tracing::info!(
            "Requesting analysis for {} (threshold {:.2}, max news {})",
            request.ticker,
            request.threshold,
            request.max_news
        );

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Analysis request to {} failed: {}", url, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = wire::read_body(response).await?;

        if !status.is_success() {
            let message = wire::error_message_from_body(&body);
            tracing::warn!(
                "Analysis of {} failed with status {}: {}",
                request.ticker,
                status,
                message.as_deref().unwrap_or("<no error message>")
            );
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let value = wire::parse_lenient(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if let Some(message) = wire::error_message(&value) {
            tracing::warn!("Analysis of {} returned an error body: {}", request.ticker, message);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: Some(message),
            });
        }

        let result: AnalysisResult = serde_json::from_value(value)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            "Analysis for {} complete: final score {:.2}, {} articles",
            result.ticker,
            result.final_score,
            result.articles.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> AnalysisClient {
        AnalysisClient::new(ClientConfig::new(server.base_url())).unwrap()
    }

    fn success_body() -> serde_json::Value {
        json!({
            "ticker": "TCS.NS",
            "currentPrice": 3921.5,
            "priceChange": 1.25,
            "sentimentScore": 0.58,
            "technicalScore": 0.65,
            "fundamentalScore": 0.75,
            "finalScore": 0.68,
            "fundamentals": {"totalRevenue": 2408930000000.0, "trailingPE": 29.4},
            "news": [{"title": "TCS wins deal", "compound": 0.6}]
        })
    }

    #[tokio::test]
    async fn test_analyze_sends_defaults_and_parses_result() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze").json_body(json!({
                    "ticker": "TCS.NS",
                    "maxNews": 20,
                    "threshold": 0.6,
                    "sentimentWeight": 0.3,
                    "technicalWeight": 0.3,
                    "fundamentalWeight": 0.4
                }));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(success_body());
            })
            .await;

        let result = client_for(&server)
            .analyze(&AnalyzeRequest::new(" tcs.ns "))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.ticker, "TCS.NS");
        assert_eq!(result.final_score, 0.68);
        assert_eq!(result.fundamentals.trailing_pe, Some(29.4));
        assert_eq!(result.articles.len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_accepts_nan_fundamentals() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(200).body(
                    r#"{"ticker": "INFY.NS", "currentPrice": 1500.0, "priceChange": 0.0,
                        "sentimentScore": 0.5, "technicalScore": 0.5, "fundamentalScore": 0.5,
                        "finalScore": 0.5, "fundamentals": {"trailingPE": NaN, "eps": NaN}}"#,
                );
            })
            .await;

        let result = client_for(&server)
            .analyze(&AnalyzeRequest::new("INFY.NS"))
            .await
            .unwrap();
        assert_eq!(result.fundamentals.trailing_pe, None);
    }

    #[tokio::test]
    async fn test_analyze_surfaces_server_error_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(500).json_body(json!({
                    "error": "Yahoo Finance returned no data for XYZ."
                }));
            })
            .await;

        let err = client_for(&server)
            .analyze(&AnalyzeRequest::new("XYZ"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Server { status: 500, .. }));
        assert_eq!(err.user_message(), "Yahoo Finance returned no data for XYZ.");
    }

    #[tokio::test]
    async fn test_analyze_without_error_body_uses_generic_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(502).body("Bad Gateway");
            })
            .await;

        let err = client_for(&server)
            .analyze(&AnalyzeRequest::new("TCS"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Something went wrong");
    }

    #[tokio::test]
    async fn test_error_body_with_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(200).json_body(json!({"error": "rate limited"}));
            })
            .await;

        let err = client_for(&server)
            .analyze(&AnalyzeRequest::new("TCS"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "rate limited");
    }

    #[tokio::test]
    async fn test_missing_scores_are_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(200).json_body(json!({"ticker": "TCS", "currentPrice": 1.0}));
            })
            .await;

        let err = client_for(&server)
            .analyze(&AnalyzeRequest::new("TCS"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(200).json_body(success_body());
            })
            .await;

        let err = client_for(&server)
            .analyze(&AnalyzeRequest::new("TCS").threshold(Some(2.0)))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidRequest(_)));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Nothing listens on port 1.
        let client = AnalysisClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let err = client.analyze(&AnalyzeRequest::new("TCS")).await.unwrap_err();

        assert!(matches!(err, ClientError::RequestFailed(_)));
        assert_eq!(err.user_message(), crate::CONNECT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_odd_article_entries_do_not_fail_the_analysis() {
        let server = MockServer::start_async().await;
        let mut body = success_body();
        body["news"] = json!([{"compound": 0.3}, null, "x"]);
        server
            .mock_async(|when, then| {
                when.method(POST).path("/analyze");
                then.status(200).json_body(body.clone());
            })
            .await;

        let result = client_for(&server)
            .analyze(&AnalyzeRequest::new("TCS.NS"))
            .await
            .unwrap();
        assert_eq!(result.articles.len(), 3);
    }
}
