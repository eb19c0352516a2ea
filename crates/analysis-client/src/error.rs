use analysis_core::AnalysisError;
use thiserror::Error;

/// Alert shown when the analysis server cannot be reached at all.
pub const CONNECT_FAILURE_MESSAGE: &str =
    "Failed to connect to the analysis server. Make sure api.py is running.";

/// Alert shown when the server fails without saying why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Server returned status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Server { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    InvalidRequest(#[from] AnalysisError),
}

impl ClientError {
    /// Text for the user-facing alert. Server messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::RequestFailed(_) => CONNECT_FAILURE_MESSAGE.to_string(),
            ClientError::Server { message: Some(message), .. } => message.clone(),
            ClientError::Server { message: None, .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            ClientError::InvalidResponse(detail) => {
                format!("Unexpected response from the analysis server: {}", detail)
            }
            ClientError::InvalidRequest(e) => e.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ClientError::Server {
            status: 500,
            message: Some("Ticker XYZ not found in fetched data.".to_string()),
        };
        assert_eq!(err.user_message(), "Ticker XYZ not found in fetched data.");
        assert_eq!(
            err.to_string(),
            "Server returned status 500: Ticker XYZ not found in fetched data."
        );
    }

    #[test]
    fn test_fallback_messages() {
        let err = ClientError::Server { status: 502, message: None };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = ClientError::InvalidRequest(AnalysisError::InvalidInput(
            "ticker symbol is required".to_string(),
        ));
        assert_eq!(err.user_message(), "Invalid input: ticker symbol is required");
    }
}
