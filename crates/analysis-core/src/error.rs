use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{field} must be between 0 and 1 (got {value})")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Unknown news category: {0}")]
    UnknownCategory(String),
}
