//! Error types for dashboard operations

use analyzer_llm::LLMError;
use analyzer_prompt::PromptError;
use thiserror::Error;

/// Errors raised while fetching, analyzing or rendering a dashboard
#[derive(Debug, Error)]
pub enum DashboardError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Symbol rejected by the data provider
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Form input that cannot be analyzed at all
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Completion endpoint error
    #[error("LLM error: {0}")]
    LlmError(#[from] LLMError),

    /// Prompt template error
    #[error("Prompt error: {0}")]
    PromptError(#[from] PromptError),

    /// Page or report rendering error
    #[error("Render error: {0}")]
    RenderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DashboardError {
    /// Whether the failure came from a remote service rather than from us
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DashboardError::ApiError(_)
                | DashboardError::InvalidSymbol(_)
                | DashboardError::DataUnavailable { .. }
                | DashboardError::NetworkError(_)
                | DashboardError::JsonError(_)
                | DashboardError::YahooFinanceError(_)
                | DashboardError::LlmError(_)
        )
    }
}

impl From<minijinja::Error> for DashboardError {
    fn from(err: minijinja::Error) -> Self {
        DashboardError::RenderError(err.to_string())
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
