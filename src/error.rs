use std::fmt;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightErrorCode {
    MissingApiKey,
    Forbidden,
    HttpTimeout,
    RateLimited,
    InvalidResponse,
    InvalidRequest,
    ProviderUnavailable,
    Unknown,
}

impl InsightErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            InsightErrorCode::MissingApiKey => "MISSING_API_KEY",
            InsightErrorCode::Forbidden => "FORBIDDEN",
            InsightErrorCode::HttpTimeout => "HTTP_TIMEOUT",
            InsightErrorCode::RateLimited => "RATE_LIMITED",
            InsightErrorCode::InvalidResponse => "INVALID_RESPONSE",
            InsightErrorCode::InvalidRequest => "INVALID_REQUEST",
            InsightErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            InsightErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for InsightErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("{message}")]
    Insight {
        code: InsightErrorCode,
        message: String,
        correlation_id: Option<String>,
        details: Option<JsonValue>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn insight(code: InsightErrorCode, message: impl Into<String>) -> Self {
        Self::insight_with_details(code, message, None, None)
    }

    pub fn insight_with_details(
        code: InsightErrorCode,
        message: impl Into<String>,
        correlation_id: Option<&str>,
        details: Option<JsonValue>,
    ) -> Self {
        let message = message.into();
        let correlation = correlation_id.map(|value| value.to_string());
        match (&correlation, &details) {
            (Some(id), Some(payload)) => {
                warn!(
                    target: "app::insight::error",
                    code = %code,
                    correlation_id = %id,
                    details = %payload,
                    %message
                );
            }
            (Some(id), None) => {
                warn!(
                    target: "app::insight::error",
                    code = %code,
                    correlation_id = %id,
                    %message
                );
            }
            (None, Some(payload)) => {
                warn!(target: "app::insight::error", code = %code, details = %payload, %message);
            }
            (None, None) => {
                warn!(target: "app::insight::error", code = %code, %message);
            }
        }

        AppError::Insight {
            code,
            message,
            correlation_id: correlation,
            details,
        }
    }

    pub fn insight_code(&self) -> Option<InsightErrorCode> {
        match self {
            AppError::Insight { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn insight_correlation_id(&self) -> Option<&str> {
        match self {
            AppError::Insight { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insight_error_exposes_code_and_correlation() {
        let error = AppError::insight_with_details(
            InsightErrorCode::RateLimited,
            "slow down",
            Some("corr-1"),
            Some(json!({ "status": 429 })),
        );

        assert_eq!(error.insight_code(), Some(InsightErrorCode::RateLimited));
        assert_eq!(error.insight_correlation_id(), Some("corr-1"));
        assert_eq!(error.to_string(), "slow down");
    }

    #[test]
    fn validation_error_has_no_insight_code() {
        let error = AppError::validation("phone is required");
        assert_eq!(error.insight_code(), None);
        assert_eq!(error.to_string(), "Validation failed: phone is required");
    }

    #[test]
    fn code_strings_are_stable() {
        assert_eq!(InsightErrorCode::MissingApiKey.to_string(), "MISSING_API_KEY");
        assert_eq!(
            InsightErrorCode::ProviderUnavailable.as_str(),
            "PROVIDER_UNAVAILABLE"
        );
        assert_eq!(InsightErrorCode::Unknown.as_str(), "UNKNOWN");
    }
}
