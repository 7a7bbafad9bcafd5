use serde::{Deserialize, Serialize};

/// Sentence shown whenever the insight provider cannot answer.
pub const FALLBACK_INSIGHT: &str = "Unable to generate smart insight at this moment.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InsightSource {
    Online,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightOutcome {
    pub text: String,
    pub source: InsightSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl InsightOutcome {
    pub fn online(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: InsightSource::Online,
            error_code: None,
        }
    }

    pub fn fallback(error_code: Option<String>) -> Self {
        Self {
            text: FALLBACK_INSIGHT.to_string(),
            source: InsightSource::Fallback,
            error_code,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == InsightSource::Fallback
    }
}
