use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult, InsightErrorCode};
use crate::models::insight::InsightOutcome;
use crate::models::reputation::ReputationRecord;
use crate::services::prompt_templates::{
    build_insight_log_payload, build_insight_prompt, build_insight_request_body,
};
use crate::utils::redact::redact_sensitive_data;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything able to turn a reputation record into an advisory sentence.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, record: &ReputationRecord) -> AppResult<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightServiceConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub http_timeout: StdDuration,
}

impl InsightServiceConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through `lookup`, which maps a variable name to its value.
    /// A blank primary key falls through to `API_KEY`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_blank("TRUSTSHIELD_GEMINI_API_KEY").or_else(|| non_blank("API_KEY"));
        let api_base_url = non_blank("TRUSTSHIELD_GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model =
            non_blank("TRUSTSHIELD_GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = match non_blank("TRUSTSHIELD_INSIGHT_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
                warn!(
                    target: "app::insight",
                    value = %raw,
                    error = %err,
                    "invalid insight timeout, using default"
                );
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_key,
            api_base_url,
            model,
            http_timeout: StdDuration::from_secs(timeout_secs),
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        self.api_key = self
            .api_key
            .take()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }
}

impl Default for InsightServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_timeout: StdDuration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Requests merchant advice for a reputation record.
///
/// Failures never leave this service: every error is logged and replaced by
/// [`crate::models::insight::FALLBACK_INSIGHT`]. Each request is bounded by the
/// configured timeout so a hung provider cannot keep the caller waiting forever.
#[derive(Clone)]
pub struct InsightService {
    provider: Option<Arc<dyn InsightProvider>>,
    timeout: StdDuration,
}

impl InsightService {
    pub fn new(config: InsightServiceConfig) -> AppResult<Self> {
        let config = config.normalized();
        let provider: Option<Arc<dyn InsightProvider>> = match &config.api_key {
            Some(api_key) => {
                let gemini: Arc<dyn InsightProvider> =
                    Arc::new(GeminiProvider::try_new(&config, api_key.clone())?);
                Some(gemini)
            }
            None => {
                warn!(target: "app::insight", "Gemini API key not configured, insights will fall back");
                None
            }
        };

        Ok(Self {
            provider,
            timeout: config.http_timeout,
        })
    }

    pub fn from_env() -> AppResult<Self> {
        Self::new(InsightServiceConfig::from_env())
    }

    pub fn with_provider(provider: Arc<dyn InsightProvider>, timeout: StdDuration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn analyze(&self, record: &ReputationRecord) -> InsightOutcome {
        match self.request(record).await {
            Ok(text) => InsightOutcome::online(text),
            Err(error) => {
                warn!(
                    target: "app::insight",
                    error = %error,
                    code = ?error.insight_code(),
                    "insight generation failed, using fallback"
                );
                InsightOutcome::fallback(error.insight_code().map(|code| code.as_str().to_string()))
            }
        }
    }

    pub async fn insight_for(&self, record: &ReputationRecord) -> String {
        self.analyze(record).await.text
    }

    async fn request(&self, record: &ReputationRecord) -> AppResult<String> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            AppError::insight(InsightErrorCode::MissingApiKey, "Gemini API key is not configured")
        })?;

        debug!(target: "app::insight", provider = provider.name(), "requesting insight");

        match tokio::time::timeout(self.timeout, provider.generate(record)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::insight_with_details(
                InsightErrorCode::HttpTimeout,
                "Insight request timed out",
                None,
                Some(json!({ "timeoutMs": self.timeout.as_millis() as u64 })),
            )),
        }
    }
}

struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiProvider {
    fn try_new(config: &InsightServiceConfig, api_key: String) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(StdDuration::from_secs(90)))
            .build()
            .map_err(|err| AppError::other(format!("failed to build Gemini HTTP client: {err}")))?;

        let base_url = config.api_base_url.trim_end_matches('/');
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url, config.model
        );

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: config.model.clone(),
        })
    }

    fn extract_text(body: &JsonValue, correlation_id: &str) -> AppResult<String> {
        let parts = body
            .pointer("/candidates/0/content/parts")
            .and_then(|value| value.as_array())
            .ok_or_else(|| {
                AppError::insight_with_details(
                    InsightErrorCode::InvalidResponse,
                    "Gemini response is missing candidate content",
                    Some(correlation_id),
                    Some(json!({ "reason": "missing_candidate_parts" })),
                )
            })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|value| value.as_str()))
            .collect();
        let text = text.trim();

        if text.is_empty() {
            return Err(AppError::insight_with_details(
                InsightErrorCode::InvalidResponse,
                "Gemini returned an empty insight",
                Some(correlation_id),
                Some(json!({ "reason": "empty_text" })),
            ));
        }

        Ok(text.to_string())
    }

    fn map_http_error(status: StatusCode, correlation_id: &str) -> AppError {
        let (code, message) = match status {
            StatusCode::UNAUTHORIZED => (
                InsightErrorCode::MissingApiKey,
                "Gemini API key is invalid or unauthorized".to_string(),
            ),
            StatusCode::FORBIDDEN => (
                InsightErrorCode::Forbidden,
                "Gemini API access denied".to_string(),
            ),
            StatusCode::TOO_MANY_REQUESTS => (
                InsightErrorCode::RateLimited,
                "Gemini rate limit reached, retry later".to_string(),
            ),
            status if status.is_server_error() => (
                InsightErrorCode::ProviderUnavailable,
                format!("Gemini service unavailable (status {})", status.as_u16()),
            ),
            StatusCode::BAD_REQUEST => (
                InsightErrorCode::InvalidRequest,
                "Gemini rejected the request".to_string(),
            ),
            StatusCode::NOT_FOUND => (
                InsightErrorCode::InvalidRequest,
                "Gemini endpoint or model not found".to_string(),
            ),
            status => (
                InsightErrorCode::Unknown,
                format!("Gemini returned status {}", status.as_u16()),
            ),
        };

        AppError::insight_with_details(code, message, Some(correlation_id), None)
    }

    fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> AppError {
        if err.is_timeout() {
            AppError::insight_with_details(
                InsightErrorCode::HttpTimeout,
                "Gemini request timed out",
                Some(correlation_id),
                None,
            )
        } else if err.is_connect() {
            AppError::insight_with_details(
                InsightErrorCode::ProviderUnavailable,
                "Gemini connection failed",
                Some(correlation_id),
                None,
            )
        } else if let Some(status) = err.status() {
            Self::map_http_error(status, correlation_id)
        } else {
            AppError::insight_with_details(
                InsightErrorCode::Unknown,
                format!("Gemini request failed: {err}"),
                Some(correlation_id),
                None,
            )
        }
    }
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, record: &ReputationRecord) -> AppResult<String> {
        let correlation_id = Uuid::new_v4().to_string();
        let prompt = build_insight_prompt(record);
        let request_body = build_insight_request_body(&prompt);

        let log_payload = redact_sensitive_data(&build_insight_log_payload(record, &self.model));
        debug!(
            target: "app::insight::gemini",
            correlation_id = %correlation_id,
            payload = %log_payload,
            "invoking Gemini"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| Self::error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(
                target: "app::insight::gemini",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                latency_ms,
                "Gemini returned non-success status"
            );
            return Err(Self::map_http_error(status, &correlation_id));
        }

        let body: JsonValue = response.json().await.map_err(|err| {
            AppError::insight_with_details(
                InsightErrorCode::InvalidResponse,
                "failed to decode Gemini response",
                Some(correlation_id.as_str()),
                Some(json!({ "reason": err.to_string() })),
            )
        })?;

        let text = Self::extract_text(&body, &correlation_id)?;
        info!(
            target: "app::insight::gemini",
            correlation_id = %correlation_id,
            latency_ms,
            response_len = text.len(),
            "Gemini insight received"
        );

        Ok(text)
    }
}

pub mod testing {
    use super::*;

    /// Expose Gemini error mapping for integration tests without widening the public API surface.
    pub fn map_http_error(status: StatusCode) -> AppError {
        GeminiProvider::map_http_error(status, "test-correlation-id")
    }

    pub fn extract_text(body: &JsonValue) -> AppResult<String> {
        GeminiProvider::extract_text(body, "test-correlation-id")
    }
}
