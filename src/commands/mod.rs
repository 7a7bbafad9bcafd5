pub mod entries;
pub mod search;
pub mod view;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};
use crate::services::controller::AppController;
use crate::services::insight_service::InsightService;
use crate::services::reputation_service::ReputationService;
use crate::services::view_state::ViewState;

#[derive(Clone)]
pub struct AppState {
    controller: Arc<Mutex<AppController>>,
}

impl AppState {
    pub fn new() -> AppResult<Self> {
        let insights = Arc::new(InsightService::from_env()?);
        Ok(Self::from_controller(AppController::new(
            ReputationService::new(),
            insights,
        )))
    }

    pub fn from_controller(controller: AppController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    /// Runs `f` with exclusive access to the controller. The lock is never held
    /// across an await point.
    pub fn with_controller<T>(
        &self,
        f: impl FnOnce(&mut AppController) -> T,
    ) -> CommandResult<T> {
        let mut guard = self.controller.lock().map_err(|_| {
            error!(target: "app::command", "controller lock poisoned");
            CommandError::new("UNKNOWN", "application state unavailable", None)
        })?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self) -> CommandResult<ViewState> {
        self.with_controller(|controller| controller.state().clone())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation { message, details } => {
                CommandError::new("VALIDATION_ERROR", message, details)
            }
            AppError::Insight {
                code,
                message,
                correlation_id,
                details,
            } => {
                warn!(target: "app::command", code = %code, "insight error reached command layer");
                let details = match (details, correlation_id) {
                    (Some(JsonValue::Object(mut map)), Some(id)) => {
                        map.insert("correlationId".to_string(), JsonValue::String(id));
                        Some(JsonValue::Object(map))
                    }
                    (None, Some(id)) => Some(serde_json::json!({ "correlationId": id })),
                    (details, _) => details,
                };
                CommandError::new(code.as_str(), message, details)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "file system access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}
