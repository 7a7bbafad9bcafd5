use tauri::State;
use tracing::debug;

use crate::services::view_state::ViewState;

use super::{AppState, CommandResult};

/// Looks up `phone`, waits for the insight and returns the resulting view.
#[tauri::command]
pub async fn search_submit(state: State<'_, AppState>, phone: String) -> CommandResult<ViewState> {
    let (pending, insights) =
        state.with_controller(|controller| (controller.begin_search(phone), controller.insights()))?;

    if let Some(record) = pending {
        let insight = insights.insight_for(&record).await;
        state.with_controller(|controller| controller.complete_search(insight))?;
    } else {
        debug!(target: "app::command", "search skipped");
    }

    state.snapshot()
}
