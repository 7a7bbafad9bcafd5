use tauri::State;

use crate::models::view::ViewType;
use crate::services::view_state::ViewState;

use super::{AppState, CommandResult};

#[tauri::command]
pub fn view_select(state: State<'_, AppState>, view: ViewType) -> CommandResult<ViewState> {
    state.with_controller(|controller| controller.select_view(view))?;
    state.snapshot()
}

#[tauri::command]
pub fn view_snapshot(state: State<'_, AppState>) -> CommandResult<ViewState> {
    state.snapshot()
}
