use tauri::State;

use crate::models::experience::{ExperienceDraft, ExperienceEntry};
use crate::services::view_state::ViewState;

use super::{AppState, CommandError, CommandResult};

#[tauri::command]
pub fn entry_form_open(state: State<'_, AppState>) -> CommandResult<ViewState> {
    state.with_controller(|controller| controller.open_add_entry())?;
    state.snapshot()
}

#[tauri::command]
pub fn entry_form_close(state: State<'_, AppState>) -> CommandResult<ViewState> {
    state.with_controller(|controller| controller.close_add_entry())?;
    state.snapshot()
}

#[tauri::command]
pub fn entry_draft_update(
    state: State<'_, AppState>,
    draft: ExperienceDraft,
) -> CommandResult<ViewState> {
    state.with_controller(|controller| controller.update_draft(draft))?;
    state.snapshot()
}

/// Posts the current draft. Incomplete drafts are reported as a validation error
/// and leave the form open.
#[tauri::command]
pub fn entry_submit(state: State<'_, AppState>) -> CommandResult<ExperienceEntry> {
    state.with_controller(|controller| {
        controller.submit_entry().ok_or_else(|| {
            let message = controller
                .state()
                .form_error
                .clone()
                .unwrap_or_else(|| "required fields are missing".to_string());
            CommandError::new("VALIDATION_ERROR", message, None)
        })
    })?
}

#[tauri::command]
pub fn entries_mine(state: State<'_, AppState>) -> CommandResult<Vec<ExperienceEntry>> {
    state.with_controller(|controller| controller.my_entries())
}

#[tauri::command]
pub fn entries_feed(state: State<'_, AppState>) -> CommandResult<Vec<ExperienceEntry>> {
    state.with_controller(|controller| controller.network_feed().to_vec())
}
