#[cfg(feature = "desktop")]
pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(error) = try_run() {
        eprintln!("failed to launch application: {error}");
    }
}

#[cfg(feature = "desktop")]
fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let handle = app.handle();

            let mut log_dir = handle
                .path()
                .app_data_dir()
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;
            log_dir.push("logs");

            let log_config = crate::utils::logger::LoggerConfig::from_env(log_dir);
            crate::utils::logger::init_logging(&log_config)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            let state = crate::commands::AppState::new()
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;
            app.manage(state);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            crate::commands::view::view_select,
            crate::commands::view::view_snapshot,
            crate::commands::search::search_submit,
            crate::commands::entries::entry_form_open,
            crate::commands::entries::entry_form_close,
            crate::commands::entries::entry_draft_update,
            crate::commands::entries::entry_submit,
            crate::commands::entries::entries_mine,
            crate::commands::entries::entries_feed,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
