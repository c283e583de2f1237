// Tauri commands invoked by the toolbar and settings pages.
// Each one is a thin forward into the tab manager or settings controller.

use log::info;
use tauri::{AppHandle, Manager, State};

use crate::modules::navigation::NavCommand;
use crate::modules::tabs::TabStrip;
use crate::modules::webview::TabId;
use crate::settings::Settings;
use crate::state::{AppState, BrowserTabs};
use crate::webview_host::{apply_theme, emit_tabs};

/// Run `f` against the tab manager, then push the tab strip to the toolbar.
pub fn with_tabs<T>(
    app: &AppHandle,
    state: &AppState,
    f: impl FnOnce(&mut BrowserTabs) -> T,
) -> Result<T, String> {
    let mut tabs = state.tabs.lock().map_err(|e| e.to_string())?;
    state.drain_into(&mut tabs);
    let result = f(&mut tabs);
    state.drain_into(&mut tabs);
    emit_tabs(app, &tabs);
    Ok(result)
}

fn navigate(app: &AppHandle, state: &AppState, command: NavCommand) -> Result<(), String> {
    with_tabs(app, state, |tabs| tabs.dispatch_navigation(command))
}

#[tauri::command]
pub fn go_back(app: AppHandle, state: State<AppState>) -> Result<(), String> {
    navigate(&app, &state, NavCommand::Back)
}

#[tauri::command]
pub fn go_forward(app: AppHandle, state: State<AppState>) -> Result<(), String> {
    navigate(&app, &state, NavCommand::Forward)
}

#[tauri::command]
pub fn reload_page(app: AppHandle, state: State<AppState>) -> Result<(), String> {
    navigate(&app, &state, NavCommand::Reload)
}

#[tauri::command]
pub fn navigate_home(app: AppHandle, state: State<AppState>) -> Result<(), String> {
    navigate(&app, &state, NavCommand::Home)
}

#[tauri::command]
pub fn load_page(app: AppHandle, state: State<AppState>, query: String) -> Result<(), String> {
    navigate(&app, &state, NavCommand::Load(query))
}

#[tauri::command]
pub fn add_tab(app: AppHandle, state: State<AppState>) -> Result<TabId, String> {
    with_tabs(&app, &state, |tabs| tabs.add_tab())
}

#[tauri::command]
pub fn close_tab(app: AppHandle, state: State<AppState>, id: TabId) -> Result<(), String> {
    with_tabs(&app, &state, |tabs| tabs.close_tab(id))
}

#[tauri::command]
pub fn switch_tab(app: AppHandle, state: State<AppState>, id: TabId) -> Result<(), String> {
    with_tabs(&app, &state, |tabs| tabs.switch_active(id))
}

#[tauri::command]
pub fn list_tabs(state: State<AppState>) -> Result<TabStrip, String> {
    let tabs = state.tabs.lock().map_err(|e| e.to_string())?;
    Ok(tabs.snapshot())
}

#[tauri::command]
pub fn get_settings(state: State<AppState>) -> Result<Settings, String> {
    let settings = state.settings.lock().map_err(|e| e.to_string())?;
    Ok(settings.load())
}

#[tauri::command]
pub fn save_settings(
    app: AppHandle,
    state: State<AppState>,
    settings: Settings,
) -> Result<(), String> {
    let theme = {
        let mut tabs = state.tabs.lock().map_err(|e| e.to_string())?;
        state.drain_into(&mut tabs);
        let mut controller = state.settings.lock().map_err(|e| e.to_string())?;
        controller
            .apply(&mut tabs, &settings)
            .map_err(|e| e.to_string())?
    };
    apply_theme(&app, theme);
    Ok(())
}

#[tauri::command]
pub fn open_settings(app: AppHandle) {
    show_settings_window(&app);
}

pub fn show_settings_window(app: &AppHandle) {
    if let Some(win) = app.get_window("settings") {
        if let Err(e) = win.set_focus() {
            log::warn!("[Settings] Failed to focus settings window: {}", e);
        }
        return;
    }

    info!("[Settings] Opening dialog");
    let settings_window = tauri::WebviewWindowBuilder::new(
        app,
        "settings",
        tauri::WebviewUrl::App("settings.html".into()),
    )
    .title("Settings")
    .inner_size(380.0, 260.0)
    .resizable(false)
    .minimizable(false)
    .maximizable(false)
    .center()
    .focused(true)
    .build();

    if let Err(e) = settings_window {
        log::error!("[Settings] Failed to create settings window: {:?}", e);
    }
}
