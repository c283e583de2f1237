// Browser X Library Entry Point
// The tab/navigation core and settings build without Tauri and are tested
// on their own; the desktop shell is behind the `desktop` feature.

pub mod settings;

// Pure logic modules (no Tauri imports)
pub mod modules;

#[cfg(feature = "desktop")]
pub mod commands;
#[cfg(feature = "desktop")]
pub mod state;
#[cfg(feature = "desktop")]
pub mod webview_host;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use log::info;
    use tauri::menu::{MenuBuilder, MenuItemBuilder, PredefinedMenuItem, SubmenuBuilder};
    use tauri::{AppHandle, Manager, PhysicalPosition, PhysicalSize, Window};

    use crate::commands::{self, show_settings_window, with_tabs};
    use crate::modules::navigation::NavCommand;
    use crate::modules::tabs::TabManager;
    use crate::settings::{JsonSettingsStore, SettingsController};
    use crate::state::AppState;
    use crate::webview_host::{
        apply_theme, content_bounds_for, TauriHost, ToolbarBridge, MAIN_LABEL,
    };

    fn build_menu(app: &tauri::App) -> tauri::Result<()> {
        let browser_menu = SubmenuBuilder::new(app, "Browser X")
            .item(&PredefinedMenuItem::about(app, Some("About Browser X"), None)?)
            .separator()
            .item(&MenuItemBuilder::with_id("settings", "Settings").accelerator("CmdOrCtrl+,").build(app)?)
            .separator()
            .item(&PredefinedMenuItem::quit(app, Some("Quit Browser X"))?)
            .build()?;

        let file_menu = SubmenuBuilder::new(app, "File")
            .item(&MenuItemBuilder::with_id("new_tab", "New Tab").accelerator("CmdOrCtrl+T").build(app)?)
            .item(&MenuItemBuilder::with_id("close_tab", "Close Tab").accelerator("CmdOrCtrl+W").build(app)?)
            .build()?;

        let edit_menu = SubmenuBuilder::new(app, "Edit")
            .item(&PredefinedMenuItem::undo(app, Some("Undo"))?)
            .item(&PredefinedMenuItem::redo(app, Some("Redo"))?)
            .separator()
            .item(&PredefinedMenuItem::cut(app, Some("Cut"))?)
            .item(&PredefinedMenuItem::copy(app, Some("Copy"))?)
            .item(&PredefinedMenuItem::paste(app, Some("Paste"))?)
            .item(&PredefinedMenuItem::select_all(app, Some("Select All"))?)
            .build()?;

        let view_menu = SubmenuBuilder::new(app, "View")
            .item(&MenuItemBuilder::with_id("reload", "Reload Page").accelerator("CmdOrCtrl+R").build(app)?)
            .item(&MenuItemBuilder::with_id("home", "Home").accelerator("Alt+Home").build(app)?)
            .build()?;

        let history_menu = SubmenuBuilder::new(app, "History")
            .item(&MenuItemBuilder::with_id("go_back", "Back").accelerator("CmdOrCtrl+[").build(app)?)
            .item(&MenuItemBuilder::with_id("go_forward", "Forward").accelerator("CmdOrCtrl+]").build(app)?)
            .build()?;

        let menu = MenuBuilder::new(app)
            .items(&[&browser_menu, &file_menu, &edit_menu, &view_menu, &history_menu])
            .build()?;
        app.set_menu(menu)?;
        Ok(())
    }

    fn on_menu(app: &AppHandle, id: &str) {
        let state = app.state::<AppState>();
        let result = match id {
            "settings" => {
                show_settings_window(app);
                Ok(())
            }
            "new_tab" => with_tabs(app, &state, |tabs| {
                tabs.add_tab();
            }),
            "close_tab" => with_tabs(app, &state, |tabs| {
                if let Some(active) = tabs.active_tab() {
                    tabs.close_tab(active);
                }
            }),
            "reload" => with_tabs(app, &state, |tabs| tabs.dispatch_navigation(NavCommand::Reload)),
            "home" => with_tabs(app, &state, |tabs| tabs.dispatch_navigation(NavCommand::Home)),
            "go_back" => with_tabs(app, &state, |tabs| tabs.dispatch_navigation(NavCommand::Back)),
            "go_forward" => with_tabs(app, &state, |tabs| tabs.dispatch_navigation(NavCommand::Forward)),
            _ => Ok(()),
        };
        if let Err(e) = result {
            log::error!("[Menu] {} failed: {}", id, e);
        }
    }

    /// Keep every tab webview filling the area under the toolbar.
    fn track_resize(window: &Window) {
        let window_clone = window.clone();
        window.on_window_event(move |event| {
            if let tauri::WindowEvent::Resized(new_size) = event {
                let scale = window_clone.scale_factor().unwrap_or(1.0);
                let (position, size) = content_bounds_for(*new_size, scale);
                for wv in window_clone.webviews() {
                    if !wv.label().starts_with("tab-") {
                        continue;
                    }
                    let _ = wv.set_bounds(tauri::Rect {
                        position: tauri::Position::Physical(PhysicalPosition::new(
                            position.x, position.y,
                        )),
                        size: tauri::Size::Physical(PhysicalSize::new(size.width, size.height)),
                    });
                }
            }
        });
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        tauri::Builder::default()
            .plugin(
                tauri_plugin_log::Builder::default()
                    .level(log::LevelFilter::Info)
                    .build(),
            )
            .setup(|app| {
                let window = app
                    .get_window(MAIN_LABEL)
                    .ok_or("main window is missing from the app config")?;
                let handle = app.handle().clone();

                let store = JsonSettingsStore::in_dir(&app.path().app_data_dir()?);
                info!("[Settings] Using {}", store.path().display());
                let controller = SettingsController::new(store);
                let settings = controller.load();
                let theme = controller.theme();

                let tabs = TabManager::new(
                    TauriHost::new(window.clone()),
                    ToolbarBridge::new(handle.clone()),
                    &settings,
                );
                app.manage(AppState::new(tabs, controller));

                build_menu(app)?;
                app.on_menu_event(|app_handle, event| on_menu(app_handle, event.id().0.as_str()));

                track_resize(&window);
                apply_theme(&handle, theme);
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                commands::go_back,
                commands::go_forward,
                commands::reload_page,
                commands::navigate_home,
                commands::load_page,
                commands::add_tab,
                commands::close_tab,
                commands::switch_tab,
                commands::list_tabs,
                commands::get_settings,
                commands::save_settings,
                commands::open_settings
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
