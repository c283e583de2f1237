// Shared state managed by Tauri.
// Commands and webview callbacks both run on the main thread, and a callback can
// fire while a command holds `tabs`. Callbacks therefore never block on `tabs`:
// they park their event in `pending`, which whoever holds `tabs` drains.

use std::sync::{Arc, Mutex};

use crate::modules::tabs::{TabEvent, TabManager};
use crate::settings::{JsonSettingsStore, SettingsController};
use crate::webview_host::{TauriHost, ToolbarBridge};

pub type BrowserTabs = TabManager<TauriHost, ToolbarBridge>;

pub struct AppState {
    pub tabs: Arc<Mutex<BrowserTabs>>,
    pub settings: Arc<Mutex<SettingsController<JsonSettingsStore>>>,
    pub pending: Arc<Mutex<Vec<TabEvent>>>,
}

impl AppState {
    pub fn new(tabs: BrowserTabs, settings: SettingsController<JsonSettingsStore>) -> Self {
        Self {
            tabs: Arc::new(Mutex::new(tabs)),
            settings: Arc::new(Mutex::new(settings)),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queue(&self, event: TabEvent) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(event),
            Err(_) => log::error!("[State] pending events poisoned, dropping {:?}", event),
        }
    }

    /// Apply every parked webview event, in arrival order.
    pub fn drain_into(&self, tabs: &mut BrowserTabs) {
        let events = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return,
        };
        for event in events {
            tabs.handle_event(event);
        }
    }
}
