// Tab manager - pure logic, no Tauri imports allowed.
// Owns the tab list, the active tab and the single live url-changed subscription.

use log::{debug, info};
use serde::Serialize;

use crate::modules::navigation::{resolve_query, NavCommand, BLANK_URL, WELCOME_HTML};
use crate::modules::webview::{AddressBar, TabId, WebView, WebViewHost};
use crate::settings::Settings;

pub const NEW_TAB_TITLE: &str = "New Tab";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabError {
    #[error("no tab with id {0}")]
    InvalidTabReference(TabId),
    #[error("navigation input is empty")]
    EmptyQuery,
}

/// One open tab: the web view it exclusively owns plus display metadata.
pub struct TabRecord<V> {
    id: TabId,
    view: V,
    title: String,
    current_url: String,
}

impl<V> TabRecord<V> {
    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Last URL reported by this tab's own web view; empty until the first report.
    pub fn current_url(&self) -> &str {
        &self.current_url
    }
}

/// A notification from one tab's web view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    UrlChanged(TabId, String),
    TitleChanged(TabId, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub active: bool,
}

/// Payload of the `update-tabs` event sent to the toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStrip {
    pub tabs: Vec<TabSummary>,
    pub active_tab_id: Option<TabId>,
}

/// Tracks the ordered tabs, which one is active, and routes toolbar commands to it.
///
/// Invariants:
/// - `active_index` is `Some(valid index)` whenever `tabs` is non-empty, `None` otherwise.
/// - `live` (the tab whose url-changed events reach the address bar) always equals
///   the active tab's id. Every operation that moves the active tab swaps it in the
///   same call.
pub struct TabManager<H: WebViewHost, B> {
    host: H,
    address_bar: B,
    tabs: Vec<TabRecord<H::View>>,
    active_index: Option<usize>,
    live: Option<TabId>,
    next_id: u64,
    homepage_url: String,
    dark_mode: bool,
}

impl<H: WebViewHost, B: AddressBar> TabManager<H, B> {
    pub fn new(host: H, mut address_bar: B, settings: &Settings) -> Self {
        address_bar.show_address(&settings.homepage_url);
        Self {
            host,
            address_bar,
            tabs: Vec::new(),
            active_index: None,
            live: None,
            next_id: 1,
            homepage_url: settings.homepage_url.clone(),
            dark_mode: settings.dark_mode,
        }
    }

    /// Open a new tab showing the welcome page and make it active.
    pub fn add_tab(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;

        let mut view = self.host.create_view(id);
        view.set_html(WELCOME_HTML, BLANK_URL);

        self.tabs.push(TabRecord {
            id,
            view,
            title: NEW_TAB_TITLE.to_string(),
            current_url: String::new(),
        });
        info!("[Tabs] Opened {} ({} open)", id, self.tabs.len());

        self.activate(Some(self.tabs.len() - 1));
        id
    }

    /// Close a tab. Unknown ids are ignored.
    pub fn close_tab(&mut self, id: TabId) {
        if let Err(e) = self.try_close_tab(id) {
            debug!("[Tabs] close ignored: {}", e);
        }
    }

    pub fn try_close_tab(&mut self, id: TabId) -> Result<(), TabError> {
        let index = self.index_of(id).ok_or(TabError::InvalidTabReference(id))?;
        let closed = self.tabs.remove(index);
        if self.live == Some(id) {
            self.live = None;
        }
        // Dropping the record drops its view, which tears the surface down.
        drop(closed);
        info!("[Tabs] Closed {} ({} open)", id, self.tabs.len());

        match self.active_index {
            Some(active) if active == index => {
                // Prefer the tab that slid into this slot, else the new last tab.
                let next = if index < self.tabs.len() {
                    Some(index)
                } else {
                    self.tabs.len().checked_sub(1)
                };
                self.active_index = None;
                self.activate(next);
            }
            Some(active) if active > index => {
                // Same tab stays active, it just moved one slot left.
                self.active_index = Some(active - 1);
            }
            _ => {}
        }
        Ok(())
    }

    /// Make a tab active. Unknown or already active ids are ignored.
    pub fn switch_active(&mut self, id: TabId) {
        if let Err(e) = self.try_switch_active(id) {
            debug!("[Tabs] switch ignored: {}", e);
        }
    }

    pub fn try_switch_active(&mut self, id: TabId) -> Result<(), TabError> {
        let index = self.index_of(id).ok_or(TabError::InvalidTabReference(id))?;
        if self.active_index != Some(index) {
            self.activate(Some(index));
        }
        Ok(())
    }

    pub fn dispatch_navigation(&mut self, command: NavCommand) {
        match command {
            NavCommand::Load(query) => self.load(&query),
            NavCommand::Back => {
                if let Some(view) = self.active_view_mut() {
                    view.back();
                }
            }
            NavCommand::Forward => {
                if let Some(view) = self.active_view_mut() {
                    view.forward();
                }
            }
            NavCommand::Reload => {
                if let Some(view) = self.active_view_mut() {
                    view.reload();
                }
            }
            NavCommand::Home => {
                let home = self.homepage_url.clone();
                if let Some(view) = self.active_view_mut() {
                    view.load(&home);
                }
            }
        }
    }

    /// Resolve search-bar input and load it in the active tab, opening one if needed.
    pub fn load(&mut self, query: &str) {
        let url = match resolve_query(query) {
            Ok(url) => url,
            Err(e) => {
                debug!("[Tabs] load ignored: {}", e);
                return;
            }
        };

        if self.active_index.is_none() {
            self.add_tab();
        }
        if let Some(view) = self.active_view_mut() {
            info!("[Tabs] Loading {}", url);
            view.load(&url);
        }
    }

    /// Notification from a tab's web view that it now shows `url`.
    pub fn on_url_changed(&mut self, id: TabId, url: &str) {
        let live = self.live;
        let Some(record) = self.tabs.iter_mut().find(|t| t.id == id) else {
            debug!("[Tabs] url change for unknown {}", id);
            return;
        };
        record.current_url = url.to_string();

        if live == Some(id) {
            self.address_bar.show_address(url);
            self.address_bar.set_search_text(url);
        }
    }

    pub fn handle_event(&mut self, event: TabEvent) {
        match event {
            TabEvent::UrlChanged(id, url) => self.on_url_changed(id, &url),
            TabEvent::TitleChanged(id, title) => self.on_title_changed(id, &title),
        }
    }

    pub fn on_title_changed(&mut self, id: TabId, title: &str) {
        if let Some(record) = self.tabs.iter_mut().find(|t| t.id == id) {
            record.title = title.to_string();
        }
    }

    pub fn set_homepage_url(&mut self, url: &str) {
        self.homepage_url = url.to_string();
        self.address_bar.show_address(url);
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    pub fn homepage_url(&self) -> &str {
        &self.homepage_url
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_tab(&self) -> Option<TabId> {
        self.active_index.map(|i| self.tabs[i].id)
    }

    /// The tab whose url-changed events currently feed the address bar.
    pub fn live_subscription(&self) -> Option<TabId> {
        self.live
    }

    pub fn tab(&self, id: TabId) -> Option<&TabRecord<H::View>> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn address_bar(&self) -> &B {
        &self.address_bar
    }

    pub fn snapshot(&self) -> TabStrip {
        let active = self.active_tab();
        TabStrip {
            tabs: self
                .tabs
                .iter()
                .map(|t| TabSummary {
                    id: t.id,
                    title: t.title.clone(),
                    url: t.current_url.clone(),
                    active: Some(t.id) == active,
                })
                .collect(),
            active_tab_id: active,
        }
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn active_view_mut(&mut self) -> Option<&mut H::View> {
        let index = self.active_index?;
        Some(&mut self.tabs[index].view)
    }

    /// Move the active tab and swap the live subscription in one step.
    fn activate(&mut self, index: Option<usize>) {
        if let Some(prev) = self.active_index {
            if let Some(record) = self.tabs.get_mut(prev) {
                record.view.set_visible(false);
            }
        }

        self.active_index = index;
        let previous_live = self.live;
        self.live = index.map(|i| self.tabs[i].id);
        debug!(
            "[Tabs] url subscription {:?} -> {:?}",
            previous_live, self.live
        );

        if let Some(i) = index {
            let record = &mut self.tabs[i];
            record.view.set_visible(true);
            // A tab that has not reported a URL yet shows an empty bar.
            self.address_bar.show_address(&record.current_url);
            self.address_bar.set_search_text(&record.current_url);
        }
    }
}
