// Tauri adapters for the tab manager's collaborator traits.
// Each tab is a child webview of the main window, stacked under the toolbar;
// only the active one is shown.

use std::sync::TryLockError;

use log::{debug, error, warn};
use tauri::webview::PageLoadEvent;
use tauri::{
    AppHandle, Emitter, Manager, PhysicalPosition, PhysicalSize, Webview, WebviewBuilder,
    WebviewUrl, Window,
};
use url::Url;

use crate::modules::navigation::BLANK_URL;
use crate::modules::tabs::TabEvent;
use crate::modules::theme::Theme;
use crate::modules::webview::{AddressBar, TabId, WebView, WebViewHost};
use crate::state::{AppState, BrowserTabs};

/// Height of the toolbar page (buttons, URL row and tab strip) in logical pixels.
pub const TOOLBAR_HEIGHT: f64 = 40.0 + 24.0 + 32.0;

/// Label of the toolbar webview window.
pub const MAIN_LABEL: &str = "main";

pub fn content_bounds(
    window: &Window,
) -> tauri::Result<(PhysicalPosition<i32>, PhysicalSize<u32>)> {
    let size = window.inner_size()?;
    let scale = window.scale_factor()?;
    Ok(content_bounds_for(size, scale))
}

pub fn content_bounds_for(
    size: PhysicalSize<u32>,
    scale: f64,
) -> (PhysicalPosition<i32>, PhysicalSize<u32>) {
    let top = (TOOLBAR_HEIGHT * scale) as u32;
    let height = size.height.saturating_sub(top).max(100);
    (
        PhysicalPosition::new(0, top as i32),
        PhysicalSize::new(size.width, height),
    )
}

/// The URL the address bar should show for a finished page load.
/// Placeholder pages are rendered from `data:` URLs and report as `about:blank`.
fn reported_url(url: &Url) -> String {
    if url.scheme() == "data" {
        BLANK_URL.to_string()
    } else {
        url.to_string()
    }
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "''".to_string())
}

pub struct TauriWebView {
    id: TabId,
    webview: Option<Webview>,
}

impl TauriWebView {
    fn eval(&self, script: &str) {
        if let Some(webview) = &self.webview {
            if let Err(e) = webview.eval(script) {
                warn!("[WebView] {} eval failed: {}", self.id, e);
            }
        }
    }

    fn navigate(&self, target: &str) {
        let Some(webview) = &self.webview else {
            return;
        };
        let result = match Url::parse(target) {
            Ok(url) => webview.navigate(url),
            // Let the engine make sense of what the parser rejects.
            Err(_) => webview.eval(&format!("window.location.href = {}", js_string(target))),
        };
        if let Err(e) = result {
            warn!("[WebView] {} failed to load {}: {}", self.id, target, e);
        }
    }
}

impl WebView for TauriWebView {
    fn load(&mut self, url: &str) {
        self.navigate(url);
    }

    fn back(&mut self) {
        self.eval("window.history.back()");
    }

    fn forward(&mut self) {
        self.eval("window.history.forward()");
    }

    fn reload(&mut self) {
        self.eval("window.location.reload()");
    }

    fn set_html(&mut self, content: &str, base_url: &str) {
        let document = if base_url.is_empty() || base_url == BLANK_URL {
            content.to_string()
        } else {
            format!("<base href={}>{}", js_string(base_url), content)
        };
        let data = format!(
            "data:text/html;charset=utf-8,{}",
            urlencoding::encode(&document)
        );
        self.navigate(&data);
    }

    fn set_visible(&mut self, visible: bool) {
        let Some(webview) = &self.webview else {
            return;
        };
        let result = if visible {
            webview.show().and_then(|_| webview.set_focus())
        } else {
            webview.hide()
        };
        if let Err(e) = result {
            warn!("[WebView] {} visibility change failed: {}", self.id, e);
        }
    }
}

impl Drop for TauriWebView {
    fn drop(&mut self) {
        if let Some(webview) = self.webview.take() {
            if let Err(e) = webview.close() {
                warn!("[WebView] {} failed to close: {}", self.id, e);
            }
        }
    }
}

/// Creates tab webviews as children of the main window.
pub struct TauriHost {
    window: Window,
}

impl TauriHost {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl WebViewHost for TauriHost {
    type View = TauriWebView;

    fn create_view(&mut self, id: TabId) -> TauriWebView {
        let app = self.window.app_handle().clone();
        let title_app = app.clone();

        let blank = match Url::parse(BLANK_URL) {
            Ok(url) => url,
            Err(e) => {
                error!("[WebView] bad blank url: {}", e);
                return TauriWebView { id, webview: None };
            }
        };

        let builder = WebviewBuilder::new(id.to_string(), WebviewUrl::External(blank))
            .on_page_load(move |_webview, payload| {
                if !matches!(payload.event(), PageLoadEvent::Finished) {
                    return;
                }
                dispatch(&app, TabEvent::UrlChanged(id, reported_url(payload.url())));
            })
            // Fragment and history.pushState navigations never finish a page load,
            // but single-page sites usually retitle; report the URL from here too.
            .on_document_title_changed(move |webview, title| {
                if let Ok(url) = webview.url() {
                    dispatch(&title_app, TabEvent::UrlChanged(id, reported_url(&url)));
                }
                dispatch(&title_app, TabEvent::TitleChanged(id, title));
            });

        let webview = content_bounds(&self.window)
            .and_then(|(position, size)| self.window.add_child(builder, position, size));
        match webview {
            Ok(webview) => TauriWebView {
                id,
                webview: Some(webview),
            },
            Err(e) => {
                error!("[WebView] failed to create {}: {}", id, e);
                TauriWebView { id, webview: None }
            }
        }
    }
}

/// Hand a web view notification to the tab manager.
///
/// Engine callbacks run on the main thread and may fire while a command still
/// holds `state.tabs`. The event always goes through `state.pending`; it is
/// applied here when the manager is free, otherwise by that command before it
/// releases the lock.
pub fn dispatch(app: &AppHandle, event: TabEvent) {
    let state = app.state::<AppState>();
    state.queue(event);
    match state.tabs.try_lock() {
        Ok(mut tabs) => {
            state.drain_into(&mut tabs);
            emit_tabs(app, &tabs);
        }
        Err(TryLockError::WouldBlock) => debug!("[WebView] tabs busy, event left pending"),
        Err(TryLockError::Poisoned(_)) => error!("[WebView] tab state poisoned, event dropped"),
    }
}

pub fn emit_tabs(app: &AppHandle, tabs: &BrowserTabs) {
    if let Err(e) = app.emit_to(MAIN_LABEL, "update-tabs", tabs.snapshot()) {
        warn!("[Toolbar] failed to emit tabs: {}", e);
    }
}

pub fn apply_theme(app: &AppHandle, theme: Theme) {
    if let Some(window) = app.get_window(MAIN_LABEL) {
        let native = if theme.is_dark() {
            tauri::Theme::Dark
        } else {
            tauri::Theme::Light
        };
        if let Err(e) = window.set_theme(Some(native)) {
            warn!("[Theme] failed to set window theme: {}", e);
        }
    }
    if let Err(e) = app.emit("theme-changed", theme.palette()) {
        warn!("[Theme] failed to emit palette: {}", e);
    }
}

/// The toolbar page's URL label and search bar, driven over Tauri events.
pub struct ToolbarBridge {
    app: AppHandle,
}

impl ToolbarBridge {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn emit(&self, event: &str, text: &str) {
        if let Err(e) = self.app.emit_to(MAIN_LABEL, event, text.to_string()) {
            warn!("[Toolbar] failed to emit {}: {}", event, e);
        }
    }
}

impl AddressBar for ToolbarBridge {
    fn show_address(&mut self, url: &str) {
        self.emit("show-address", url);
    }

    fn set_search_text(&mut self, text: &str) {
        self.emit("set-search-text", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_sits_below_toolbar() {
        let (pos, size) = content_bounds_for(PhysicalSize::new(1024, 768), 1.0);
        assert_eq!(pos, PhysicalPosition::new(0, 96));
        assert_eq!(size, PhysicalSize::new(1024, 672));

        let (pos, size) = content_bounds_for(PhysicalSize::new(2048, 1536), 2.0);
        assert_eq!(pos.y, 192);
        assert_eq!(size.height, 1344);
    }

    #[test]
    fn test_content_keeps_minimum_height() {
        let (_, size) = content_bounds_for(PhysicalSize::new(800, 50), 1.0);
        assert_eq!(size.height, 100);
    }

    #[test]
    fn test_placeholder_reports_blank() {
        let data = Url::parse("data:text/html,%3Ch1%3Ehi%3C%2Fh1%3E").unwrap();
        assert_eq!(reported_url(&data), "about:blank");
        let page = Url::parse("https://example.com").unwrap();
        assert_eq!(reported_url(&page), "https://example.com/");
    }
}
