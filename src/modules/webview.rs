// Collaborator seams for the tab manager - no Tauri imports allowed.
// The desktop shell implements these over Tauri child webviews; tests use fakes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// One browsable surface provided by the embedded web engine.
///
/// Commands are fire-and-forget: the engine reports progress back through the
/// url-changed notification its host wired up when the view was created.
/// Dropping a view releases the surface and cancels any in-flight load.
pub trait WebView {
    fn load(&mut self, url: &str);
    fn back(&mut self);
    fn forward(&mut self);
    fn reload(&mut self);
    fn set_html(&mut self, content: &str, base_url: &str);
    fn set_visible(&mut self, visible: bool);
}

/// Creates web views for new tabs.
///
/// The host is responsible for routing each view's url-changed and
/// title-changed notifications to `TabManager::on_url_changed` /
/// `TabManager::on_title_changed` tagged with the id passed here.
pub trait WebViewHost {
    type View: WebView;

    fn create_view(&mut self, id: TabId) -> Self::View;
}

/// The toolbar's "URL:" label and editable search bar.
pub trait AddressBar {
    fn show_address(&mut self, url: &str);
    fn set_search_text(&mut self, text: &str);
}
