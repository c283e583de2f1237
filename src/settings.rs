use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::modules::navigation::DEFAULT_HOMEPAGE;
use crate::modules::tabs::TabManager;
use crate::modules::theme::Theme;
use crate::modules::webview::{AddressBar, WebViewHost};

pub const HOMEPAGE_KEY: &str = "homepage_url";
pub const DARK_MODE_KEY: &str = "dark_mode";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Values the settings dialog edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub homepage_url: String,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage_url: DEFAULT_HOMEPAGE.to_string(),
            dark_mode: false,
        }
    }
}

/// Persisted key/value store behind the settings dialog.
///
/// Writes are all-or-nothing: when persisting fails, none of the entries change.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<&Value>;
    fn set_many(&mut self, entries: &[(&str, Value)]) -> Result<(), SettingsError>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.set_many(&[(key, value)])
    }
}

/// Settings kept as one JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonSettingsStore {
    /// Open the store at `path`. A missing or unreadable file starts out empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                    BTreeMap::new()
                }),
                Err(e) => {
                    warn!("[Settings] Failed to read file: {}, returning defaults", e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Self { path, values }
    }

    /// Open `settings.json` inside an app data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::open(dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), SettingsError> {
        let tmp_path = self.path.with_extension("tmp");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.values)?;

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set_many(&mut self, entries: &[(&str, Value)]) -> Result<(), SettingsError> {
        let previous = self.values.clone();
        for (key, value) in entries {
            self.values.insert(key.to_string(), value.clone());
        }
        if let Err(e) = self.save() {
            self.values = previous;
            return Err(e);
        }
        Ok(())
    }
}

/// Reads and writes the homepage/theme settings and pushes them into the tab manager.
pub struct SettingsController<S> {
    store: S,
}

impl<S: SettingsStore> SettingsController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_homepage(&self) -> String {
        match self.store.get(HOMEPAGE_KEY) {
            Some(Value::String(url)) => url.clone(),
            _ => DEFAULT_HOMEPAGE.to_string(),
        }
    }

    pub fn get_dark_mode(&self) -> bool {
        match self.store.get(DARK_MODE_KEY) {
            Some(Value::Bool(dark)) => *dark,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::from_dark_mode(self.get_dark_mode())
    }

    pub fn load(&self) -> Settings {
        Settings {
            homepage_url: self.get_homepage(),
            dark_mode: self.get_dark_mode(),
        }
    }

    pub fn set_homepage<H, B>(
        &mut self,
        tabs: &mut TabManager<H, B>,
        url: &str,
    ) -> Result<(), SettingsError>
    where
        H: WebViewHost,
        B: AddressBar,
    {
        self.store.set(HOMEPAGE_KEY, Value::String(url.to_string()))?;
        tabs.set_homepage_url(url);
        Ok(())
    }

    pub fn set_dark_mode<H, B>(
        &mut self,
        tabs: &mut TabManager<H, B>,
        dark_mode: bool,
    ) -> Result<(), SettingsError>
    where
        H: WebViewHost,
        B: AddressBar,
    {
        self.store.set(DARK_MODE_KEY, Value::Bool(dark_mode))?;
        tabs.set_dark_mode(dark_mode);
        Ok(())
    }

    /// Apply a confirmed settings dialog. Both values are persisted together
    /// before the tab manager sees either of them.
    pub fn apply<H, B>(
        &mut self,
        tabs: &mut TabManager<H, B>,
        settings: &Settings,
    ) -> Result<Theme, SettingsError>
    where
        H: WebViewHost,
        B: AddressBar,
    {
        self.store.set_many(&[
            (HOMEPAGE_KEY, Value::String(settings.homepage_url.clone())),
            (DARK_MODE_KEY, Value::Bool(settings.dark_mode)),
        ])?;
        tabs.set_homepage_url(&settings.homepage_url);
        tabs.set_dark_mode(settings.dark_mode);
        info!(
            "[Settings] Saved homepage={} dark_mode={}",
            settings.homepage_url, settings.dark_mode
        );
        Ok(self.theme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::navigation::NavCommand;
    use crate::modules::tabs::tests::manager;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempdir().unwrap();
        let controller = SettingsController::new(JsonSettingsStore::in_dir(dir.path()));

        assert_eq!(controller.get_homepage(), "https://duckduckgo.com");
        assert!(!controller.get_dark_mode());
        assert_eq!(controller.theme(), Theme::Light);
        assert_eq!(controller.load(), Settings::default());
        assert!(!dir.path().join(SETTINGS_FILE).exists());
    }

    #[test]
    fn test_homepage_round_trips_across_reopen() {
        let dir = tempdir().unwrap();
        let mut tabs = manager();
        {
            let mut controller = SettingsController::new(JsonSettingsStore::in_dir(dir.path()));
            controller
                .set_homepage(&mut tabs, "https://example.org")
                .unwrap();
            controller.set_dark_mode(&mut tabs, true).unwrap();
        }

        let reopened = SettingsController::new(JsonSettingsStore::in_dir(dir.path()));
        assert_eq!(reopened.get_homepage(), "https://example.org");
        assert!(reopened.get_dark_mode());
        assert!(!dir.path().join("settings.tmp").exists());
    }

    #[test]
    fn test_setters_update_tab_manager() {
        let dir = tempdir().unwrap();
        let mut controller = SettingsController::new(JsonSettingsStore::in_dir(dir.path()));
        let mut tabs = manager();
        let id = tabs.add_tab();

        let theme = controller
            .apply(
                &mut tabs,
                &Settings {
                    homepage_url: "https://example.net".to_string(),
                    dark_mode: true,
                },
            )
            .unwrap();

        assert_eq!(theme, Theme::Dark);
        assert_eq!(tabs.homepage_url(), "https://example.net");
        assert!(tabs.dark_mode());
        assert_eq!(tabs.address_bar().address, "https://example.net");

        tabs.dispatch_navigation(NavCommand::Home);
        assert_eq!(tabs.active_tab(), Some(id));
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        let controller = SettingsController::new(JsonSettingsStore::in_dir(dir.path()));
        assert_eq!(controller.load(), Settings::default());
    }

    #[test]
    fn test_string_booleans_are_accepted() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"homepage_url": "https://example.com", "dark_mode": "true"}"#,
        )
        .unwrap();

        let controller = SettingsController::new(JsonSettingsStore::in_dir(dir.path()));
        assert!(controller.get_dark_mode());
        assert_eq!(controller.get_homepage(), "https://example.com");
    }

    #[test]
    fn test_save_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = JsonSettingsStore::in_dir(&nested);
        store
            .set(HOMEPAGE_KEY, Value::String("https://x.example".into()))
            .unwrap();

        let written = fs::read_to_string(nested.join(SETTINGS_FILE)).unwrap();
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed[HOMEPAGE_KEY], "https://x.example");
    }

    /// A store whose directory cannot be created: its parent is a regular file.
    fn unwritable_store(dir: &Path) -> JsonSettingsStore {
        let blocker = dir.join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        JsonSettingsStore::open(blocker.join(SETTINGS_FILE))
    }

    #[test]
    fn test_failed_save_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut controller = SettingsController::new(unwritable_store(dir.path()));
        let mut tabs = manager();

        assert!(controller
            .set_homepage(&mut tabs, "https://unsaved.example")
            .is_err());
        assert!(controller.set_dark_mode(&mut tabs, true).is_err());

        assert_eq!(controller.get_homepage(), "https://duckduckgo.com");
        assert!(!controller.get_dark_mode());
        assert_eq!(tabs.homepage_url(), "https://duckduckgo.com");
        assert_eq!(tabs.address_bar().address, "https://duckduckgo.com");
        assert!(!tabs.dark_mode());
    }

    #[test]
    fn test_failed_apply_keeps_previous_settings() {
        let dir = tempdir().unwrap();
        let mut controller = SettingsController::new(unwritable_store(dir.path()));
        let mut tabs = manager();

        let result = controller.apply(
            &mut tabs,
            &Settings {
                homepage_url: "https://unsaved.example".to_string(),
                dark_mode: true,
            },
        );

        assert!(matches!(result, Err(SettingsError::Io(_))));
        assert_eq!(controller.load(), Settings::default());
        assert_eq!(tabs.homepage_url(), "https://duckduckgo.com");
        assert!(!tabs.dark_mode());
    }

    #[test]
    fn test_store_rolls_back_every_entry_on_failure() {
        let dir = tempdir().unwrap();
        let mut store = unwritable_store(dir.path());

        let result = store.set_many(&[
            (HOMEPAGE_KEY, Value::String("https://a.example".into())),
            (DARK_MODE_KEY, Value::Bool(true)),
        ]);

        assert!(result.is_err());
        assert_eq!(store.get(HOMEPAGE_KEY), None);
        assert_eq!(store.get(DARK_MODE_KEY), None);
    }
}
