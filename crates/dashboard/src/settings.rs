//! Persisted user preferences. The only preference today is the theme.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const THEME_KEY: &str = "theme";
const APP_DIR: &str = "smart-invest";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("No configuration directory available; set SMART_INVEST_CONFIG_DIR")]
    NoConfigDir,

    #[error("Unknown theme '{0}' (expected dark or light)")]
    UnknownTheme(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(SettingsError::UnknownTheme(s.to_string())),
        }
    }
}

/// Key-value storage behind the settings service.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> SettingsResult<Option<String>>;

    fn save(&mut self, key: &str, value: &str) -> SettingsResult<()>;
}

/// Preferences kept as one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$SMART_INVEST_CONFIG_DIR/preferences.json`, or
    /// `<user config dir>/smart-invest/preferences.json` when unset.
    pub fn default_location() -> SettingsResult<Self> {
        let dir = match std::env::var_os("SMART_INVEST_CONFIG_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or(SettingsError::NoConfigDir)?
                .join(APP_DIR),
        };
        Ok(Self::new(dir.join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> SettingsResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> SettingsResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        let mut prefs = self.read_all().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable preferences at {}: {}", self.path.display(), e);
            BTreeMap::new()
        });
        prefs.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&prefs)?)?;
        tracing::debug!("Saved preference {}={} to {}", key, value, self.path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
    pub writes: usize,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> SettingsResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Theme preference with a dark default.
pub struct ThemeSettings<S> {
    store: S,
}

impl<S: PreferenceStore> ThemeSettings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored theme; anything missing or unreadable falls back to the default.
    pub fn get(&self) -> Theme {
        match self.store.load(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using {}", e, Theme::default());
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!("Could not read theme preference: {}", e);
                Theme::default()
            }
        }
    }

    pub fn set(&mut self, theme: Theme) -> SettingsResult<()> {
        self.store.save(THEME_KEY, theme.as_str())
    }

    pub fn toggle(&mut self) -> SettingsResult<Theme> {
        let theme = self.get().toggled();
        self.set(theme)?;
        Ok(theme)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
