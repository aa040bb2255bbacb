//! Display-mode preference: persisted choice plus the effective dark flag.
//!
//! # Design
//! `ThemeController` owns the effective `is_dark` flag and drives it from the
//! chosen [`Theme`]. Storage and the system colour-scheme query are trait
//! seams so hosts plug in their own. The controller never touches the todo
//! domain.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::ThemeConfig;
use crate::error::StorageError;
use crate::types::Theme;

/// Key under which the chosen theme is persisted.
pub const THEME_STORAGE_KEY: &str = "todolist-theme";

/// Durable string key/value storage.
pub trait ThemeStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Source of the operating system's light/dark preference.
pub trait SystemPreference {
    fn prefers_dark(&self) -> bool;
}

impl<F: Fn() -> bool> SystemPreference for F {
    fn prefers_dark(&self) -> bool {
        self()
    }
}

/// A preference that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPreference(pub bool);

impl SystemPreference for FixedPreference {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

pub struct ThemeController<S, P> {
    storage: S,
    preference: P,
    theme: Theme,
    is_dark: bool,
}

impl<S: ThemeStorage, P: SystemPreference> ThemeController<S, P> {
    /// Start in `auto` with the dark flag following the system, then apply
    /// any previously persisted theme once.
    pub fn new(storage: S, preference: P) -> Self {
        let is_dark = preference.prefers_dark();
        let mut controller = Self {
            storage,
            preference,
            theme: Theme::Auto,
            is_dark,
        };

        match controller.storage.get(THEME_STORAGE_KEY) {
            Ok(Some(saved)) => match saved.parse::<Theme>() {
                Ok(theme) => {
                    controller.theme = theme;
                    controller.apply(theme);
                }
                Err(err) => warn!(error = %err, "ignoring persisted theme"),
            },
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to read persisted theme"),
        }
        controller
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist `theme`, then apply it. Re-selecting the current theme does
    /// nothing.
    ///
    /// If persisting fails the controller is left unchanged.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        if theme == self.theme {
            return Ok(());
        }
        self.storage.set(THEME_STORAGE_KEY, theme.as_str())?;
        self.theme = theme;
        self.apply(theme);
        Ok(())
    }

    /// Flip the dark flag without changing the chosen theme.
    pub fn toggle_dark(&mut self) {
        self.is_dark = !self.is_dark;
    }

    fn apply(&mut self, theme: Theme) {
        match theme {
            Theme::Auto => {
                if self.preference.prefers_dark() != self.is_dark {
                    self.toggle_dark();
                }
            }
            Theme::Dark => self.is_dark = true,
            Theme::Light => self.is_dark = false,
        }
    }
}

/// Volatile storage, for tests and hosts without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStorage {
    entries: HashMap<String, String>,
}

impl MemoryThemeStorage {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }
}

impl ThemeStorage for MemoryThemeStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object of string pairs in a single file, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileThemeStorage {
    path: PathBuf,
}

impl FileThemeStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &ThemeConfig) -> Result<Self, StorageError> {
        Self::at(config.resolved_storage_path())
    }

    /// `None` means neither an explicit path nor a platform data dir exists.
    fn at(path: Option<PathBuf>) -> Result<Self, StorageError> {
        path.map(Self::new).ok_or(StorageError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })
    }
}

impl ThemeStorage for FileThemeStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());

        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&entries).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, content).map_err(io_err)
    }
}
