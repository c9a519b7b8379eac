//! The persisted settings record and where it is saved.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const SETTINGS_FILE: &str = "settings.toml";

/// Audio settings the player controls. Only the enabled flag persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory available")]
    NoConfigDir,
}

/// Where [`Settings`] go when they change.
pub trait SettingsStore {
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError>;
}

impl<F> SettingsStore for F
where
    F: FnMut(&Settings) -> Result<(), SettingsError>,
{
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        self(settings)
    }
}

/// Discards every save.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl SettingsStore for NullStore {
    fn save(&mut self, _settings: &Settings) -> Result<(), SettingsError> {
        Ok(())
    }
}

/// Settings kept in a TOML file.
///
/// On Linux the default location is `~/.config/chiptide/settings.toml`.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform config directory.
    pub fn default_location() -> Result<Self, SettingsError> {
        let dirs = directories::ProjectDirs::from("io.chiptide", "", "chiptide")
            .ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings. A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file; using defaults");
                Ok(Settings::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), enabled = settings.enabled, "settings saved");
        Ok(())
    }
}
