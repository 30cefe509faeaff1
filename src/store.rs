//! Configuration files on disk
//!
//! Handles locating, reading and writing configuration documents. Writes go
//! through a temporary file in the same directory and are renamed into place,
//! so a reader never sees a half-written document.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    document::ConfigDocument,
    error::{UiConfigError, UiConfigResult},
};

/// User configuration file, holding variables
pub const CONFIG_FILE_NAME: &str = "ui_config";
/// Defaults shipped alongside the application
pub const DEFAULTS_FILE_NAME: &str = "default_ui_config";
pub const COLOR_FILE_SUFFIX: &str = ".colors";
/// Prefix for a user's edited copy of a named theme
pub const USER_THEME_PREFIX: &str = "my-";
/// Extra search directories, separated like `PATH`
pub const SEARCH_PATH_ENV: &str = "UICONFIG_PATH";

const APP_DIR_NAME: &str = "uiconfig";

/// Where configuration documents live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    /// Writable per-user directory
    user_dir: PathBuf,
    /// Read-only directories searched for defaults and themes
    search_path: Vec<PathBuf>,
}

impl ConfigStore {
    pub fn new(user_dir: impl Into<PathBuf>, search_path: Vec<PathBuf>) -> Self {
        Self {
            user_dir: user_dir.into(),
            search_path,
        }
    }

    /// Store rooted at the platform config directory, searching `UICONFIG_PATH`
    pub fn from_env() -> UiConfigResult<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            UiConfigError::io(APP_DIR_NAME, "Could not determine the user config directory")
        })?;

        let search_path = env::var_os(SEARCH_PATH_ENV)
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();

        Ok(Self::new(base.join(APP_DIR_NAME), search_path))
    }

    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn user_config_path(&self) -> PathBuf {
        self.user_dir.join(CONFIG_FILE_NAME)
    }

    /// First defaults file on the search path
    pub fn defaults_path(&self) -> Option<PathBuf> {
        self.find_in_search_path(DEFAULTS_FILE_NAME)
    }

    /// Where a user's copy of theme `name` is written
    pub fn user_color_theme_path(&self, name: &str) -> PathBuf {
        self.user_dir
            .join(format!("{}{}{}", USER_THEME_PREFIX, name, COLOR_FILE_SUFFIX))
    }

    /// The user's copy of theme `name` if there is one, else the first match on the search path
    pub fn find_color_theme(&self, name: &str) -> Option<PathBuf> {
        let user_copy = self.user_color_theme_path(name);
        if user_copy.is_file() {
            return Some(user_copy);
        }
        self.find_in_search_path(&format!("{}{}", name, COLOR_FILE_SUFFIX))
    }

    /// Reads and parses a document
    pub fn read_document(&self, path: &Path) -> UiConfigResult<ConfigDocument> {
        let src = fs::read_to_string(path).map_err(|e| {
            UiConfigError::io(path, format!("Failed to read configuration: {}", e))
        })?;
        tracing::debug!(path = %path.display(), "read configuration document");
        ConfigDocument::from_xml(&src)
    }

    /// Serializes and writes a document, creating parent directories
    pub fn write_document(&self, path: &Path, doc: &ConfigDocument) -> UiConfigResult<()> {
        let xml = doc.to_xml()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                UiConfigError::io(parent, format!("Failed to create directory: {}", e))
            })?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, xml).map_err(|e| {
            UiConfigError::io(&tmp, format!("Failed to write configuration: {}", e))
        })?;

        fs::rename(&tmp, path).map_err(|e| {
            UiConfigError::io(path, format!("Failed to replace configuration: {}", e))
        })?;

        tracing::debug!(path = %path.display(), "wrote configuration document");
        Ok(())
    }

    fn find_in_search_path(&self, file_name: &str) -> Option<PathBuf> {
        self.search_path
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file())
    }
}
