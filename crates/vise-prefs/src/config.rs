//! Where preference stores live on disk.

use std::path::{Path, PathBuf};

use crate::error::{PrefsError, Result};

/// Application name, used for the default configuration directory.
pub const APP_NAME: &str = "vise";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "VISE_CONFIG_DIR";

/// Name of the store holding GUI state (window geometry, zoom, ...).
pub const GUI_DYNAMIC: &str = "gui-dynamic";

/// File extension of a store.
pub const STORE_EXTENSION: &str = "sqlite";

/// Configuration for preference stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefsConfig {
    /// Directory holding one `<name>.sqlite` file per store.
    pub config_dir: PathBuf,
}

impl Default for PrefsConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PrefsConfig {
    /// Use an explicit directory.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// `$VISE_CONFIG_DIR`, else the platform config directory joined with
    /// `vise`, else `./.vise`.
    pub fn from_env() -> Self {
        let config_dir = std::env::var_os(CONFIG_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_NAME)))
            .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_NAME)));
        Self { config_dir }
    }

    /// The file backing the store called `name`.
    pub fn store_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self
            .config_dir
            .join(format!("{}.{}", name, STORE_EXTENSION)))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Store names become file names, so they must be a single path component.
fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(PrefsError::InvalidName(name.to_owned()));
    }
    Ok(())
}
