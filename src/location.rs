use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TokenVaultError;

pub const DEFAULT_APP_NAME: &str = "hips-checkin";
pub const DEFAULT_FILE_NAME: &str = "token.enc";

/// Where the token file lives: `<config root>/<app_name>/<file_name>`.
///
/// Deserializable with defaults for every field, so a host application can
/// embed it in its own settings file and only override what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageLocation {
    pub app_name: String,
    pub file_name: String,
    /// Override for the per-user config directory. `None` asks the platform.
    pub config_root: Option<PathBuf>,
}

impl Default for StorageLocation {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            config_root: None,
        }
    }
}

impl StorageLocation {
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_config_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config_root = Some(root.into());
        self
    }

    /// The application directory, without touching the filesystem.
    pub fn app_dir(&self) -> Result<PathBuf, TokenVaultError> {
        let root = match &self.config_root {
            Some(root) => root.clone(),
            None => dirs::config_dir().ok_or(TokenVaultError::ConfigDirUnavailable)?,
        };
        Ok(root.join(&self.app_name))
    }

    /// Ensure the application directory exists and return the token file path.
    ///
    /// Safe to call repeatedly. An existing directory is left as is, including
    /// its permissions.
    pub fn resolve(&self) -> Result<PathBuf, TokenVaultError> {
        let dir = self.app_dir()?;
        if !dir.is_dir() {
            create_private_dir(&dir).map_err(|source| TokenVaultError::StorageDir {
                path: dir.clone(),
                source,
            })?;
            debug!(dir = %dir.display(), "created storage directory");
        }
        Ok(dir.join(&self.file_name))
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
