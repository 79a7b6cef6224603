//! Settings file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::schema::SettingsLayer;
use crate::error::{Result, WheelpickError};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "wheelpick.yml";

/// Find the settings file to load.
///
/// An explicit path is returned as-is (it must exist when loaded);
/// otherwise `wheelpick.yml` in `dir` is used if present.
pub fn discover(dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let path = dir.join(DEFAULT_CONFIG_FILE);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a single settings file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<SettingsLayer> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WheelpickError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            WheelpickError::Io(e)
        }
    })?;

    debug!("Loading settings from {}", path.display());
    parse_config(&content, path)
}

/// Parse YAML content into a [`SettingsLayer`].
///
/// An empty document yields an empty layer.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SettingsLayer> {
    if content.trim().is_empty() {
        return Ok(SettingsLayer::default());
    }

    serde_yaml::from_str(content).map_err(|e| WheelpickError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Discover and load the settings file, if any.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<Option<SettingsLayer>> {
    discover(dir, explicit)
        .map(|path| load_config_file(&path))
        .transpose()
}
