//! Configuration schema definitions for wheelpick.
//!
//! [`SettingsLayer`] maps to the YAML settings file (and to the CLI flags);
//! [`Settings`] is the fully resolved result.

use serde::Deserialize;

use crate::requirements::installer::DEFAULT_INSTALLER;

/// One layer of partially specified settings.
///
/// Every field is optional; unset fields fall through to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsLayer {
    /// Interpreter to probe.
    pub python: Option<String>,

    /// Installer command line; the wheel URL is appended.
    pub installer: Option<String>,

    /// Distribution name in wheel filenames.
    pub package: Option<String>,

    /// Import name of the numerical library.
    pub library: Option<String>,

    /// Prefix of the library tag in wheel filenames.
    pub library_tag_prefix: Option<String>,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub python: String,
    pub installer: String,
    pub package: String,
    pub library: String,
    pub library_tag_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            python: "python".to_string(),
            installer: DEFAULT_INSTALLER.to_string(),
            package: "flash_attn".to_string(),
            library: "torch".to_string(),
            library_tag_prefix: "torch".to_string(),
        }
    }
}

impl Settings {
    /// Apply `layer` on top of these settings.
    pub fn apply(&mut self, layer: &SettingsLayer) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut self.python, &layer.python);
        set(&mut self.installer, &layer.installer);
        set(&mut self.package, &layer.package);
        set(&mut self.library, &layer.library);
        set(&mut self.library_tag_prefix, &layer.library_tag_prefix);
    }

    /// Defaults with each layer applied in order; later layers win.
    pub fn resolve<'a>(layers: impl IntoIterator<Item = &'a SettingsLayer>) -> Self {
        let mut settings = Self::default();
        for layer in layers {
            settings.apply(layer);
        }
        settings
    }
}
