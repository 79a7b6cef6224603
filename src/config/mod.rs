//! Settings loading and resolution.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use wheelpick::config::{Settings, SettingsLayer};
//!
//! let file = SettingsLayer {
//!     installer: Some("pip install".to_string()),
//!     ..Default::default()
//! };
//! let settings = Settings::resolve([&file]);
//! assert_eq!(settings.installer, "pip install");
//! assert_eq!(settings.library, "torch");
//! ```
//!
//! # Precedence
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults
//! 2. Settings file (`--config`, `WHEELPICK_CONFIG`, or `./wheelpick.yml`)
//! 3. Environment variables and command-line flags

pub mod loader;
pub mod schema;

pub use loader::{discover, load_config, load_config_file, parse_config, DEFAULT_CONFIG_FILE};
pub use schema::{Settings, SettingsLayer};
