//! Target environment requirements.
//!
//! # Modules
//!
//! - [`probe`] - Interpreter and numerical library detection
//! - [`installer`] - Handing the selected wheel to the package manager

pub mod installer;
pub mod probe;

pub use installer::{InstallRunner, InstallerCommand, SystemInstallRunner, DEFAULT_INSTALLER};
pub use probe::{
    base_version, detect, interpreter_tag, DetectedEnvironment, ProbeRequest, ProbeRunner,
    SystemRunner,
};
