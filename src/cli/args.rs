//! CLI argument definitions.
//!
//! The entry point is the [`Cli`] struct, parsed with clap's derive macros.

use clap::Parser;
use std::path::PathBuf;

use crate::config::SettingsLayer;

/// Find and install the prebuilt wheel matching this Python, CUDA and torch.
#[derive(Debug, Clone, Parser)]
#[command(name = "wheelpick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Accelerator build tag to match in wheel filenames (e.g. cu121, cu126)
    pub accelerator_tag: String,

    /// File listing candidate wheel URLs, one per line
    pub candidates: PathBuf,

    /// Python interpreter to probe
    #[arg(long, env = "WHEELPICK_PYTHON", value_name = "PROGRAM")]
    pub python: Option<String>,

    /// Installer command; the wheel URL is appended [default: uv pip install]
    #[arg(long, env = "WHEELPICK_INSTALLER", value_name = "COMMAND")]
    pub installer: Option<String>,

    /// Distribution name in wheel filenames [default: flash_attn]
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Numerical library whose version must match [default: torch]
    #[arg(long, value_name = "MODULE")]
    pub library: Option<String>,

    /// Prefix of the library tag in wheel filenames [default: torch]
    #[arg(long, value_name = "PREFIX")]
    pub library_tag_prefix: Option<String>,

    /// Use this Python version instead of probing the interpreter
    #[arg(long, value_name = "VERSION")]
    pub python_version: Option<String>,

    /// Use this library version instead of probing the interpreter
    #[arg(long, value_name = "VERSION")]
    pub library_version: Option<String>,

    /// Path to settings file (overrides ./wheelpick.yml)
    #[arg(short, long, env = "WHEELPICK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the selected URL instead of installing it
    #[arg(long)]
    pub dry_run: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Settings given on the command line or through the environment.
    pub fn settings_layer(&self) -> SettingsLayer {
        SettingsLayer {
            python: self.python.clone(),
            installer: self.installer.clone(),
            package: self.package.clone(),
            library: self.library.clone(),
            library_tag_prefix: self.library_tag_prefix.clone(),
        }
    }
}
