//! Error types for wheelpick operations.
//!
//! This module defines [`WheelpickError`], the error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant here is fatal: the CLI reports it and exits with status 1
//! - Recoverable conditions (a malformed candidate line, no matching wheel)
//!   are plain values, not errors
//! - Use `anyhow::Error` (via `WheelpickError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wheelpick operations.
#[derive(Debug, Error)]
pub enum WheelpickError {
    /// The interpreter or the numerical library could not be probed.
    #[error("Missing dependency '{dependency}': {message}")]
    MissingDependency { dependency: String, message: String },

    /// The candidate list file does not exist.
    #[error("Candidate list not found at {path}")]
    CandidatesNotFound { path: PathBuf },

    /// Settings file not found at the requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The installer could not be spawned or exited unsuccessfully.
    #[error("Failed to install {url}: {message}")]
    InstallFailed { url: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for wheelpick operations.
pub type Result<T> = std::result::Result<T, WheelpickError>;
