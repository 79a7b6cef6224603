//! Environment probe for the target interpreter and numerical library.
//!
//! wheelpick runs outside the Python environment it installs into, so the
//! probe asks the interpreter about itself: one child process runs a short
//! inline script that reports `platform.python_version()` and the imported
//! library's `__version__` as a single JSON object.
//!
//! # Example
//!
//! ```no_run
//! use wheelpick::requirements::probe::{detect, ProbeRequest, SystemRunner};
//!
//! let request = ProbeRequest::new("python", "torch");
//! let env = detect(&request, &SystemRunner).unwrap();
//! println!("{} / torch {}", env.interpreter_tag, env.library_version);
//! ```

use std::io;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, WheelpickError};
use crate::shell::{self, CommandResult};

/// Inline script run by the interpreter. `sys.argv[1]` is the library name.
const PROBE_SCRIPT: &str = r#"
import importlib, json, platform, sys
version, error = None, None
try:
    version = str(importlib.import_module(sys.argv[1]).__version__)
except Exception as e:
    error = "%s: %s" % (type(e).__name__, e)
print(json.dumps({"python": platform.python_version(), "library": version, "error": error}))
"#;

/// Pre-release marker cut from library versions (`2.1.0a0+git` → `2.1.0`).
const PRERELEASE_MARKER: &str = "a0";

/// Runs probe commands. Swappable so tests can supply canned output.
pub trait ProbeRunner {
    /// Run `program` with `args`, capturing its output.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandResult>;
}

/// Runs probe commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProbeRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandResult> {
        shell::execute_captured(program, args)
    }
}

/// What to probe, and any values already known.
#[derive(Debug, Clone)]
pub struct ProbeRequest<'a> {
    /// Interpreter program (`python`, `/opt/venv/bin/python`, ...).
    pub python: &'a str,
    /// Import name of the numerical library.
    pub library: &'a str,
    /// Interpreter version supplied by the caller instead of probing.
    pub python_version: Option<&'a str>,
    /// Raw library version supplied by the caller instead of probing.
    pub library_version: Option<&'a str>,
}

impl<'a> ProbeRequest<'a> {
    /// Probe everything through `python`.
    pub fn new(python: &'a str, library: &'a str) -> Self {
        Self {
            python,
            library,
            python_version: None,
            library_version: None,
        }
    }

    /// Whether the interpreter has to be run at all.
    pub fn needs_interpreter(&self) -> bool {
        self.python_version.is_none() || self.library_version.is_none()
    }
}

/// JSON report printed by [`PROBE_SCRIPT`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InterpreterReport {
    /// `platform.python_version()`, e.g. `3.10.12`.
    pub python: String,
    /// The library's `__version__`, if it imported.
    pub library: Option<String>,
    /// Import failure text, if it did not.
    pub error: Option<String>,
}

/// Environment values the selector needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedEnvironment {
    /// e.g. `cp310`.
    pub interpreter_tag: String,
    /// Library version without build metadata or pre-release marker.
    pub library_version: String,
}

/// Run the interpreter once and decode its report.
pub fn query_interpreter(
    python: &str,
    library: &str,
    runner: &dyn ProbeRunner,
) -> Result<InterpreterReport> {
    debug!("Probing {} for interpreter and '{}' versions", python, library);

    let result = runner
        .run(python, &["-c", PROBE_SCRIPT, library])
        .map_err(|e| {
            let message = if e.kind() == io::ErrorKind::NotFound {
                "interpreter not found on PATH".to_string()
            } else {
                format!("could not run interpreter: {}", e)
            };
            WheelpickError::MissingDependency {
                dependency: python.to_string(),
                message,
            }
        })?;

    if !result.success {
        return Err(WheelpickError::MissingDependency {
            dependency: python.to_string(),
            message: format!(
                "interpreter exited with code {:?}: {}",
                result.exit_code,
                result.stderr.trim()
            ),
        });
    }

    let line = result.stdout.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
    serde_json::from_str(line.trim()).map_err(|e| WheelpickError::MissingDependency {
        dependency: python.to_string(),
        message: format!("unexpected probe output '{}': {}", line.trim(), e),
    })
}

/// Resolve the interpreter tag and base library version.
///
/// Values supplied in `request` win over probed ones. A library that cannot
/// be imported, or whose version normalizes to nothing, is reported as
/// [`WheelpickError::MissingDependency`].
pub fn detect(request: &ProbeRequest<'_>, runner: &dyn ProbeRunner) -> Result<DetectedEnvironment> {
    let report = if request.needs_interpreter() {
        Some(query_interpreter(request.python, request.library, runner)?)
    } else {
        None
    };

    let python_version = request
        .python_version
        .map(str::to_string)
        .or_else(|| report.as_ref().map(|r| r.python.clone()))
        .unwrap_or_default();

    let interpreter_tag =
        interpreter_tag(&python_version).ok_or_else(|| WheelpickError::MissingDependency {
            dependency: request.python.to_string(),
            message: format!("unrecognized interpreter version '{}'", python_version),
        })?;

    let raw_library = request
        .library_version
        .map(str::to_string)
        .or_else(|| report.as_ref().and_then(|r| r.library.clone()));

    let Some(raw_library) = raw_library else {
        let reason = report
            .as_ref()
            .and_then(|r| r.error.clone())
            .unwrap_or_else(|| "no version reported".to_string());
        return Err(WheelpickError::MissingDependency {
            dependency: request.library.to_string(),
            message: format!(
                "not installed or accessible in the target environment ({})",
                reason
            ),
        });
    };

    let library_version = base_version(&raw_library);
    if library_version.is_empty() {
        return Err(WheelpickError::MissingDependency {
            dependency: request.library.to_string(),
            message: format!("no usable version in '{}'", raw_library),
        });
    }
    debug!(
        "Detected interpreter {} ({}), {} {} (reported '{}')",
        interpreter_tag, python_version, request.library, library_version, raw_library
    );

    Ok(DetectedEnvironment {
        interpreter_tag,
        library_version,
    })
}

/// `cp` followed by the major and minor version digits (`3.10.12` → `cp310`).
///
/// Returns `None` unless the first two components are numeric.
pub fn interpreter_tag(python_version: &str) -> Option<String> {
    let mut parts = python_version.trim().split('.');
    let major = parts.next()?.parse::<u32>().ok()?;
    let minor = parts.next()?.parse::<u32>().ok()?;
    Some(format!("cp{}{}", major, minor))
}

/// Strip build metadata (`+...`) and the pre-release marker from a version.
pub fn base_version(raw: &str) -> String {
    let without_local = raw.trim().split('+').next().unwrap_or_default();
    without_local
        .split(PRERELEASE_MARKER)
        .next()
        .unwrap_or_default()
        .to_string()
}
