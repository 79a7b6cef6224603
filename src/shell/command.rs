//! Child process execution.
//!
//! Programs are spawned directly with an argument vector, never through a
//! shell, so URLs and paths reach the child verbatim.

use std::io;
use std::process::{Command, Stdio};

/// Result of executing a child process.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Whether the process succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            success: false,
        }
    }
}

/// Options for process execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Execute `program` with `args` and wait for it to finish.
///
/// Spawn failures (including a missing executable) are returned as the
/// underlying [`io::Error`] so callers can tell `NotFound` apart from other
/// problems. A non-zero exit is not an error; check [`CommandResult::success`].
pub fn execute<S: AsRef<str>>(
    program: &str,
    args: &[S],
    options: &CommandOptions,
) -> io::Result<CommandResult> {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|a| a.as_ref()));

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output()?;

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr))
    } else {
        Ok(CommandResult::failure(output.status.code(), stdout, stderr))
    }
}

/// Execute a program with both streams captured.
pub fn execute_captured<S: AsRef<str>>(program: &str, args: &[S]) -> io::Result<CommandResult> {
    let options = CommandOptions {
        capture_stdout: true,
        capture_stderr: true,
    };
    execute(program, args, &options)
}

/// Execute a program with both streams passed through to the caller's.
pub fn execute_inherited<S: AsRef<str>>(program: &str, args: &[S]) -> io::Result<CommandResult> {
    execute(program, args, &CommandOptions::default())
}
