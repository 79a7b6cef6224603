//! wheelpick CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wheelpick::cli::{Cli, InstallCommand};

/// Initialize the tracing subscriber for logging.
///
/// All diagnostics go to stderr. Log level is controlled by:
/// 1. `--debug` sets level to DEBUG, `--quiet` to ERROR
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool, quiet: bool) {
    let filter = if debug {
        EnvFilter::new("wheelpick=debug")
    } else if quiet {
        EnvFilter::new("wheelpick=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wheelpick=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    // Usage errors exit 1, not clap's default of 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.debug, cli.quiet);

    tracing::debug!("wheelpick starting with args: {:?}", cli);

    let working_dir = std::env::current_dir().unwrap_or_default();
    let command = InstallCommand::new(cli, &working_dir);

    match command.execute() {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    }
}
