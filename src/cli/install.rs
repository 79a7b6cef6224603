//! The install command: probe, parse, select, install.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::candidates::{select, CandidateParser, SelectionCriteria};
use crate::cli::args::Cli;
use crate::config::{load_config, Settings};
use crate::error::{Result, WheelpickError};
use crate::requirements::installer::{InstallRunner, InstallerCommand, SystemInstallRunner};
use crate::requirements::probe::{detect, ProbeRequest, ProbeRunner, SystemRunner};

/// Result of command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// What happened.
    pub outcome: Outcome,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

/// Non-fatal ways a run can end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The wheel was installed.
    Installed { url: String },
    /// The wheel was selected but `--dry-run` skipped installation.
    Selected { url: String },
    /// No candidate matched; the caller's fallback takes over.
    NoMatch,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success(outcome: Outcome) -> Self {
        Self {
            outcome,
            exit_code: 0,
        }
    }
}

/// Resolves and installs the matching wheel.
pub struct InstallCommand {
    cli: Cli,
    working_dir: PathBuf,
}

impl InstallCommand {
    /// Create the command; `working_dir` is where `wheelpick.yml` is looked up.
    pub fn new(cli: Cli, working_dir: &Path) -> Self {
        Self {
            cli,
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Run against the real interpreter and installer.
    pub fn execute(&self) -> Result<CommandResult> {
        self.execute_with(&SystemRunner, &SystemInstallRunner)
    }

    /// Run with the given probe and install runners.
    ///
    /// Every `Err` is fatal (exit 1). A missing match is `Ok` with
    /// [`Outcome::NoMatch`].
    pub fn execute_with(
        &self,
        probe_runner: &dyn ProbeRunner,
        install_runner: &dyn InstallRunner,
    ) -> Result<CommandResult> {
        let settings = self.settings()?;
        debug!("Resolved settings: {:?}", settings);

        let installer = InstallerCommand::parse(&settings.installer).ok_or_else(|| {
            anyhow::anyhow!("Installer command is empty; set --installer or 'installer:'")
        })?;

        let request = ProbeRequest {
            python_version: self.cli.python_version.as_deref(),
            library_version: self.cli.library_version.as_deref(),
            ..ProbeRequest::new(&settings.python, &settings.library)
        };
        let env = detect(&request, probe_runner)?;

        let content = read_candidates(&self.cli.candidates)?;

        let criteria = SelectionCriteria::new(
            env.interpreter_tag.as_str(),
            self.cli.accelerator_tag.as_str(),
            &settings.library_tag_prefix,
            &env.library_version,
        );
        info!(
            "Searching for {} wheel: {} ({} base {})",
            settings.package, criteria, settings.library, env.library_version
        );

        let parsed = CandidateParser::new(&settings.package)?.parse(&content);
        debug!(
            "Parsed {} candidates, skipped {} lines",
            parsed.candidates.len(),
            parsed.warnings.len()
        );

        let Some(chosen) = select(&parsed.candidates, &criteria) else {
            info!(
                "No suitable {} wheel found in {} for {}",
                settings.package,
                self.cli.candidates.display(),
                criteria
            );
            return Ok(CommandResult::success(Outcome::NoMatch));
        };
        info!("Found compatible wheel: {}", chosen.url);

        if self.cli.dry_run {
            println!("{}", chosen.url);
            return Ok(CommandResult::success(Outcome::Selected {
                url: chosen.url.clone(),
            }));
        }

        installer.install(&chosen.url, install_runner)?;
        Ok(CommandResult::success(Outcome::Installed {
            url: chosen.url.clone(),
        }))
    }

    /// Defaults, then the settings file, then flags and environment.
    fn settings(&self) -> Result<Settings> {
        let file = load_config(&self.working_dir, self.cli.config.as_deref())?;
        let cli = self.cli.settings_layer();
        Ok(Settings::resolve(file.iter().chain([&cli])))
    }
}

/// Read the candidate list, mapping a missing file to `CandidatesNotFound`.
fn read_candidates(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WheelpickError::CandidatesNotFound {
                path: path.to_path_buf(),
            }
        } else {
            WheelpickError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::CommandResult as ProcessResult;
    use clap::Parser;
    use std::cell::RefCell;
    use std::io;
    use tempfile::TempDir;

    const LIST: &str = "\
https://h/flash_attn-2.6.3+cu121torch2.4cxx11abiFALSE-cp310-cp310-linux_x86_64.whl
https://h/flash_attn-abc-cp310-cu121.whl
https://h/flash_attn-2.7.0.post2+cu121torch2.4cxx11abiFALSE-cp310-cp310-linux_x86_64.whl
https://h/flash_attn-2.7.0.post2+cu124torch2.4cxx11abiFALSE-cp311-cp311-linux_x86_64.whl
";

    struct ReportRunner(&'static str);

    impl ProbeRunner for ReportRunner {
        fn run(&self, _program: &str, _args: &[&str]) -> io::Result<ProcessResult> {
            Ok(ProcessResult::success(self.0.to_string(), String::new()))
        }
    }

    struct FakeInstaller {
        exit_code: i32,
        urls: RefCell<Vec<String>>,
    }

    impl FakeInstaller {
        fn new(exit_code: i32) -> Self {
            Self {
                exit_code,
                urls: RefCell::new(Vec::new()),
            }
        }
    }

    impl InstallRunner for FakeInstaller {
        fn run(&self, _program: &str, args: &[String]) -> io::Result<ProcessResult> {
            self.urls
                .borrow_mut()
                .push(args.last().cloned().unwrap_or_default());
            Ok(if self.exit_code == 0 {
                ProcessResult::success(String::new(), String::new())
            } else {
                ProcessResult::failure(Some(self.exit_code), String::new(), String::new())
            })
        }
    }

    const TORCH_24: ReportRunner =
        ReportRunner(r#"{"python": "3.10.12", "library": "2.4.0+cu121", "error": null}"#);

    fn setup(list: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("flash.txt"), list).unwrap();
        temp
    }

    fn command(temp: &TempDir, extra: &[&str]) -> InstallCommand {
        let list = temp.path().join("flash.txt");
        let mut argv = vec!["wheelpick", "cu121", list.to_str().unwrap()];
        argv.extend_from_slice(extra);
        InstallCommand::new(Cli::try_parse_from(argv).unwrap(), temp.path())
    }

    #[test]
    fn installs_newest_matching_wheel() {
        let temp = setup(LIST);
        let installer = FakeInstaller::new(0);

        let result = command(&temp, &[]).execute_with(&TORCH_24, &installer).unwrap();

        let expected =
            "https://h/flash_attn-2.7.0.post2+cu121torch2.4cxx11abiFALSE-cp310-cp310-linux_x86_64.whl";
        assert_eq!(result.exit_code, 0);
        assert_eq!(
            result.outcome,
            Outcome::Installed {
                url: expected.to_string()
            }
        );
        assert_eq!(*installer.urls.borrow(), vec![expected.to_string()]);
    }

    #[test]
    fn no_match_is_success_without_install() {
        let temp = setup(LIST);
        let installer = FakeInstaller::new(0);
        let runner = ReportRunner(r#"{"python": "3.12.0", "library": "2.5.1", "error": null}"#);

        let result = command(&temp, &[]).execute_with(&runner, &installer).unwrap();

        assert_eq!(result.outcome, Outcome::NoMatch);
        assert_eq!(result.exit_code, 0);
        assert!(installer.urls.borrow().is_empty());
    }

    #[test]
    fn empty_list_is_no_match() {
        let temp = setup("");
        let result = command(&temp, &[])
            .execute_with(&TORCH_24, &FakeInstaller::new(0))
            .unwrap();
        assert_eq!(result.outcome, Outcome::NoMatch);
    }

    #[test]
    fn dry_run_selects_without_installing() {
        let temp = setup(LIST);
        let installer = FakeInstaller::new(0);

        let result = command(&temp, &["--dry-run"])
            .execute_with(&TORCH_24, &installer)
            .unwrap();

        assert!(matches!(result.outcome, Outcome::Selected { .. }));
        assert!(installer.urls.borrow().is_empty());
    }

    #[test]
    fn failed_install_is_error() {
        let temp = setup(LIST);
        let err = command(&temp, &[])
            .execute_with(&TORCH_24, &FakeInstaller::new(1))
            .unwrap_err();
        assert!(matches!(err, WheelpickError::InstallFailed { .. }));
    }

    #[test]
    fn missing_library_is_error() {
        let temp = setup(LIST);
        let runner = ReportRunner(
            r#"{"python": "3.10.12", "library": null, "error": "ModuleNotFoundError: No module named 'torch'"}"#,
        );
        let err = command(&temp, &[])
            .execute_with(&runner, &FakeInstaller::new(0))
            .unwrap_err();
        assert!(matches!(err, WheelpickError::MissingDependency { .. }));
    }

    #[test]
    fn unusable_library_version_installs_nothing() {
        let temp = setup("https://h/flash_attn-2.6.3+cu121torch2.1-cp310.whl\n");
        let installer = FakeInstaller::new(0);

        let err = command(&temp, &["--library-version", "+cu121"])
            .execute_with(&TORCH_24, &installer)
            .unwrap_err();

        assert!(matches!(err, WheelpickError::MissingDependency { .. }));
        assert!(installer.urls.borrow().is_empty());
    }

    #[test]
    fn missing_candidate_file_is_error() {
        let temp = TempDir::new().unwrap();
        let err = command(&temp, &[])
            .execute_with(&TORCH_24, &FakeInstaller::new(0))
            .unwrap_err();
        assert!(matches!(err, WheelpickError::CandidatesNotFound { .. }));
    }

    #[test]
    fn overrides_replace_probed_values() {
        let temp = setup(LIST);
        let installer = FakeInstaller::new(0);

        let result = command(
            &temp,
            &["--python-version", "3.11.9", "--library-version", "2.4.1"],
        )
        .execute_with(&ReportRunner("not json"), &installer);

        // cu121 + cp311 has no candidate
        assert_eq!(result.unwrap().outcome, Outcome::NoMatch);
    }

    #[test]
    fn settings_file_is_applied() {
        let temp = setup(
            "https://h/xformers-0.0.28+cu121pt2.4-cp310.whl\nhttps://h/flash_attn-2.6.3+cu121torch2.4-cp310.whl\n",
        );
        fs::write(
            temp.path().join("wheelpick.yml"),
            "package: xformers\nlibrary_tag_prefix: pt\n",
        )
        .unwrap();
        let installer = FakeInstaller::new(0);

        command(&temp, &[]).execute_with(&TORCH_24, &installer).unwrap();

        assert_eq!(
            *installer.urls.borrow(),
            vec!["https://h/xformers-0.0.28+cu121pt2.4-cp310.whl".to_string()]
        );
    }

    #[test]
    fn flags_override_settings_file() {
        let temp = setup(LIST);
        fs::write(temp.path().join("wheelpick.yml"), "package: xformers\n").unwrap();
        let installer = FakeInstaller::new(0);

        let result = command(&temp, &["--package", "flash_attn"])
            .execute_with(&TORCH_24, &installer)
            .unwrap();
        assert!(matches!(result.outcome, Outcome::Installed { .. }));
    }

    #[test]
    fn invalid_settings_file_is_error() {
        let temp = setup(LIST);
        fs::write(temp.path().join("wheelpick.yml"), "unknown_key: 1\n").unwrap();

        let err = command(&temp, &[])
            .execute_with(&TORCH_24, &FakeInstaller::new(0))
            .unwrap_err();
        assert!(matches!(err, WheelpickError::ConfigParseError { .. }));
    }

    #[test]
    fn blank_installer_is_error() {
        let temp = setup(LIST);
        let err = command(&temp, &["--installer", " "])
            .execute_with(&TORCH_24, &FakeInstaller::new(0))
            .unwrap_err();
        assert!(err.to_string().contains("Installer command is empty"));
    }
}
