//! Runs the external project generator (Tuist) against an assembled project.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use console::style;

use crate::error::{MakeIosError, Result};

pub const DEFAULT_TUIST: &str = "tuist";

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static HANDLER: Once = Once::new();

/// Exit status of an external tool. `code` is `None` when it died from a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOutcome {
    pub code: Option<i32>,
}

impl ToolOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait ProjectGenerator {
    /// Name shown in messages.
    fn name(&self) -> &str;

    /// Produce the build project for the assembled tree at `project_dir`.
    fn generate(&self, project_dir: &Path) -> Result<ToolOutcome>;
}

/// Invokes `tuist install` (when the project declares packages) and `tuist generate`.
pub struct TuistGenerator {
    program: PathBuf,
    open: bool,
}

impl TuistGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            open: false,
        }
    }

    /// Let Tuist open the generated workspace in Xcode.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Argument lists for each tool invocation, in order.
    pub fn steps(&self, project_dir: &Path) -> Vec<Vec<String>> {
        let mut steps = Vec::new();
        let declares_packages = project_dir.join("Tuist/Package.swift").exists()
            || project_dir.join("Package.swift").exists();
        if declares_packages {
            steps.push(vec!["install".to_string()]);
        }

        let mut generate = vec!["generate".to_string()];
        if !self.open {
            generate.push("--no-open".to_string());
        }
        steps.push(generate);
        steps
    }

    fn run_step(&self, args: &[String], project_dir: &Path) -> Result<ToolOutcome> {
        println!(
            "{} {} {}",
            style("==>").cyan().bold(),
            self.program.display(),
            args.join(" ")
        );

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(project_dir)
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MakeIosError::ToolNotFound {
                        tool: self.program.display().to_string(),
                    }
                } else {
                    MakeIosError::ExternalTool {
                        tool: self.program.display().to_string(),
                        message: format!("failed to execute: {e}"),
                    }
                }
            })?;

        Ok(ToolOutcome {
            code: status.code(),
        })
    }
}

impl Default for TuistGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TUIST)
    }
}

impl ProjectGenerator for TuistGenerator {
    fn name(&self) -> &str {
        "tuist"
    }

    fn generate(&self, project_dir: &Path) -> Result<ToolOutcome> {
        for args in self.steps(project_dir) {
            let outcome = self.run_step(&args, project_dir)?;
            if !outcome.success() {
                return Ok(outcome);
            }
        }
        Ok(ToolOutcome { code: Some(0) })
    }
}

/// Record Ctrl-C instead of exiting, so we wait for the child to finish.
///
/// The terminal delivers the interrupt to the whole foreground process group,
/// so the child receives it directly.
fn install_interrupt_handler() {
    HANDLER.call_once(|| {
        ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst)).ok();
    });
}

/// Run `generator` and turn anything but a zero exit into an error.
pub fn run_generator(generator: &dyn ProjectGenerator, project_dir: &Path) -> Result<()> {
    install_interrupt_handler();
    INTERRUPTED.store(false, Ordering::SeqCst);

    let outcome = generator.generate(project_dir)?;

    if INTERRUPTED.load(Ordering::SeqCst) {
        return Err(MakeIosError::Interrupted {
            tool: generator.name().to_string(),
        });
    }

    if outcome.success() {
        return Ok(());
    }

    let message = match outcome.code {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by a signal".to_string(),
    };
    Err(MakeIosError::ExternalTool {
        tool: generator.name().to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Fixed(Option<i32>);

    impl ProjectGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn generate(&self, _project_dir: &Path) -> Result<ToolOutcome> {
            Ok(ToolOutcome { code: self.0 })
        }
    }

    #[test]
    fn test_steps_without_packages() {
        let dir = tempfile::tempdir().unwrap();
        let steps = TuistGenerator::default().steps(dir.path());
        assert_eq!(steps, vec![vec!["generate", "--no-open"]]);
    }

    #[test]
    fn test_steps_with_packages_and_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Tuist")).unwrap();
        fs::write(dir.path().join("Tuist/Package.swift"), "// swift-tools-version: 5.9").unwrap();

        let steps = TuistGenerator::default().with_open(true).steps(dir.path());
        assert_eq!(steps, vec![vec!["install"], vec!["generate"]]);
    }

    #[test]
    fn test_run_generator_success() {
        let dir = tempfile::tempdir().unwrap();
        run_generator(&Fixed(Some(0)), dir.path()).unwrap();
    }

    #[test]
    fn test_run_generator_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_generator(&Fixed(Some(2)), dir.path()).unwrap_err();
        match err {
            MakeIosError::ExternalTool { tool, message } => {
                assert_eq!(tool, "fixed");
                assert!(message.contains('2'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_tool_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let generator = TuistGenerator::new(dir.path().join("no-such-tuist"));
        let err = generator.generate(dir.path()).unwrap_err();
        assert!(matches!(err, MakeIosError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_tuist_generator_runs_program_in_project_dir() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        let script = bin.path().join("fake-tuist");
        fs::write(
            &script,
            "#!/bin/sh\necho \"$@\" >> \"$PWD/calls.log\"\n[ \"$1\" = generate ] && exit 3\nexit 0\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(project.path().join("Package.swift"), "").unwrap();

        let outcome = TuistGenerator::new(&script).generate(project.path()).unwrap();
        assert_eq!(outcome, ToolOutcome { code: Some(3) });

        let calls = fs::read_to_string(project.path().join("calls.log")).unwrap();
        assert_eq!(calls, "install\ngenerate --no-open\n");
    }
}
