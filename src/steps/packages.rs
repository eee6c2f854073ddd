//! Step 5: pip packages for the OCR provider
//!
//! Installs the rapidocr wheel set into a `--target` directory, pinned to
//! the Deck's manylinux platform and the bundled Python's version so pip
//! resolves wheels for the device rather than the build host. Completion
//! is marked by the package directories existing, so a re-run with the
//! markers in place does nothing.

use crate::context::FetchContext;
use crate::layout::PACKAGE_MARKERS;
use crate::output;
use crate::platform::pip_candidate_names;
use crate::runner::{Cmd, CommandRunner, run_sequence};
use crate::steps::StepOutcome;

const PIP_PACKAGES: &[&str] = &["rapidocr_onnxruntime", "pillow"];

/// Wheel tags for the target device, not the host running this tool.
const PIP_PLATFORM: &str = "manylinux2014_x86_64";
const PIP_PYTHON_VERSION: &str = "3.11";

pub fn install_packages(ctx: &FetchContext, runner: &dyn CommandRunner) -> StepOutcome {
    let packages_dir = ctx.layout.packages_dir();
    if PACKAGE_MARKERS
        .iter()
        .all(|dir| packages_dir.join(dir).is_dir())
    {
        output::skip("python packages already installed");
        return StepOutcome::AlreadySatisfied;
    }

    if !ctx.platform.can_run_linux_commands {
        return StepOutcome::Skipped(
            "no Linux-capable environment to run pip in".to_string(),
        );
    }

    let Some(pip) = ctx.platform.pip_command.as_deref() else {
        return StepOutcome::Failed(format!(
            "no working pip found (tried: {})",
            pip_candidate_names()
        ));
    };

    if let Err(e) = std::fs::create_dir_all(&packages_dir) {
        return StepOutcome::Failed(format!("cannot create packages dir: {}", e));
    }

    let mut args: Vec<String> = pip[1..].iter().map(|s| s.to_string()).collect();
    args.extend([
        "install".to_string(),
        "--target".to_string(),
        ctx.platform.exec_path(&packages_dir),
        "--platform".to_string(),
        PIP_PLATFORM.to_string(),
        "--python-version".to_string(),
        PIP_PYTHON_VERSION.to_string(),
        "--only-binary=:all:".to_string(),
        "--upgrade".to_string(),
    ]);
    args.extend(PIP_PACKAGES.iter().map(|p| p.to_string()));

    output::detail(&format!("installing {}", PIP_PACKAGES.join(", ")));
    match run_sequence(runner, ctx.platform.uses_wsl, vec![Cmd::new(pip[0].clone(), args)]) {
        Ok(()) => StepOutcome::Completed,
        Err(e) => StepOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::platform::Platform;
    use crate::runner::testing::RecordingRunner;
    use tempfile::tempdir;

    fn ctx(root: &std::path::Path, platform: Platform) -> FetchContext {
        FetchContext::new(Layout::new(root), platform)
    }

    #[test]
    fn test_markers_present_short_circuits() {
        let temp = tempdir().unwrap();
        let ctx = ctx(temp.path(), Platform::native_linux());
        for dir in PACKAGE_MARKERS {
            std::fs::create_dir_all(ctx.layout.packages_dir().join(dir)).unwrap();
        }

        let runner = RecordingRunner::new();
        let outcome = install_packages(&ctx, &runner);

        assert_eq!(outcome, StepOutcome::AlreadySatisfied);
        assert!(runner.recorded().is_empty());
    }

    #[test]
    fn test_unsupported_platform_skips() {
        let temp = tempdir().unwrap();
        let ctx = ctx(temp.path(), Platform::unsupported());

        let runner = RecordingRunner::new();
        let outcome = install_packages(&ctx, &runner);

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(runner.recorded().is_empty());
    }

    #[test]
    fn test_missing_pip_is_a_failure_naming_candidates() {
        let temp = tempdir().unwrap();
        let mut platform = Platform::native_linux();
        platform.pip_command = None;
        let ctx = ctx(temp.path(), platform);

        let outcome = install_packages(&ctx, &RecordingRunner::new());
        match outcome {
            StepOutcome::Failed(msg) => {
                assert!(msg.contains("pip3"));
                assert!(msg.contains("python3 -m pip"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_install_command_pins_target_platform() {
        let temp = tempdir().unwrap();
        let ctx = ctx(temp.path(), Platform::native_linux());

        let runner = RecordingRunner::new();
        let outcome = install_packages(&ctx, &runner);

        assert_eq!(outcome, StepOutcome::Completed);
        let recorded = runner.recorded();
        assert_eq!(recorded.len(), 1);
        let cmd = &recorded[0];
        assert!(cmd.starts_with("pip3 install --target "));
        assert!(cmd.contains("--platform manylinux2014_x86_64"));
        assert!(cmd.contains("--python-version 3.11"));
        assert!(cmd.contains("--only-binary=:all:"));
        assert!(cmd.contains("--upgrade"));
        assert!(cmd.ends_with("rapidocr_onnxruntime pillow"));
        assert!(ctx.layout.packages_dir().is_dir());
    }

    #[test]
    fn test_module_pip_keeps_module_args() {
        let temp = tempdir().unwrap();
        let mut platform = Platform::native_linux();
        platform.pip_command = Some(vec![
            "python3".to_string(),
            "-m".to_string(),
            "pip".to_string(),
        ]);
        let ctx = ctx(temp.path(), platform);

        let runner = RecordingRunner::new();
        let outcome = install_packages(&ctx, &runner);

        assert_eq!(outcome, StepOutcome::Completed);
        assert!(runner.recorded()[0].starts_with("python3 -m pip install "));
    }

    #[test]
    fn test_failed_install_is_failed() {
        let temp = tempdir().unwrap();
        let ctx = ctx(temp.path(), Platform::native_linux());

        let runner = RecordingRunner::failing_on("pip3");
        let outcome = install_packages(&ctx, &runner);
        assert!(matches!(outcome, StepOutcome::Failed(_)));
    }
}
