//! Platform capability detection
//!
//! The AppImage extraction and pip install steps need a Linux-compatible
//! execution environment: native Linux, or WSL on a Windows host. The
//! capability is probed once at startup into a [`Platform`] value and
//! passed into every step that shells out, so steps can be tested with a
//! hand-built `Platform` instead of global state.

use crate::runner::{Cmd, CommandRunner};

/// Pip invocations probed in order; the first that answers `--version` wins.
const PIP_CANDIDATES: &[&[&str]] = &[&["pip3"], &["pip"], &["python3", "-m", "pip"]];

#[derive(Debug, Clone)]
pub struct Platform {
    /// Whether Linux commands can run at all (natively or through WSL).
    pub can_run_linux_commands: bool,
    /// Commands must be wrapped in `wsl.exe` and paths translated.
    pub uses_wsl: bool,
    /// The working pip invocation, e.g. `["pip3"]` or `["python3", "-m", "pip"]`.
    /// `None` when no candidate responded; the install step treats that as
    /// a hard precondition failure, distinct from "platform unsupported".
    pub pip_command: Option<Vec<String>>,
}

impl Platform {
    /// Probe the environment once. Native Linux is always capable; other
    /// hosts are capable only when `wsl.exe --status` succeeds.
    pub fn detect(runner: &dyn CommandRunner) -> Self {
        let (can_run, uses_wsl) = if cfg!(target_os = "linux") {
            (true, false)
        } else {
            let wsl_ok = runner
                .output(&Cmd::new("wsl.exe", ["--status"]))
                .map(|out| out.success)
                .unwrap_or(false);
            (wsl_ok, wsl_ok)
        };

        let pip_command = if can_run {
            probe_pip(runner, uses_wsl)
        } else {
            None
        };

        Platform {
            can_run_linux_commands: can_run,
            uses_wsl,
            pip_command,
        }
    }

    /// A capable native-Linux platform (test construction helper).
    pub fn native_linux() -> Self {
        Platform {
            can_run_linux_commands: true,
            uses_wsl: false,
            pip_command: Some(vec!["pip3".to_string()]),
        }
    }

    /// A host with no Linux compatibility layer at all.
    pub fn unsupported() -> Self {
        Platform {
            can_run_linux_commands: false,
            uses_wsl: false,
            pip_command: None,
        }
    }

    /// Render a host path the way an external command must see it:
    /// translated to the WSL mount form when running through WSL,
    /// verbatim otherwise.
    pub fn exec_path(&self, path: &std::path::Path) -> String {
        let raw = path.display().to_string();
        if self.uses_wsl { to_wsl_path(&raw) } else { raw }
    }
}

fn probe_pip(runner: &dyn CommandRunner, uses_wsl: bool) -> Option<Vec<String>> {
    for candidate in PIP_CANDIDATES {
        let mut args: Vec<String> = candidate[1..].iter().map(|s| s.to_string()).collect();
        args.push("--version".to_string());
        let cmd = Cmd::new(candidate[0], args);
        let cmd = if uses_wsl { cmd.via_wsl() } else { cmd };

        if let Ok(out) = runner.output(&cmd)
            && out.success
        {
            return Some(candidate.iter().map(|s| s.to_string()).collect());
        }
    }
    None
}

/// Names of the probed pip candidates, for error messages.
pub fn pip_candidate_names() -> String {
    PIP_CANDIDATES
        .iter()
        .map(|c| c.join(" "))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Translate a Windows absolute path to its WSL mount form.
///
/// `D:\foo\bar` becomes `/mnt/d/foo/bar`. The drive letter match is
/// case-insensitive, forward slashes are accepted, and paths without a
/// drive prefix only get their backslashes normalized.
pub fn to_wsl_path(path: &str) -> String {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        let drive = (bytes[0] as char).to_ascii_lowercase();
        let rest = path[2..].replace('\\', "/");
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            format!("/mnt/{}", drive)
        } else {
            format!("/mnt/{}/{}", drive, rest)
        }
    } else {
        path.replace('\\', "/")
    }
}
