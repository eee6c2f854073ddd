//! External command execution
//!
//! Steps that shell out (AppImage extraction, pip install) build ordered
//! [`Cmd`] sequences and hand them to a [`CommandRunner`]. The trait seam
//! keeps the steps testable with a recording fake; production code uses
//! [`SystemRunner`].

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Cmd {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Set the working directory (a host-native path; WSL inherits and
    /// maps it).
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Rewrap the command to run inside WSL. Path arguments must already
    /// be in `/mnt/<drive>` form; only the invocation itself changes.
    pub fn via_wsl(self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "wsl.exe".to_string(),
            args,
            cwd: self.cwd,
        }
    }

    /// One-line rendering for logs and error messages.
    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for arg in &self.args {
            s.push(' ');
            s.push_str(arg);
        }
        s
    }
}

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

/// Seam for running external commands.
///
/// `Err` means the command could not be started (missing program); a
/// nonzero exit is reported through [`CmdOutput::success`].
pub trait CommandRunner {
    fn output(&self, cmd: &Cmd) -> Result<CmdOutput>;
}

/// Runs commands on the host via `std::process`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, cmd: &Cmd) -> Result<CmdOutput> {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(ref cwd) = cmd.cwd {
            command.current_dir(cwd);
        }

        let output = command
            .output()
            .with_context(|| format!("failed to start: {}", cmd.display()))?;

        Ok(CmdOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
            success: output.status.success(),
        })
    }
}

/// Run an ordered command sequence, aborting on the first failure.
///
/// Wraps each command for WSL when `uses_wsl` is set. The error carries the
/// failing command line and its captured stderr.
pub fn run_sequence(runner: &dyn CommandRunner, uses_wsl: bool, cmds: Vec<Cmd>) -> Result<()> {
    for cmd in cmds {
        let cmd = if uses_wsl { cmd.via_wsl() } else { cmd };
        crate::output::detail(&cmd.display());

        let out = runner.output(&cmd)?;
        if !out.success {
            bail!(
                "command failed (exit {}): {}\n{}",
                out.exit_code,
                cmd.display(),
                out.stderr.trim()
            );
        }
    }
    Ok(())
}
