//! Common test utilities for the end-to-end pipeline tests.

#![allow(dead_code)]

use anyhow::Result;
use decky_depfetch::runner::{Cmd, CmdOutput, CommandRunner};
use std::sync::Mutex;

/// Records every invocation and reports success, so end-to-end tests can
/// assert what would have been executed without shelling out.
pub struct RecordingRunner {
    invocations: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn output(&self, cmd: &Cmd) -> Result<CmdOutput> {
        self.invocations.lock().unwrap().push(cmd.display());
        Ok(CmdOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            success: true,
        })
    }
}
