//! Process execution seam
//!
//! The export driver never spawns processes directly; it goes through a
//! [`CommandRunner`]. [`SystemRunner`] is the real implementation.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::command::ConverterCommand;
use super::types::Result;

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status was zero
    pub success: bool,

    /// Human-readable exit status
    pub status: String,

    /// Captured standard error
    pub stderr: String,
}

/// Locates and runs external programs
pub trait CommandRunner {
    /// Find a program on PATH
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run a command to completion, capturing its output
    fn run(&self, program: &Path, command: &ConverterCommand) -> Result<CommandOutput>;

    /// Open a file with the platform's default handler
    fn open(&self, path: &Path) -> std::io::Result<()>;
}

/// Runner backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, program: &Path, command: &ConverterCommand) -> Result<CommandOutput> {
        debug!(command = %command, "running converter");
        let output = command.to_process(program).output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn open(&self, path: &Path) -> std::io::Result<()> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]);
            cmd
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(path).spawn().map(|_| ())
    }
}

// ============================================================
// Tests
// ============================================================
