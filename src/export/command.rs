//! Converter command construction
//!
//! Both print-only and executing exports go through [`build_command`], so
//! the text a caller sees is exactly what would be run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::types::{ExportFormat, ExportRequest, ExportSource, INPUT_FORMAT, PANDOC};
use super::wsl::translate_path;

/// A fully assembled converter invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterCommand {
    /// Program name or path
    pub program: String,

    /// Arguments in order
    pub args: Vec<String>,

    /// Directory the converter runs in
    pub working_dir: Option<PathBuf>,

    /// Output file (native path)
    pub output: PathBuf,
}

impl ConverterCommand {
    /// Shell-style command line
    pub fn to_command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Process builder for execution
    pub fn to_process(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for ConverterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_line())
    }
}

/// Output path for a source and format
pub fn output_path(source: &ExportSource, request: &ExportRequest, format: ExportFormat) -> PathBuf {
    request
        .output
        .as_deref()
        .unwrap_or(&source.markdown)
        .with_extension(format.extension())
}

/// Assemble the converter invocation
pub fn build_command(
    source: &ExportSource,
    request: &ExportRequest,
    format: ExportFormat,
    pdf_engine: Option<&str>,
) -> ConverterCommand {
    let output = output_path(source, request, format);
    let mount = request.wsl_mount();
    let render_path = |path: &Path| match mount {
        Some(mount) => translate_path(path, mount),
        None => path.to_string_lossy().into_owned(),
    };

    let mut args = vec![
        "-s".to_string(),
        "--from".to_string(),
        INPUT_FORMAT.to_string(),
        render_path(&source.markdown),
        "-o".to_string(),
        render_path(&output),
        "--resource-path".to_string(),
        render_path(&source.resource_path),
    ];

    for (key, value) in [
        ("title", &source.title),
        ("author", &source.author),
        ("date", &source.date),
    ] {
        args.push("-M".to_string());
        args.push(format!("{}={}", key, value));
    }

    if format == ExportFormat::Pdf {
        if let Some(engine) = pdf_engine.map(str::trim).filter(|e| !e.is_empty()) {
            args.push("--pdf-engine".to_string());
            args.push(engine.to_string());
        }
    }

    args.extend(request.extra_args.iter().cloned());

    ConverterCommand {
        program: PANDOC.to_string(),
        args,
        working_dir: source
            .markdown
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf),
        output,
    }
}

/// Quote an argument for a POSIX shell when needed
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

// ============================================================
// Tests
// ============================================================
