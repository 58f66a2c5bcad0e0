//! Export driver
//!
//! Validates a request, assembles the converter command and either returns
//! it as text or runs it. Holds no state between calls.

use std::borrow::Cow;

use tracing::{debug, info, warn};

use super::command::build_command;
use super::engine::find_pdf_engine;
use super::runner::{CommandRunner, SystemRunner};
use super::types::{ExportError, ExportFormat, ExportOutcome, ExportRequest, ExportSource, Result, PANDOC};

/// Runs exports through a [`CommandRunner`]
#[derive(Debug, Clone, Default)]
pub struct Exporter<R = SystemRunner> {
    runner: R,
}

impl Exporter<SystemRunner> {
    /// Create an exporter that runs real processes
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> Exporter<R> {
    /// Create an exporter with a custom runner
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Runner in use
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Convert `source` according to `request`
    pub fn compile(&self, source: &ExportSource, request: &ExportRequest) -> Result<ExportOutcome> {
        let format = request.format()?;

        if !source.markdown.is_file() {
            return Err(ExportError::MissingSource(source.markdown.clone()));
        }

        // The converter runs inside the markdown directory.
        let request = anchor_output(request)?;
        let request = request.as_ref();

        let print_only = request.is_print_only();
        let engine = self.resolve_pdf_engine(request, format, print_only);
        let command = build_command(source, request, format, engine.as_deref());

        if print_only {
            info!(format = %format, "converter command assembled (not executed)");
            return Ok(ExportOutcome::Command(command.to_command_line()));
        }

        let program = self
            .runner
            .locate(PANDOC)
            .ok_or_else(|| ExportError::ConverterNotFound(PANDOC.to_string()))?;

        let output = self.runner.run(&program, &command)?;
        if !output.success {
            return Err(ExportError::Conversion {
                status: output.status,
                stderr: output.stderr,
            });
        }

        if !command.output.exists() {
            warn!(output = %command.output.display(), "converter succeeded but output is missing");
        }
        info!(output = %command.output.display(), "conversion complete");

        if request.open_after {
            if let Err(e) = self.runner.open(&command.output) {
                warn!(error = %e, "could not open output");
            }
        }

        Ok(ExportOutcome::Written(command.output))
    }

    fn resolve_pdf_engine(
        &self,
        request: &ExportRequest,
        format: ExportFormat,
        print_only: bool,
    ) -> Option<String> {
        if format != ExportFormat::Pdf {
            return None;
        }
        match &request.pdf_engine {
            Some(engine) => Some(engine.clone()),
            None if request.auto_pdf_engine && !print_only => find_pdf_engine(&self.runner),
            None => None,
        }
    }
}

/// Resolve a relative output path against the caller's working directory.
///
/// Subsystem commands keep the path as given since it is translated, not run here.
fn anchor_output(request: &ExportRequest) -> Result<Cow<'_, ExportRequest>> {
    match &request.output {
        Some(output) if output.is_relative() && request.wsl_mount().is_none() => {
            let anchored = std::env::current_dir()?.join(output);
            debug!(output = %anchored.display(), "resolved relative output path");
            Ok(Cow::Owned(ExportRequest {
                output: Some(anchored),
                ..request.clone()
            }))
        }
        _ => Ok(Cow::Borrowed(request)),
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::command::ConverterCommand;
    use crate::export::runner::CommandOutput;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeRunner {
        installed: Vec<&'static str>,
        fail_with: Option<String>,
        runs: RefCell<Vec<ConverterCommand>>,
        opened: RefCell<Vec<PathBuf>>,
    }

    impl FakeRunner {
        fn with_pandoc() -> Self {
            Self {
                installed: vec!["pandoc"],
                ..Default::default()
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn locate(&self, program: &str) -> Option<PathBuf> {
            self.installed
                .iter()
                .any(|p| *p == program)
                .then(|| PathBuf::from("/usr/bin").join(program))
        }

        fn run(&self, _program: &Path, command: &ConverterCommand) -> Result<CommandOutput> {
            self.runs.borrow_mut().push(command.clone());
            match &self.fail_with {
                Some(stderr) => Ok(CommandOutput {
                    success: false,
                    status: "exit status: 43".into(),
                    stderr: stderr.clone(),
                }),
                None => {
                    std::fs::write(&command.output, b"converted")?;
                    Ok(CommandOutput {
                        success: true,
                        status: "exit status: 0".into(),
                        stderr: String::new(),
                    })
                }
            }
        }

        fn open(&self, path: &Path) -> std::io::Result<()> {
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn saved_source(dir: &Path) -> ExportSource {
        let markdown = dir.join("report.md");
        std::fs::write(&markdown, "# Report\n").unwrap();
        ExportSource {
            markdown,
            resource_path: dir.join("assets"),
            title: "Report".into(),
            author: String::new(),
            date: "2024-01-02 03:04".into(),
        }
    }

    #[test]
    fn test_unsupported_format_runs_nothing() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::with_runner(FakeRunner::with_pandoc());
        let result = exporter.compile(&saved_source(dir.path()), &ExportRequest::new("xml"));

        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
        assert!(exporter.runner().runs.borrow().is_empty());
    }

    #[test]
    fn test_missing_source() {
        let dir = tempdir().unwrap();
        let mut source = saved_source(dir.path());
        source.markdown = dir.path().join("never-saved.md");

        let exporter = Exporter::with_runner(FakeRunner::with_pandoc());
        let result = exporter.compile(&source, &ExportRequest::new("pdf"));
        assert!(matches!(result, Err(ExportError::MissingSource(_))));
    }

    #[test]
    fn test_print_only_spawns_nothing() {
        let dir = tempdir().unwrap();
        let source = saved_source(dir.path());
        let exporter = Exporter::with_runner(FakeRunner::default());
        let request = ExportRequest::builder("pdf").print_command_only(true).build();

        let outcome = exporter.compile(&source, &request).unwrap();
        let cmd = outcome.command().unwrap();

        assert!(cmd.contains(&source.markdown.display().to_string()));
        assert!(cmd.contains(&format!("-o {}", dir.path().join("report.pdf").display())));
        assert!(exporter.runner().runs.borrow().is_empty());
        assert!(!dir.path().join("report.pdf").exists());
    }

    #[test]
    fn test_successful_conversion() {
        let dir = tempdir().unwrap();
        let source = saved_source(dir.path());
        let exporter = Exporter::with_runner(FakeRunner::with_pandoc());

        let outcome = exporter.compile(&source, &ExportRequest::new("html")).unwrap();

        let expected = dir.path().join("report.html");
        assert_eq!(outcome, ExportOutcome::Written(expected.clone()));
        assert!(expected.exists());

        let runs = exporter.runner().runs.borrow();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].working_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_relative_output_is_caller_relative() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::with_runner(FakeRunner::default());
        let request = ExportRequest::builder("html")
            .output("final.html")
            .print_command_only(true)
            .build();

        let outcome = exporter.compile(&saved_source(dir.path()), &request).unwrap();
        let expected = std::env::current_dir().unwrap().join("final.html");
        assert!(outcome
            .command()
            .unwrap()
            .contains(&format!("-o {}", expected.display())));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_output_written_where_reported() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out");
        std::fs::create_dir(&target).unwrap();

        // Relative path from the test's working directory into the temp dir
        let cwd = std::env::current_dir().unwrap();
        let mut relative = PathBuf::new();
        for _ in cwd.components().skip(1) {
            relative.push("..");
        }
        relative.push(target.strip_prefix("/").unwrap());
        relative.push("final.html");

        let exporter = Exporter::with_runner(FakeRunner::with_pandoc());
        let request = ExportRequest::builder("html").output(relative.clone()).build();
        let outcome = exporter.compile(&saved_source(dir.path()), &request).unwrap();

        let ExportOutcome::Written(written) = outcome else {
            panic!("expected a written file");
        };
        assert!(written.is_absolute());
        assert!(written.exists());
        assert_eq!(
            written.canonicalize().unwrap(),
            target.join("final.html").canonicalize().unwrap()
        );
        assert_eq!(exporter.runner().runs.borrow()[0].output, written);
        assert!(!dir.path().join("final.html").exists());
    }

    #[test]
    fn test_conversion_error_carries_stderr() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner {
            fail_with: Some("pdflatex not found".into()),
            ..FakeRunner::with_pandoc()
        };
        let exporter = Exporter::with_runner(runner);
        let result = exporter.compile(&saved_source(dir.path()), &ExportRequest::new("pdf"));

        match result {
            Err(ExportError::Conversion { stderr, .. }) => assert_eq!(stderr, "pdflatex not found"),
            other => panic!("expected conversion error, got {:?}", other),
        }
    }

    #[test]
    fn test_converter_not_found() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::with_runner(FakeRunner::default());
        let result = exporter.compile(&saved_source(dir.path()), &ExportRequest::new("docx"));
        assert!(matches!(result, Err(ExportError::ConverterNotFound(_))));
    }

    #[test]
    fn test_auto_pdf_engine() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner {
            installed: vec!["pandoc", "xelatex"],
            ..Default::default()
        };
        let exporter = Exporter::with_runner(runner);
        let request = ExportRequest::builder("pdf").auto_pdf_engine(true).build();
        exporter.compile(&saved_source(dir.path()), &request).unwrap();

        let runs = exporter.runner().runs.borrow();
        let args = &runs[0].args;
        let at = args.iter().position(|a| a == "--pdf-engine").unwrap();
        assert_eq!(args[at + 1], "xelatex");
    }

    #[test]
    fn test_wsl_mount_returns_command() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::with_runner(FakeRunner::with_pandoc());
        let request = ExportRequest::builder("pdf").wsl_mount("mnt").build();

        let outcome = exporter.compile(&saved_source(dir.path()), &request).unwrap();
        assert!(outcome.command().is_some());
        assert!(exporter.runner().runs.borrow().is_empty());
    }

    #[test]
    fn test_open_after() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::with_runner(FakeRunner::with_pandoc());
        let request = ExportRequest::builder("html").open_after(true).build();
        exporter.compile(&saved_source(dir.path()), &request).unwrap();

        assert_eq!(
            exporter.runner().opened.borrow().as_slice(),
            &[dir.path().join("report.html")]
        );
    }
}
