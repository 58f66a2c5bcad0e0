//! Common types for the export module

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Converter binary name
pub const PANDOC: &str = "pandoc";

/// Input format passed to the converter
pub const INPUT_FORMAT: &str = "gfm+yaml_metadata_block";

/// PDF engines probed in order of preference (no full LaTeX install first)
pub const PDF_ENGINE_CANDIDATES: [&str; 4] = ["wkhtmltopdf", "weasyprint", "xelatex", "pdflatex"];

/// Default mount root for subsystem path translation
pub const DEFAULT_WSL_MOUNT: &str = "mnt";

// ============================================================
// Error Types
// ============================================================

/// Export error types
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format '{0}' (expected pdf, html or docx)")]
    UnsupportedFormat(String),

    #[error("Markdown source not found: {0} (save the markdown before compiling)")]
    MissingSource(PathBuf),

    #[error("Conversion failed ({status}): {stderr}")]
    Conversion { status: String, stderr: String },

    #[error("Converter not found on PATH: {0}")]
    ConverterNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

// ============================================================
// Format
// ============================================================

/// Export target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Html,
    Docx,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "html" => Ok(ExportFormat::Html),
            "docx" => Ok(ExportFormat::Docx),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

// ============================================================
// Source
// ============================================================

/// Markdown file plus the metadata passed to the converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSource {
    /// Saved markdown file
    pub markdown: PathBuf,

    /// Directory searched for referenced resources
    pub resource_path: PathBuf,

    /// Document title
    pub title: String,

    /// Author (may be empty)
    pub author: String,

    /// Formatted creation date
    pub date: String,
}

// ============================================================
// Request
// ============================================================

/// One export invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Requested target, validated when compiling
    pub to: String,

    /// Explicit output path (extension is normalized to the format)
    pub output: Option<PathBuf>,

    /// PDF engine, only used for PDF output
    pub pdf_engine: Option<String>,

    /// Probe PATH for a PDF engine when none is given
    pub auto_pdf_engine: bool,

    /// Return the command instead of running it
    pub print_command_only: bool,

    /// Rewrite paths for a subsystem mount (implies print-only)
    pub wsl_mount: Option<String>,

    /// Extra converter arguments, appended verbatim
    pub extra_args: Vec<String>,

    /// Open the result with the platform handler after conversion
    pub open_after: bool,
}

impl ExportRequest {
    /// Create a request for a target such as `"pdf"`
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            output: None,
            pdf_engine: None,
            auto_pdf_engine: false,
            print_command_only: false,
            wsl_mount: None,
            extra_args: Vec::new(),
            open_after: false,
        }
    }

    /// Create a builder
    pub fn builder(to: impl Into<String>) -> ExportRequestBuilder {
        ExportRequestBuilder {
            request: Self::new(to),
        }
    }

    /// Parse the target format
    pub fn format(&self) -> Result<ExportFormat> {
        self.to.parse()
    }

    /// Mount root for path translation, if enabled
    pub fn wsl_mount(&self) -> Option<&str> {
        self.wsl_mount
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Whether the command is only assembled and returned
    pub fn is_print_only(&self) -> bool {
        self.print_command_only || self.wsl_mount().is_some()
    }
}

impl From<ExportFormat> for ExportRequest {
    fn from(format: ExportFormat) -> Self {
        Self::new(format.extension())
    }
}

/// Builder for ExportRequest
#[derive(Debug)]
pub struct ExportRequestBuilder {
    request: ExportRequest,
}

impl ExportRequestBuilder {
    /// Set output path
    #[must_use]
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.request.output = Some(output.into());
        self
    }

    /// Set PDF engine
    #[must_use]
    pub fn pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.request.pdf_engine = Some(engine.into());
        self
    }

    /// Set PDF engine (optional)
    #[must_use]
    pub fn pdf_engine_opt(mut self, engine: Option<String>) -> Self {
        self.request.pdf_engine = engine;
        self
    }

    /// Enable PDF engine discovery
    #[must_use]
    pub fn auto_pdf_engine(mut self, auto: bool) -> Self {
        self.request.auto_pdf_engine = auto;
        self
    }

    /// Only return the command
    #[must_use]
    pub fn print_command_only(mut self, print: bool) -> Self {
        self.request.print_command_only = print;
        self
    }

    /// Set subsystem mount root
    #[must_use]
    pub fn wsl_mount(mut self, mount: impl Into<String>) -> Self {
        self.request.wsl_mount = Some(mount.into());
        self
    }

    /// Set subsystem mount root (optional)
    #[must_use]
    pub fn wsl_mount_opt(mut self, mount: Option<String>) -> Self {
        self.request.wsl_mount = mount;
        self
    }

    /// Append an extra converter argument
    #[must_use]
    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.request.extra_args.push(arg.into());
        self
    }

    /// Append extra converter arguments
    #[must_use]
    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Open the output after conversion
    #[must_use]
    pub fn open_after(mut self, open: bool) -> Self {
        self.request.open_after = open;
        self
    }

    /// Build the request
    #[must_use]
    pub fn build(self) -> ExportRequest {
        self.request
    }
}

// ============================================================
// Outcome
// ============================================================

/// Result of a compile call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Print-only mode: the assembled command line
    Command(String),
    /// The converter ran and wrote this file
    Written(PathBuf),
}

impl ExportOutcome {
    /// Command text, if print-only
    pub fn command(&self) -> Option<&str> {
        match self {
            ExportOutcome::Command(cmd) => Some(cmd),
            ExportOutcome::Written(_) => None,
        }
    }

    /// Output path, if the converter ran
    pub fn output_path(&self) -> Option<&PathBuf> {
        match self {
            ExportOutcome::Command(_) => None,
            ExportOutcome::Written(path) => Some(path),
        }
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!(".docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_request_defaults() {
        let request = ExportRequest::new("pdf");
        assert_eq!(request.format().unwrap(), ExportFormat::Pdf);
        assert!(!request.is_print_only());
        assert!(request.wsl_mount().is_none());
        assert!(request.extra_args.is_empty());
    }

    #[test]
    fn test_wsl_mount_implies_print_only() {
        let request = ExportRequest::builder("pdf").wsl_mount("mnt").build();
        assert!(request.is_print_only());
        assert_eq!(request.wsl_mount(), Some("mnt"));

        let blank = ExportRequest::builder("pdf").wsl_mount("  ").build();
        assert!(!blank.is_print_only());
    }

    #[test]
    fn test_request_builder() {
        let request = ExportRequest::builder("html")
            .output("out/report.html")
            .pdf_engine("weasyprint")
            .extra_arg("--toc")
            .extra_args(["--number-sections"])
            .open_after(true)
            .build();

        assert_eq!(request.output, Some(PathBuf::from("out/report.html")));
        assert_eq!(request.pdf_engine.as_deref(), Some("weasyprint"));
        assert_eq!(request.extra_args, vec!["--toc", "--number-sections"]);
        assert!(request.open_after);
    }

    #[test]
    fn test_outcome_accessors() {
        let cmd = ExportOutcome::Command("pandoc x".into());
        assert_eq!(cmd.command(), Some("pandoc x"));
        assert!(cmd.output_path().is_none());

        let written = ExportOutcome::Written(PathBuf::from("a.pdf"));
        assert_eq!(written.output_path(), Some(&PathBuf::from("a.pdf")));
    }

    #[test]
    fn test_error_display_messages() {
        let err = ExportError::MissingSource(PathBuf::from("r.md"));
        assert!(err.to_string().contains("save the markdown"));
        let err = ExportError::Conversion {
            status: "exit status: 43".into(),
            stderr: "boom".into(),
        };
        assert_eq!(err.to_string(), "Conversion failed (exit status: 43): boom");
    }
}
