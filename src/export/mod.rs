//! Export module
//!
//! Converts a saved markdown report to PDF, HTML or DOCX by invoking pandoc.
//!
//! # Features
//!
//! - Fixed target set with validation before anything runs
//! - Output path derived from the markdown file (or an explicit override)
//! - `--resource-path` and `-M` metadata wiring
//! - Print-only mode that returns the exact command line
//! - Path translation for running the command inside a Linux subsystem
//! - PDF engine discovery on PATH
//!
//! # Example
//!
//! ```rust,no_run
//! use mdreport::{ExportRequest, Exporter, ExportSource};
//! use std::path::PathBuf;
//!
//! let source = ExportSource {
//!     markdown: PathBuf::from("report_out/sales.md"),
//!     resource_path: PathBuf::from("report_out/assets"),
//!     title: "Sales".to_string(),
//!     author: String::new(),
//!     date: "2024-01-01 09:00".to_string(),
//! };
//!
//! let request = ExportRequest::builder("pdf")
//!     .print_command_only(true)
//!     .wsl_mount("mnt")
//!     .build();
//!
//! let outcome = Exporter::new().compile(&source, &request).unwrap();
//! println!("{}", outcome.command().unwrap_or_default());
//! ```

mod command;
mod driver;
mod engine;
mod runner;
mod types;

pub mod wsl;

// Re-export public API
pub use command::{build_command, output_path, ConverterCommand};
pub use driver::Exporter;
pub use engine::{available_pdf_engines, detect_pdf_engine, find_pdf_engine};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use types::{
    ExportError, ExportFormat, ExportOutcome, ExportRequest, ExportRequestBuilder, ExportSource,
    Result, DEFAULT_WSL_MOUNT, INPUT_FORMAT, PANDOC, PDF_ENGINE_CANDIDATES,
};
