//! mdreport - Markdown reports with pandoc export
//!
//! Build a report from headings, free text, tables, images and figures,
//! save it as markdown with an assets directory, then convert it to PDF,
//! HTML or DOCX with pandoc.
//!
//! # Modules
//!
//! - [`report`] - document model, block rendering and asset management
//! - [`export`] - converter command assembly and execution
//! - [`config`] - TOML configuration file
//! - [`cli`] - command-line definitions for the `mdreport` binary
//!
//! # Example
//!
//! ```rust,no_run
//! use mdreport::{DataTable, ExportRequest, Report};
//!
//! let data = DataTable::new()
//!     .with_column("category", ["A", "B", "C"])
//!     .with_column("value", [10i64, 20, 30]);
//!
//! let mut report = Report::new("Sample Report").unwrap();
//! report
//!     .add_heading("Results", 2)
//!     .add_table("Values", &data);
//! report.save_markdown(None).unwrap();
//!
//! let request = ExportRequest::builder("html").build();
//! report.compile(&request).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod export;
pub mod report;

// Re-export public API
pub use cli::{Cli, Commands, CompileArgs};
pub use config::{CliOverrides, Config, ConfigError};
pub use export::{
    detect_pdf_engine, CommandRunner, ExportError, ExportFormat, ExportOutcome, ExportRequest,
    ExportRequestBuilder, ExportSource, Exporter, SystemRunner,
};
pub use report::{
    Block, CellFormat, CellValue, ColumnKey, DataTable, Figure, InteractiveFigure,
    MarkdownRenderOptions, PlotOptions, Report, ReportBuilder, ReportError, ReportMetadata,
    StaticFigure, TableOptions, TabularData,
};

/// Process exit codes
pub mod exit_codes {
    /// Conversion finished or command printed
    pub const SUCCESS: i32 = 0;

    /// Unspecified failure
    pub const GENERAL_ERROR: i32 = 1;

    /// Markdown input missing
    pub const INPUT_NOT_FOUND: i32 = 2;

    /// Converter missing or failed
    pub const CONVERSION_FAILED: i32 = 3;
}
