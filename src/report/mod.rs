//! Report module
//!
//! Builds a markdown document from ordered blocks: headings, free text,
//! tables, image references and rasterized figures. Figures are written
//! into an assets directory next to the markdown file.
//!
//! # Features
//!
//! - Chainable appends that keep insertion order
//! - YAML front matter with title, author and date
//! - Column-oriented tables with per-column formatting
//! - Static (DPI based) and interactive (pixel size based) figures
//! - Collision-free asset naming per document
//!
//! # Example
//!
//! ```rust,no_run
//! use mdreport::{DataTable, Report};
//!
//! let data = DataTable::new()
//!     .with_column("region", ["North", "South"])
//!     .with_column("sales", [1200i64, 950]);
//!
//! let mut report = Report::builder("Quarterly Sales")
//!     .author("Analytics")
//!     .build()
//!     .unwrap();
//!
//! report
//!     .add_heading("Summary", 2)
//!     .add_markdown("Sales grew in every region.")
//!     .add_table("By Region", &data);
//!
//! let path = report.save_markdown(None).unwrap();
//! println!("Saved to {}", path.display());
//! ```

mod assets;
mod block;
mod document;
mod figure;
mod renderer;
mod table;
mod types;

// Re-export public API
pub use assets::{AssetSlot, AssetStore};
pub use block::{Block, HeadingBlock, ImageBlock, MarkdownBlock, PlotBlock};
pub use document::{Report, ReportBuilder};
pub use figure::{Figure, InteractiveFigure, StaticFigure};
pub use renderer::{MarkdownRenderOptions, MarkdownRenderer};
pub use table::{
    escape_cell, CellFormat, CellValue, ColumnKey, DataTable, TableBlock, TableOptions,
    TableOptionsBuilder, TabularData,
};
pub use types::{
    slugify, PlotOptions, PlotOptionsBuilder, ReportError, ReportMetadata, Result,
    DATE_FORMAT, DEFAULT_ASSETS_DIRNAME, DEFAULT_OUT_DIR, DEFAULT_PLOT_DPI, DEFAULT_PLOT_HEIGHT,
    DEFAULT_PLOT_SCALE, DEFAULT_PLOT_WIDTH, GENERATED_ASSET_PREFIX,
};
