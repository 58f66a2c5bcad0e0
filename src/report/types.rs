//! Common types for the report module

use chrono::{DateTime, Local};
use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportError;

// ============================================================
// Constants
// ============================================================

/// Default output directory for the markdown file and its assets
pub const DEFAULT_OUT_DIR: &str = "report_out";

/// Default assets directory name (relative to the output directory)
pub const DEFAULT_ASSETS_DIRNAME: &str = "assets";

/// Reserved filename prefix for generated assets
pub const GENERATED_ASSET_PREFIX: &str = "figure-";

/// Date format used in the metadata preamble and converter flags
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Default raster resolution for static figures
pub const DEFAULT_PLOT_DPI: u32 = 150;

/// Default pixel width for interactive figure export
pub const DEFAULT_PLOT_WIDTH: u32 = 800;

/// Default pixel height for interactive figure export
pub const DEFAULT_PLOT_HEIGHT: u32 = 500;

/// Default scale factor for interactive figure export
pub const DEFAULT_PLOT_SCALE: f32 = 2.0;

/// Minimum accepted DPI
const MIN_PLOT_DPI: u32 = 36;

/// Maximum accepted DPI
const MAX_PLOT_DPI: u32 = 1200;

// ============================================================
// Error Types
// ============================================================

/// Report error types
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report title must not be empty")]
    EmptyTitle,

    #[error("Render error: {0}")]
    Render(String),

    #[error("Unsupported figure: expected a static or interactive figure")]
    UnsupportedFigure,

    #[error("Figure export failed: {0}")]
    FigureExport(String),

    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================
// Metadata
// ============================================================

/// Document metadata captured at construction time
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetadata {
    /// Document title (never empty)
    pub title: String,

    /// Author, empty when unset
    pub author: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Local>,
}

impl ReportMetadata {
    /// Create metadata stamped with the current time
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
            created: Local::now(),
        }
    }

    /// Set the author
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the creation timestamp
    #[must_use]
    pub fn with_created(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }

    /// Author or the empty string
    pub fn author_or_empty(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }

    /// Creation date formatted for the preamble and converter flags
    pub fn date_string(&self) -> String {
        self.created.format(DATE_FORMAT).to_string()
    }
}

// ============================================================
// Plot Options
// ============================================================

/// Options for rasterizing figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotOptions {
    /// Resolution for static figures
    pub dpi: u32,

    /// Pixel width for interactive figures
    pub width: u32,

    /// Pixel height for interactive figures
    pub height: u32,

    /// Scale factor for interactive figures
    pub scale: f32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_PLOT_DPI,
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
            scale: DEFAULT_PLOT_SCALE,
        }
    }
}

impl PlotOptions {
    /// Create a builder
    pub fn builder() -> PlotOptionsBuilder {
        PlotOptionsBuilder::default()
    }

    /// Options for print-quality output
    pub fn print() -> Self {
        Self {
            dpi: 300,
            scale: 3.0,
            ..Default::default()
        }
    }
}

/// Builder for PlotOptions
#[derive(Debug, Default)]
pub struct PlotOptionsBuilder {
    options: PlotOptions,
}

impl PlotOptionsBuilder {
    /// Set DPI for static figures
    #[must_use]
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi.clamp(MIN_PLOT_DPI, MAX_PLOT_DPI);
        self
    }

    /// Set pixel size for interactive figures
    #[must_use]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.options.width = width.max(1);
        self.options.height = height.max(1);
        self
    }

    /// Set scale factor for interactive figures
    #[must_use]
    pub fn scale(mut self, scale: f32) -> Self {
        self.options.scale = scale.max(0.1);
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> PlotOptions {
        self.options
    }
}

// ============================================================
// Helpers
// ============================================================

/// Turn text into a filename-safe slug.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single `-`, and trims separators from both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

// ============================================================
// Tests
// ============================================================
