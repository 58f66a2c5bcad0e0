//! Report document
//!
//! An append-only sequence of blocks plus metadata. Appends return the
//! report so calls can be chained; blocks are rendered in insertion order.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use super::assets::AssetStore;
use super::block::{reference_for, Block, HeadingBlock, ImageBlock, MarkdownBlock, PlotBlock};
use super::figure::Figure;
use super::renderer::{MarkdownRenderOptions, MarkdownRenderer};
use super::table::{TableBlock, TableOptions, TabularData};
use super::types::{
    slugify, PlotOptions, ReportError, ReportMetadata, Result, DEFAULT_ASSETS_DIRNAME,
    DEFAULT_OUT_DIR,
};
use crate::config::Config;
use crate::export::{CommandRunner, ExportOutcome, ExportRequest, ExportSource, Exporter};

// ============================================================
// Report
// ============================================================

/// Markdown report under construction
#[derive(Debug, Clone)]
pub struct Report {
    metadata: ReportMetadata,
    out_dir: PathBuf,
    blocks: Vec<Block>,
    assets: AssetStore,
    plot_options: PlotOptions,
    renderer: MarkdownRenderer,
    saved_path: Option<PathBuf>,
}

impl Report {
    /// Create a report with default settings
    pub fn new(title: impl Into<String>) -> Result<Self> {
        Self::builder(title).build()
    }

    /// Create a builder
    pub fn builder(title: impl Into<String>) -> ReportBuilder {
        ReportBuilder::new(title)
    }

    /// Document metadata
    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    /// Title
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Author, if set
    pub fn author(&self) -> Option<&str> {
        self.metadata.author.as_deref()
    }

    /// Creation timestamp
    pub fn created(&self) -> DateTime<Local> {
        self.metadata.created
    }

    /// Blocks in render order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check for an empty report
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Output directory
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Assets directory
    pub fn assets_dir(&self) -> &Path {
        self.assets.dir()
    }

    /// Asset store
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Plot rasterization options
    pub fn plot_options(&self) -> &PlotOptions {
        &self.plot_options
    }

    // --------------------------------------------------------
    // Appending
    // --------------------------------------------------------

    /// Append any block
    pub fn push(&mut self, block: Block) -> &mut Self {
        debug!(kind = block.kind(), index = self.blocks.len(), "block appended");
        self.blocks.push(block);
        self
    }

    /// Append a heading (`level` 1 renders as `#`)
    pub fn add_heading(&mut self, text: impl Into<String>, level: usize) -> &mut Self {
        self.push(Block::Heading(HeadingBlock::new(text, level)))
    }

    /// Append raw markdown
    pub fn add_markdown(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Block::Markdown(MarkdownBlock::new(text)))
    }

    /// Append a plain paragraph
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_markdown(text)
    }

    /// Append a table with default formatting; an empty title is omitted
    pub fn add_table(&mut self, title: &str, data: &dyn TabularData) -> &mut Self {
        self.add_table_with(title, data, TableOptions::default())
    }

    /// Append a table with explicit formatting options
    pub fn add_table_with(
        &mut self,
        title: &str,
        data: &dyn TabularData,
        options: TableOptions,
    ) -> &mut Self {
        let block = TableBlock::new(Some(title.to_string()), data, options);
        self.push(Block::Table(block))
    }

    /// Append a reference to an image, relative to the markdown file
    pub fn add_image(
        &mut self,
        path: impl AsRef<Path>,
        caption: Option<&str>,
        width: Option<&str>,
    ) -> &mut Self {
        let block = ImageBlock::new(
            reference_for(path.as_ref()),
            caption.map(str::to_string),
            width.map(str::to_string),
        );
        self.push(Block::Image(block))
    }

    /// Copy an existing image into the assets directory and reference it
    pub fn embed_image(
        &mut self,
        path: impl AsRef<Path>,
        caption: Option<&str>,
        width: Option<&str>,
    ) -> Result<&mut Self> {
        let slot = self.assets.import(path.as_ref())?;
        let block = ImageBlock::new(
            slot.reference,
            caption.map(str::to_string),
            width.map(str::to_string),
        );
        Ok(self.push(Block::Image(block)))
    }

    /// Rasterize a figure into the assets directory and reference it
    pub fn add_plot(
        &mut self,
        figure: &dyn Figure,
        caption: Option<&str>,
        width: Option<&str>,
    ) -> Result<&mut Self> {
        let block = PlotBlock::create(
            figure,
            &mut self.assets,
            &self.plot_options,
            caption.map(str::to_string),
            width.map(str::to_string),
        )?;
        Ok(self.push(Block::Plot(block)))
    }

    // --------------------------------------------------------
    // Rendering
    // --------------------------------------------------------

    /// Render the full markdown text
    pub fn render(&self) -> Result<String> {
        self.renderer.render(&self.metadata, &self.blocks)
    }

    /// Default markdown location: `<out_dir>/<slugified title>.md`
    pub fn default_markdown_path(&self) -> PathBuf {
        let slug = slugify(&self.metadata.title);
        let stem = if slug.is_empty() { "report" } else { slug.as_str() };
        self.out_dir.join(format!("{}.md", stem))
    }

    /// Path of the last saved markdown file, or the default location
    pub fn markdown_path(&self) -> PathBuf {
        self.saved_path
            .clone()
            .unwrap_or_else(|| self.default_markdown_path())
    }

    /// Render and write the markdown file, returning its path.
    ///
    /// Creates the assets directory next to the file. When the file is
    /// written outside the output directory, generated assets are copied
    /// alongside it without overwriting existing files.
    pub fn save_markdown(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let content = self.render()?;
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_markdown_path());

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let assets_dir = parent.join(self.assets.dirname());
        std::fs::create_dir_all(&assets_dir)?;
        let mirrored = self.assets.mirror_to(&assets_dir)?;
        if mirrored > 0 {
            debug!(count = mirrored, dir = %assets_dir.display(), "assets mirrored");
        }

        self.renderer.write_to_file(&path, &content)?;
        info!(path = %path.display(), blocks = self.blocks.len(), "markdown saved");

        self.saved_path = Some(path.clone());
        Ok(path)
    }

    // --------------------------------------------------------
    // Export
    // --------------------------------------------------------

    /// Converter input describing the saved markdown file
    pub fn export_source(&self) -> Result<ExportSource> {
        let markdown = absolutize(&self.markdown_path())?;
        let resource_path = markdown
            .parent()
            .unwrap_or_else(|| Path::new("/"))
            .join(self.assets.dirname());

        Ok(ExportSource {
            markdown,
            resource_path,
            title: self.metadata.title.clone(),
            author: self.metadata.author_or_empty().to_string(),
            date: self.metadata.date_string(),
        })
    }

    /// Convert the saved markdown with pandoc
    pub fn compile(&self, request: &ExportRequest) -> Result<ExportOutcome> {
        self.compile_with(&Exporter::new(), request)
    }

    /// Convert the saved markdown through a specific exporter
    pub fn compile_with<R: CommandRunner>(
        &self,
        exporter: &Exporter<R>,
        request: &ExportRequest,
    ) -> Result<ExportOutcome> {
        // Reject the target before touching anything else.
        request.format()?;
        let source = self.export_source()?;
        Ok(exporter.compile(&source, request)?)
    }
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

// ============================================================
// Builder
// ============================================================

/// Builder for Report
#[derive(Debug)]
pub struct ReportBuilder {
    metadata: ReportMetadata,
    out_dir: PathBuf,
    assets_dirname: String,
    plot_options: PlotOptions,
    render_options: MarkdownRenderOptions,
}

impl ReportBuilder {
    /// Start a report with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            metadata: ReportMetadata::new(title),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            assets_dirname: DEFAULT_ASSETS_DIRNAME.to_string(),
            plot_options: PlotOptions::default(),
            render_options: MarkdownRenderOptions::default(),
        }
    }

    /// Set the author
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.metadata.author = Some(author.into());
        self
    }

    /// Set the author (optional)
    #[must_use]
    pub fn author_opt(mut self, author: Option<String>) -> Self {
        self.metadata.author = author;
        self
    }

    /// Set the creation timestamp
    #[must_use]
    pub fn created(mut self, created: DateTime<Local>) -> Self {
        self.metadata.created = created;
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    /// Set the assets directory name
    #[must_use]
    pub fn assets_dirname(mut self, name: impl Into<String>) -> Self {
        self.assets_dirname = name.into();
        self
    }

    /// Set plot options
    #[must_use]
    pub fn plot_options(mut self, options: PlotOptions) -> Self {
        self.plot_options = options;
        self
    }

    /// Set render options
    #[must_use]
    pub fn render_options(mut self, options: MarkdownRenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Apply output and plot settings from a config file
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.out_dir = config.output.out_dir.clone();
        self.assets_dirname = config.output.assets_dir.clone();
        self.plot_options = config.plot_options();
        self
    }

    /// Build the report; the title must not be blank
    pub fn build(self) -> Result<Report> {
        if self.metadata.title.trim().is_empty() {
            return Err(ReportError::EmptyTitle);
        }

        Ok(Report {
            assets: AssetStore::new(&self.out_dir, self.assets_dirname),
            metadata: self.metadata,
            out_dir: self.out_dir,
            blocks: Vec::new(),
            plot_options: self.plot_options,
            renderer: MarkdownRenderer::with_options(self.render_options),
            saved_path: None,
        })
    }
}

// ============================================================
// Tests
// ============================================================
