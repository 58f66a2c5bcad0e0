//! Report content blocks
//!
//! Every block renders to an ordered list of markdown lines. Rendering is
//! pure; the only side effect in the model (writing a plot image) happens
//! when a [`PlotBlock`] is created.

use std::path::Path;

use super::assets::AssetStore;
use super::figure::{write_figure, Figure};
use super::table::TableBlock;
use super::types::{PlotOptions, ReportError, Result};

// ============================================================
// Heading
// ============================================================

/// Section heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingBlock {
    /// Heading text
    pub text: String,
    /// Heading level (1 = `#`)
    pub level: usize,
}

impl HeadingBlock {
    /// Create a heading
    pub fn new(text: impl Into<String>, level: usize) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }

    /// Render to markdown lines
    pub fn render(&self) -> Result<Vec<String>> {
        if self.level == 0 {
            return Err(ReportError::Render(format!(
                "heading '{}' has level 0",
                self.text
            )));
        }
        Ok(vec![format!("{} {}", "#".repeat(self.level), self.text.trim())])
    }
}

// ============================================================
// Markdown
// ============================================================

/// Raw markdown inserted verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownBlock {
    /// Markdown source
    pub text: String,
}

impl MarkdownBlock {
    /// Create a markdown block
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Render to markdown lines
    pub fn render(&self) -> Result<Vec<String>> {
        Ok(self.text.lines().map(str::to_string).collect())
    }
}

// ============================================================
// Image
// ============================================================

/// Reference to an image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    /// Path relative to the markdown file, or absolute
    pub path: String,
    /// Caption, used as alt text
    pub caption: Option<String>,
    /// Width such as `80%` or `400px`
    pub width: Option<String>,
}

impl ImageBlock {
    /// Create an image reference
    pub fn new(path: impl Into<String>, caption: Option<String>, width: Option<String>) -> Self {
        Self {
            path: path.into(),
            caption,
            width,
        }
    }

    /// Render to markdown lines.
    ///
    /// Plain markdown has no width syntax, so a sized image becomes an
    /// HTML `<img>` tag.
    pub fn render(&self) -> Result<Vec<String>> {
        let caption = self.caption.as_deref().unwrap_or("");
        if self.path.trim().is_empty() {
            if caption.is_empty() {
                return Err(ReportError::Render(
                    "image block needs a path or a caption".to_string(),
                ));
            }
            return Err(ReportError::Render(format!(
                "image '{}' has no path",
                caption
            )));
        }

        let line = match self.width.as_deref().filter(|w| !w.trim().is_empty()) {
            Some(width) => format!(
                "<img src=\"{}\" alt=\"{}\" width=\"{}\">",
                escape_attr(&self.path),
                escape_attr(caption),
                escape_attr(width)
            ),
            None => format!(
                "![{}]({})",
                escape_alt(caption),
                self.path.replace(' ', "%20")
            ),
        };
        Ok(vec![line])
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_alt(value: &str) -> String {
    value.replace('[', "\\[").replace(']', "\\]")
}

// ============================================================
// Plot
// ============================================================

/// Figure rasterized into the asset store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotBlock {
    image: ImageBlock,
}

impl PlotBlock {
    /// Rasterize `figure` into `assets` and wrap the saved file.
    ///
    /// Uncaptioned plots use `Figure N` as alt text.
    pub fn create(
        figure: &dyn Figure,
        assets: &mut AssetStore,
        options: &PlotOptions,
        caption: Option<String>,
        width: Option<String>,
    ) -> Result<Self> {
        if figure.as_static().is_none() && figure.as_interactive().is_none() {
            return Err(ReportError::UnsupportedFigure);
        }

        let slot = assets.allocate("png")?;
        if let Err(e) = write_figure(figure, &slot.path, options) {
            assets.discard(&slot);
            return Err(e);
        }
        assets.commit_generated(&slot);

        let caption = caption.unwrap_or_else(|| format!("Figure {}", assets.generated_count()));
        Ok(Self {
            image: ImageBlock::new(slot.reference, Some(caption), width),
        })
    }

    /// Saved image reference
    pub fn image(&self) -> &ImageBlock {
        &self.image
    }

    /// Render to markdown lines
    pub fn render(&self) -> Result<Vec<String>> {
        self.image.render()
    }
}

// ============================================================
// Block
// ============================================================

/// Any content block
#[derive(Debug, Clone)]
pub enum Block {
    /// Section heading
    Heading(HeadingBlock),
    /// Verbatim markdown
    Markdown(MarkdownBlock),
    /// Pipe table
    Table(TableBlock),
    /// Image reference
    Image(ImageBlock),
    /// Rasterized figure
    Plot(PlotBlock),
}

impl Block {
    /// Render to markdown lines
    pub fn render(&self) -> Result<Vec<String>> {
        match self {
            Block::Heading(b) => b.render(),
            Block::Markdown(b) => b.render(),
            Block::Table(b) => b.render(),
            Block::Image(b) => b.render(),
            Block::Plot(b) => b.render(),
        }
    }

    /// Short name of the block kind
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::Markdown(_) => "markdown",
            Block::Table(_) => "table",
            Block::Image(_) => "image",
            Block::Plot(_) => "plot",
        }
    }
}

/// Image reference path as it should appear in markdown
pub(crate) fn reference_for(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::figure::StaticFigure;
    use image::RgbImage;
    use tempfile::tempdir;

    struct Opaque;
    impl Figure for Opaque {}

    /// Writes a truncated file, then fails
    struct Broken;

    impl StaticFigure for Broken {
        fn save_png(&self, path: &Path, _dpi: u32) -> Result<()> {
            std::fs::write(path, b"\x89PN")?;
            Err(ReportError::FigureExport("backend crashed".into()))
        }
    }

    impl Figure for Broken {
        fn as_static(&self) -> Option<&dyn StaticFigure> {
            Some(self)
        }
    }

    #[test]
    fn test_render_heading() {
        assert_eq!(HeadingBlock::new("Title", 1).render().unwrap(), vec!["# Title"]);
        assert_eq!(HeadingBlock::new("Deep", 6).render().unwrap(), vec!["###### Deep"]);
        assert_eq!(
            HeadingBlock::new("Deeper", 8).render().unwrap(),
            vec!["######## Deeper"]
        );
    }

    #[test]
    fn test_heading_level_zero_fails() {
        let result = HeadingBlock::new("Bad", 0).render();
        assert!(matches!(result, Err(ReportError::Render(_))));
    }

    #[test]
    fn test_render_markdown_lines() {
        let block = MarkdownBlock::new("line one\n\n- item\n");
        assert_eq!(block.render().unwrap(), vec!["line one", "", "- item"]);
    }

    #[test]
    fn test_render_image_plain() {
        let block = ImageBlock::new("assets/chart.png", Some("Sales".into()), None);
        assert_eq!(block.render().unwrap(), vec!["![Sales](assets/chart.png)"]);
    }

    #[test]
    fn test_render_image_without_caption() {
        let block = ImageBlock::new("assets/chart.png", None, None);
        assert_eq!(block.render().unwrap(), vec!["![](assets/chart.png)"]);
    }

    #[test]
    fn test_render_image_with_width() {
        let block = ImageBlock::new("assets/chart.png", Some("A \"big\" chart".into()), Some("80%".into()));
        assert_eq!(
            block.render().unwrap(),
            vec!["<img src=\"assets/chart.png\" alt=\"A &quot;big&quot; chart\" width=\"80%\">"]
        );
    }

    #[test]
    fn test_render_image_missing_path_and_caption() {
        let result = ImageBlock::new("", None, None).render();
        assert!(matches!(result, Err(ReportError::Render(_))));
    }

    #[test]
    fn test_plot_block_writes_once() {
        let dir = tempdir().unwrap();
        let mut assets = AssetStore::new(dir.path(), "assets");
        let block = PlotBlock::create(
            &RgbImage::new(2, 2),
            &mut assets,
            &PlotOptions::default(),
            None,
            Some("50%".into()),
        )
        .unwrap();

        assert!(dir.path().join("assets/figure-001.png").is_file());
        assert_eq!(block.image().caption.as_deref(), Some("Figure 1"));

        let first = block.render().unwrap();
        assert_eq!(first, block.render().unwrap());
        assert!(first[0].starts_with("<img src=\"assets/figure-001.png\""));
    }

    #[test]
    fn test_plot_block_unsupported_figure_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut assets = AssetStore::new(dir.path(), "assets");
        let result = PlotBlock::create(&Opaque, &mut assets, &PlotOptions::default(), None, None);

        assert!(matches!(result, Err(ReportError::UnsupportedFigure)));
        assert_eq!(assets.generated_count(), 0);
    }

    #[test]
    fn test_failed_plot_keeps_numbering() {
        let dir = tempdir().unwrap();
        let mut assets = AssetStore::new(dir.path(), "assets");
        let options = PlotOptions::default();

        let failed = PlotBlock::create(&Broken, &mut assets, &options, None, None);
        assert!(matches!(failed, Err(ReportError::FigureExport(_))));
        assert!(!dir.path().join("assets/figure-001.png").exists());
        assert_eq!(assets.generated_count(), 0);
        assert!(assets.written().is_empty());

        let block = PlotBlock::create(&RgbImage::new(2, 2), &mut assets, &options, None, None).unwrap();
        assert_eq!(block.image().path, "assets/figure-001.png");
        assert_eq!(block.image().caption.as_deref(), Some("Figure 1"));
        assert!(image::open(dir.path().join("assets/figure-001.png")).is_ok());
    }

    #[test]
    fn test_reference_for_uses_forward_slashes() {
        assert_eq!(reference_for(Path::new("assets\\a.png")), "assets/a.png");
    }

    #[test]
    fn test_block_kind() {
        assert_eq!(Block::Heading(HeadingBlock::new("x", 1)).kind(), "heading");
        assert_eq!(Block::Markdown(MarkdownBlock::new("x")).kind(), "markdown");
    }
}
