//! Markdown Renderer module
//!
//! Turns report metadata and an ordered block list into the final markdown
//! text. Output depends only on its inputs, never on the clock.

use std::io::Write;
use std::path::Path;

use super::block::Block;
use super::types::{ReportMetadata, Result};

// ============================================================
// Options
// ============================================================

/// Options for Markdown rendering
#[derive(Debug, Clone)]
pub struct MarkdownRenderOptions {
    /// Emit the YAML metadata preamble
    pub include_metadata: bool,

    /// Separator placed between blocks
    pub block_separator: String,
}

impl Default for MarkdownRenderOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            block_separator: "\n\n".to_string(),
        }
    }
}

// ============================================================
// Markdown Renderer
// ============================================================

/// Renderer for report documents
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: MarkdownRenderOptions,
}

impl MarkdownRenderer {
    /// Create a new renderer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new renderer with specified options
    pub fn with_options(options: MarkdownRenderOptions) -> Self {
        Self { options }
    }

    /// Render a whole document
    pub fn render(&self, metadata: &ReportMetadata, blocks: &[Block]) -> Result<String> {
        let mut parts = Vec::with_capacity(blocks.len() + 1);

        if self.options.include_metadata {
            parts.push(self.render_preamble(metadata));
        }

        for block in blocks {
            parts.push(block.render()?.join("\n"));
        }

        let mut output = parts.join(&self.options.block_separator);
        output.push('\n');
        Ok(output)
    }

    /// Render the metadata block understood by pandoc
    pub fn render_preamble(&self, metadata: &ReportMetadata) -> String {
        format!(
            "---\ntitle: {}\nauthor: {}\ndate: {}\n---",
            yaml_string(&metadata.title),
            yaml_string(metadata.author_or_empty()),
            yaml_string(&metadata.date_string())
        )
    }

    /// Write Markdown to a file
    pub fn write_to_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Double-quoted YAML scalar (JSON string syntax is valid YAML)
fn yaml_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::block::{HeadingBlock, MarkdownBlock};
    use chrono::{Local, TimeZone};

    fn metadata() -> ReportMetadata {
        ReportMetadata::new("Quarterly \"Review\"")
            .with_author("Ann")
            .with_created(Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_render_preamble() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(
            renderer.render_preamble(&metadata()),
            "---\ntitle: \"Quarterly \\\"Review\\\"\"\nauthor: \"Ann\"\ndate: \"2024-01-02 03:04\"\n---"
        );
    }

    #[test]
    fn test_render_joins_blocks_with_blank_lines() {
        let renderer = MarkdownRenderer::new();
        let blocks = vec![
            Block::Heading(HeadingBlock::new("Intro", 2)),
            Block::Markdown(MarkdownBlock::new("Hello\nworld")),
        ];
        let output = renderer.render(&metadata(), &blocks).unwrap();

        assert!(output.ends_with("---\n\n## Intro\n\nHello\nworld\n"));
        assert!(!output.ends_with("\n\n"));
    }

    #[test]
    fn test_render_without_metadata() {
        let renderer = MarkdownRenderer::with_options(MarkdownRenderOptions {
            include_metadata: false,
            ..Default::default()
        });
        let blocks = vec![Block::Heading(HeadingBlock::new("Only", 1))];
        assert_eq!(renderer.render(&metadata(), &blocks).unwrap(), "# Only\n");
    }

    #[test]
    fn test_render_propagates_block_errors() {
        let renderer = MarkdownRenderer::new();
        let blocks = vec![Block::Heading(HeadingBlock::new("Bad", 0))];
        assert!(renderer.render(&metadata(), &blocks).is_err());
    }

    #[test]
    fn test_render_options_default() {
        let opts = MarkdownRenderOptions::default();
        assert!(opts.include_metadata);
        assert_eq!(opts.block_separator, "\n\n");
    }
}
