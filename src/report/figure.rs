//! Figure capabilities
//!
//! A plot can be appended to a report if it exposes one of two capability
//! families: a static figure that writes itself to disk as a raster image, or
//! an interactive figure that exports PNG bytes through a separate backend.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use super::types::{PlotOptions, ReportError, Result};

/// Figure that can save itself as a raster image
pub trait StaticFigure {
    /// Write the figure to `path` as PNG at the given resolution
    fn save_png(&self, path: &Path, dpi: u32) -> Result<()>;
}

/// Figure that renders through a static-export backend
pub trait InteractiveFigure {
    /// Export the figure as PNG bytes
    fn to_png(&self, width: u32, height: u32, scale: f32) -> Result<Vec<u8>>;
}

/// Anything that might be appended as a plot.
///
/// Implementors expose at most one capability; a value exposing neither is
/// rejected with [`ReportError::UnsupportedFigure`].
pub trait Figure {
    /// Static capability, if any
    fn as_static(&self) -> Option<&dyn StaticFigure> {
        None
    }

    /// Interactive capability, if any
    fn as_interactive(&self) -> Option<&dyn InteractiveFigure> {
        None
    }
}

/// Rasterize a figure into `path`
pub(crate) fn write_figure(figure: &dyn Figure, path: &Path, options: &PlotOptions) -> Result<()> {
    if let Some(fig) = figure.as_static() {
        fig.save_png(path, options.dpi)
    } else if let Some(fig) = figure.as_interactive() {
        let bytes = fig.to_png(options.width, options.height, options.scale)?;
        std::fs::write(path, bytes)?;
        Ok(())
    } else {
        Err(ReportError::UnsupportedFigure)
    }
}

// ============================================================
// In-memory rasters
// ============================================================

fn save_raster(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| ReportError::FigureExport(e.to_string()))
}

// Already rasterized, so the resolution hint does not apply.
impl StaticFigure for DynamicImage {
    fn save_png(&self, path: &Path, _dpi: u32) -> Result<()> {
        save_raster(self, path)
    }
}

impl StaticFigure for RgbImage {
    fn save_png(&self, path: &Path, _dpi: u32) -> Result<()> {
        self.save_with_format(path, ImageFormat::Png)
            .map_err(|e| ReportError::FigureExport(e.to_string()))
    }
}

impl StaticFigure for RgbaImage {
    fn save_png(&self, path: &Path, _dpi: u32) -> Result<()> {
        self.save_with_format(path, ImageFormat::Png)
            .map_err(|e| ReportError::FigureExport(e.to_string()))
    }
}

impl Figure for DynamicImage {
    fn as_static(&self) -> Option<&dyn StaticFigure> {
        Some(self)
    }
}

impl Figure for RgbImage {
    fn as_static(&self) -> Option<&dyn StaticFigure> {
        Some(self)
    }
}

impl Figure for RgbaImage {
    fn as_static(&self) -> Option<&dyn StaticFigure> {
        Some(self)
    }
}

// ============================================================
// Tests
// ============================================================
