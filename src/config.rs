//! Configuration file support
//!
//! Settings are read from TOML. Lookup order for [`Config::load`]:
//!
//! 1. `./mdreport.toml`
//! 2. `<user config dir>/mdreport/config.toml`
//!
//! Missing sections and keys fall back to defaults. Command-line values
//! take precedence through [`Config::merge_with_cli`].
//!
//! ```toml
//! [output]
//! out_dir = "report_out"
//! assets_dir = "assets"
//!
//! [plot]
//! dpi = 150
//! width = 800
//! height = 500
//! scale = 2.0
//!
//! [export]
//! pdf_engine = "xelatex"
//! wsl_mount = "mnt"
//! extra_args = ["--toc"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::{
    PlotOptions, DEFAULT_ASSETS_DIRNAME, DEFAULT_OUT_DIR, DEFAULT_PLOT_DPI, DEFAULT_PLOT_HEIGHT,
    DEFAULT_PLOT_SCALE, DEFAULT_PLOT_WIDTH,
};

/// Local config file name
pub const LOCAL_CONFIG_FILE: &str = "mdreport.toml";

/// Directory under the user config dir
pub const CONFIG_DIR_NAME: &str = "mdreport";

/// File name under the user config dir
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================
// Sections
// ============================================================

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for markdown files
    pub out_dir: PathBuf,

    /// Assets directory name, relative to the markdown file
    pub assets_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            assets_dir: DEFAULT_ASSETS_DIRNAME.to_string(),
        }
    }
}

/// `[plot]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub dpi: u32,
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_PLOT_DPI,
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
            scale: DEFAULT_PLOT_SCALE,
        }
    }
}

/// `[export]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// PDF engine passed to pandoc (`auto` detects one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_engine: Option<String>,

    /// Mount root for Linux subsystem path translation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wsl_mount: Option<String>,

    /// Extra converter arguments, appended before command-line extras
    pub extra_args: Vec<String>,
}

// ============================================================
// Config
// ============================================================

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub plot: PlotConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Load from the first existing default location, or defaults if none exist
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load_from_path(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Default lookup locations, in priority order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(user) = Self::user_config_path() {
            paths.push(user);
        }
        paths
    }

    /// `<user config dir>/mdreport/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Plot settings as rasterization options
    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions::builder()
            .dpi(self.plot.dpi)
            .size(self.plot.width, self.plot.height)
            .scale(self.plot.scale)
            .build()
    }

    /// Apply command-line overrides; set values win
    pub fn merge_with_cli(mut self, cli: &CliOverrides) -> Self {
        if let Some(out_dir) = &cli.out_dir {
            self.output.out_dir = out_dir.clone();
        }
        if let Some(engine) = &cli.pdf_engine {
            self.export.pdf_engine = Some(engine.clone());
        }
        if let Some(mount) = &cli.wsl_mount {
            self.export.wsl_mount = Some(mount.clone());
        }
        self.export.extra_args.extend(cli.extra_args.iter().cloned());
        self
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub out_dir: Option<PathBuf>,
    pub pdf_engine: Option<String>,
    pub wsl_mount: Option<String>,
    pub extra_args: Vec<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.out_dir, PathBuf::from("report_out"));
        assert_eq!(config.output.assets_dir, "assets");
        assert_eq!(config.plot.dpi, 150);
        assert!(config.export.pdf_engine.is_none());
        assert!(config.export.extra_args.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("[plot]\ndpi = 300\n").unwrap();
        assert_eq!(config.plot.dpi, 300);
        assert_eq!(config.plot.width, 800);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mdreport.toml");
        std::fs::write(
            &path,
            r#"
[output]
out_dir = "build/reports"

[export]
pdf_engine = "xelatex"
wsl_mount = "mnt"
extra_args = ["--toc"]
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.output.out_dir, PathBuf::from("build/reports"));
        assert_eq!(config.export.pdf_engine.as_deref(), Some("xelatex"));
        assert_eq!(config.export.wsl_mount.as_deref(), Some("mnt"));
        assert_eq!(config.export.extra_args, vec!["--toc"]);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml("[plot\ndpi = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load_from_path(Path::new("/nonexistent/mdreport.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.export.pdf_engine = Some("weasyprint".into());
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_merge_with_cli() {
        let mut config = Config::default();
        config.export.pdf_engine = Some("pdflatex".into());
        config.export.extra_args = vec!["--toc".into()];

        let overrides = CliOverrides {
            pdf_engine: Some("xelatex".into()),
            extra_args: vec!["--number-sections".into()],
            ..CliOverrides::new()
        };
        let merged = config.merge_with_cli(&overrides);

        assert_eq!(merged.export.pdf_engine.as_deref(), Some("xelatex"));
        assert_eq!(merged.export.extra_args, vec!["--toc", "--number-sections"]);
        assert!(merged.export.wsl_mount.is_none());
    }

    #[test]
    fn test_plot_options_clamped() {
        let mut config = Config::default();
        config.plot.dpi = 0;
        assert!(config.plot_options().dpi > 0);
    }

    #[test]
    fn test_search_paths_start_local() {
        assert_eq!(Config::search_paths()[0], PathBuf::from("mdreport.toml"));
    }
}
