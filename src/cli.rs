//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::export::DEFAULT_WSL_MOUNT;

/// Markdown report tooling
#[derive(Debug, Parser)]
#[command(name = "mdreport")]
#[command(version, about = "Convert Markdown reports with pandoc", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a saved markdown report to pdf, html or docx
    Compile(CompileArgs),

    /// Show converter and PDF engine availability
    Info,
}

/// Arguments for `compile`
#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Markdown file to convert
    pub markdown: PathBuf,

    /// Target format: pdf, html or docx
    #[arg(short = 't', long)]
    pub to: String,

    /// Output file (defaults to the markdown path with the target extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// PDF engine, or `auto` to pick the first one installed
    #[arg(long)]
    pub pdf_engine: Option<String>,

    /// Print the converter command instead of running it
    #[arg(long)]
    pub print_command: bool,

    /// Translate paths for a Linux subsystem mounted at this root (implies --print-command)
    #[arg(long, value_name = "MOUNT", num_args = 0..=1, default_missing_value = DEFAULT_WSL_MOUNT)]
    pub wsl_mount: Option<String>,

    /// Title metadata (defaults to the file stem)
    #[arg(long)]
    pub title: Option<String>,

    /// Author metadata
    #[arg(long)]
    pub author: Option<String>,

    /// Directory searched for images (defaults to `assets` next to the markdown)
    #[arg(long)]
    pub resource_path: Option<PathBuf>,

    /// Open the output after a successful conversion
    #[arg(long)]
    pub open: bool,

    /// Config file (defaults to ./mdreport.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Extra arguments passed to pandoc after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}
