//! mdreport - Markdown report conversion
//!
//! CLI entry point

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use mdreport::export::{available_pdf_engines, PANDOC};
use mdreport::report::DATE_FORMAT;
use mdreport::{
    exit_codes,
    // CLI
    Cli, Commands, CompileArgs,
    // Config
    CliOverrides, Config,
    // Export
    ExportError, ExportOutcome, ExportRequest, ExportSource, Exporter,
};
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Compile(args) => args.verbose,
        Commands::Info => 0,
    };
    init_logging(verbose);

    let result = match cli.command {
        Commands::Compile(args) => run_compile(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    });
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ExportError>() {
        Some(ExportError::MissingSource(_)) => exit_codes::INPUT_NOT_FOUND,
        Some(ExportError::Conversion { .. }) | Some(ExportError::ConverterNotFound(_)) => {
            exit_codes::CONVERSION_FAILED
        }
        _ => exit_codes::GENERAL_ERROR,
    }
}

// ============ Compile Command ============

fn run_compile(args: &CompileArgs) -> anyhow::Result<()> {
    // Load config file if specified, otherwise use default
    let file_config = match &args.config {
        Some(config_path) => Config::load_from_path(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path.display()))?,
        None => Config::load().unwrap_or_default(),
    };

    // Merge config file with CLI arguments (CLI takes precedence)
    let config = file_config.merge_with_cli(&create_cli_overrides(args));

    let source = export_source(args, &config)?;
    let request = export_request(args, &config);

    match Exporter::new().compile(&source, &request)? {
        ExportOutcome::Command(line) => println!("{}", line),
        ExportOutcome::Written(path) => println!("Wrote {}", path.display()),
    }

    Ok(())
}

/// Create CLI overrides from CompileArgs
fn create_cli_overrides(args: &CompileArgs) -> CliOverrides {
    CliOverrides {
        out_dir: None,
        pdf_engine: args.pdf_engine.clone(),
        wsl_mount: args.wsl_mount.clone(),
        extra_args: args.extra.clone(),
    }
}

/// Describe an existing markdown file for the export driver
fn export_source(args: &CompileArgs, config: &Config) -> anyhow::Result<ExportSource> {
    let markdown = absolutize(&args.markdown)?;
    let dir = markdown.parent().unwrap_or_else(|| Path::new("/")).to_path_buf();

    let title = args.title.clone().unwrap_or_else(|| {
        markdown
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let resource_path = match &args.resource_path {
        Some(path) => absolutize(path)?,
        None => dir.join(&config.output.assets_dir),
    };

    Ok(ExportSource {
        markdown,
        resource_path,
        title,
        author: args.author.clone().unwrap_or_default(),
        date: Local::now().format(DATE_FORMAT).to_string(),
    })
}

fn export_request(args: &CompileArgs, config: &Config) -> ExportRequest {
    let (engine, auto) = match config.export.pdf_engine.as_deref() {
        Some("auto") => (None, true),
        Some(engine) => (Some(engine.to_string()), false),
        None => (None, false),
    };

    let mut builder = ExportRequest::builder(&args.to)
        .pdf_engine_opt(engine)
        .auto_pdf_engine(auto)
        .print_command_only(args.print_command)
        .wsl_mount_opt(config.export.wsl_mount.clone())
        .extra_args(config.export.extra_args.iter().cloned())
        .open_after(args.open);
    if let Some(output) = &args.output {
        builder = builder.output(output);
    }
    builder.build()
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<()> {
    println!("mdreport v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);

    println!();
    println!("Converter:");
    check_tool_with_version(PANDOC, "Pandoc", &["--version"]);

    println!();
    println!("PDF Engines:");
    for (engine, location) in available_pdf_engines() {
        match location {
            Some(path) => println!("  {}: {} (found)", engine, path.display()),
            None => println!("  {}: Not found", engine),
        }
    }

    // Config File Locations
    println!();
    println!("Config File Locations:");
    println!("  Local: ./{}", mdreport::config::LOCAL_CONFIG_FILE);
    if let Some(path) = Config::user_config_path() {
        println!("  User:  {}", path.display());
    }

    Ok(())
}

fn check_tool_with_version(cmd: &str, name: &str, version_args: &[&str]) {
    match which::which(cmd) {
        Ok(path) => {
            let first_line = std::process::Command::new(&path)
                .args(version_args)
                .output()
                .ok()
                .and_then(|output| {
                    String::from_utf8_lossy(&output.stdout)
                        .lines()
                        .next()
                        .map(|line| line.trim().to_string())
                })
                .filter(|line| !line.is_empty() && line.len() < 80);
            match first_line {
                Some(version) => println!("  {}: {} ({})", name, version, path.display()),
                None => println!("  {}: {} (found)", name, path.display()),
            }
        }
        Err(_) => println!("  {}: Not found", name),
    }
}
