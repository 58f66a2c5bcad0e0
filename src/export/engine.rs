//! PDF engine discovery

use std::path::PathBuf;

use super::runner::{CommandRunner, SystemRunner};
use super::types::PDF_ENGINE_CANDIDATES;

/// First available PDF engine according to `runner`
pub fn find_pdf_engine(runner: &dyn CommandRunner) -> Option<String> {
    PDF_ENGINE_CANDIDATES
        .iter()
        .find(|engine| runner.locate(engine).is_some())
        .map(|engine| engine.to_string())
}

/// First PDF engine found on PATH
pub fn detect_pdf_engine() -> Option<String> {
    find_pdf_engine(&SystemRunner)
}

/// Every known PDF engine with its location, if installed
pub fn available_pdf_engines() -> Vec<(&'static str, Option<PathBuf>)> {
    PDF_ENGINE_CANDIDATES
        .iter()
        .map(|engine| (*engine, SystemRunner.locate(engine)))
        .collect()
}
