//! Asset store for files referenced by the report
//!
//! Generated assets are named `figure-NNN.<ext>` from a per-document counter.
//! Embedded caller images keep a slug of their own name and are steered away
//! from the reserved prefix, so the two schemes never collide.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::types::{slugify, ReportError, Result, GENERATED_ASSET_PREFIX};

/// Location of an asset on disk and in the markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSlot {
    /// Filesystem path
    pub path: PathBuf,

    /// Reference used in the markdown (relative to the markdown file)
    pub reference: String,
}

/// Directory of files owned by one report
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    dirname: String,
    counter: u32,
    written: Vec<PathBuf>,
}

impl AssetStore {
    /// Create a store rooted at `out_dir/dirname`; nothing is created on disk yet
    pub fn new(out_dir: &Path, dirname: impl Into<String>) -> Self {
        let dirname = dirname.into();
        Self {
            dir: out_dir.join(&dirname),
            dirname,
            counter: 0,
            written: Vec::new(),
        }
    }

    /// Assets directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Assets directory name as used in references
    pub fn dirname(&self) -> &str {
        &self.dirname
    }

    /// Number of generated assets so far
    pub fn generated_count(&self) -> u32 {
        self.counter
    }

    /// Files written into the store, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Create the directory if it does not exist
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Next generated filename.
    ///
    /// The counter only advances in [`commit_generated`](Self::commit_generated),
    /// so a failed write does not use up a number.
    pub fn allocate(&self, extension: &str) -> Result<AssetSlot> {
        self.ensure_dir()?;
        let name = format!(
            "{}{:03}.{}",
            GENERATED_ASSET_PREFIX,
            self.counter + 1,
            extension
        );
        Ok(self.slot(name))
    }

    /// Record a generated asset written to a slot from [`allocate`](Self::allocate)
    pub fn commit_generated(&mut self, slot: &AssetSlot) {
        self.counter += 1;
        self.commit(slot);
    }

    /// Remove whatever a failed write left in a slot
    pub fn discard(&self, slot: &AssetSlot) {
        if slot.path.exists() {
            if let Err(e) = std::fs::remove_file(&slot.path) {
                warn!(asset = %slot.path.display(), error = %e, "could not remove partial asset");
            }
        }
    }

    /// Record that a slot has been written
    pub fn commit(&mut self, slot: &AssetSlot) {
        debug!(asset = %slot.path.display(), "asset written");
        if !self.written.contains(&slot.path) {
            self.written.push(slot.path.clone());
        }
    }

    /// Copy a caller-supplied image into the store
    pub fn import(&mut self, source: &Path) -> Result<AssetSlot> {
        if !source.is_file() {
            return Err(ReportError::ImageNotFound(source.to_path_buf()));
        }
        self.ensure_dir()?;

        let stem = source
            .file_stem()
            .map(|s| slugify(&s.to_string_lossy()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());
        let stem = if stem.starts_with(GENERATED_ASSET_PREFIX) {
            format!("img-{}", stem)
        } else {
            stem
        };
        let ext = source
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        // Same name with different bytes gets a numbered suffix.
        let mut attempt = 1;
        let slot = loop {
            let name = if attempt == 1 {
                format!("{}{}", stem, ext)
            } else {
                format!("{}-{}{}", stem, attempt, ext)
            };
            let slot = self.slot(name);
            if !slot.path.exists() {
                std::fs::copy(source, &slot.path)?;
                break slot;
            }
            if same_file(source, &slot.path) || same_contents(source, &slot.path)? {
                break slot;
            }
            attempt += 1;
        };

        self.commit(&slot);
        Ok(slot)
    }

    /// Copy every written asset into `target`, leaving existing files alone
    pub fn mirror_to(&self, target: &Path) -> Result<usize> {
        if same_file(&self.dir, target) {
            return Ok(0);
        }
        std::fs::create_dir_all(target)?;

        let mut copied = 0;
        for source in &self.written {
            let Some(name) = source.file_name() else {
                continue;
            };
            let dest = target.join(name);
            if dest.exists() {
                if !same_contents(source, &dest)? {
                    warn!(asset = %dest.display(), "existing asset differs, not overwriting");
                }
                continue;
            }
            std::fs::copy(source, &dest)?;
            copied += 1;
        }
        Ok(copied)
    }

    fn slot(&self, name: String) -> AssetSlot {
        AssetSlot {
            reference: format!("{}/{}", self.dirname, name),
            path: self.dir.join(name),
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    if std::fs::metadata(a)?.len() != std::fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(std::fs::read(a)? == std::fs::read(b)?)
}

// ============================================================
// Tests
// ============================================================
