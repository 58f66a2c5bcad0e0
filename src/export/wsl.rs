//! Path translation for running the converter inside a Linux subsystem
//!
//! A native path such as `C:\data\report.md` becomes
//! `/<mount>/c/data/report.md`. The rewrite is purely textual: the
//! filesystem is never consulted.

use std::path::Path;

/// Translate a native path for the given mount root.
///
/// Paths without a drive letter only have their separators converted.
pub fn translate_path(path: &Path, mount: &str) -> String {
    translate_str(&path.to_string_lossy(), mount)
}

/// String form of [`translate_path`]
pub fn translate_str(path: &str, mount: &str) -> String {
    let mount = mount.trim().trim_matches('/');

    match split_drive(path) {
        Some((drive, rest)) => {
            let rest = rest.replace('\\', "/");
            let rest = rest.trim_start_matches('/');
            let mut translated = String::with_capacity(mount.len() + rest.len() + 4);
            if !mount.is_empty() {
                translated.push('/');
                translated.push_str(mount);
            }
            translated.push('/');
            translated.push(drive.to_ascii_lowercase());
            if !rest.is_empty() {
                translated.push('/');
                translated.push_str(rest);
            }
            translated
        }
        None => path.replace('\\', "/"),
    }
}

fn split_drive(path: &str) -> Option<(char, &str)> {
    let mut chars = path.chars();
    let drive = chars.next()?;
    if drive.is_ascii_alphabetic() && chars.next() == Some(':') {
        Some((drive, &path[2..]))
    } else {
        None
    }
}

// ============================================================
// Tests
// ============================================================
