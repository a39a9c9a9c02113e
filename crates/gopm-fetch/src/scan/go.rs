//! Go source import scanner.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::ImportScanner;
use crate::error::{FetchError, Result};

lazy_static! {
    // import "fmt"  /  import alias "pkg/path"
    static ref SINGLE_IMPORT_RE: Regex =
        Regex::new(r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#).unwrap();
    // import ( ... ) blocks
    static ref BLOCK_IMPORT_RE: Regex = Regex::new(r"(?ms)^\s*import\s*\((.*?)\)").unwrap();
    static ref QUOTED_PATH_RE: Regex = Regex::new(r#""([^"]+)""#).unwrap();
}

/// Scans `.go` files for import declarations.
///
/// Only remote import paths are reported: the first path segment must contain
/// a dot (a hostname), which filters out the standard library. Relative
/// imports and imports under the scanned package's own import path are
/// skipped as well.
pub struct GoImportScanner;

impl GoImportScanner {
    pub fn new() -> Self {
        Self
    }

    fn imports_in_source(src: &str) -> Vec<String> {
        let mut found = Vec::new();

        for caps in BLOCK_IMPORT_RE.captures_iter(src) {
            if let Some(block) = caps.get(1) {
                for path in QUOTED_PATH_RE.captures_iter(block.as_str()) {
                    if let Some(m) = path.get(1) {
                        found.push(m.as_str().to_string());
                    }
                }
            }
        }

        for caps in SINGLE_IMPORT_RE.captures_iter(src) {
            if let Some(m) = caps.get(1) {
                found.push(m.as_str().to_string());
            }
        }

        found
    }

    fn is_remote_path(import: &str) -> bool {
        if import.starts_with("./") || import.starts_with("../") {
            return false;
        }
        match import.split('/').next() {
            Some(first) => first.contains('.'),
            None => false,
        }
    }
}

impl Default for GoImportScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportScanner for GoImportScanner {
    fn scan(&self, dir: &Path, import_path: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(dir).map_err(|e| FetchError::Scan {
            dir: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("go"))
            .collect();
        files.sort();

        let mut imports = Vec::new();
        for file in files {
            let src = fs::read_to_string(&file).map_err(|e| FetchError::Scan {
                dir: dir.display().to_string(),
                reason: e.to_string(),
            })?;

            for import in Self::imports_in_source(&src) {
                if Self::is_remote_path(&import) && !import.starts_with(import_path) {
                    log::trace!("{}: found import {}", file.display(), import);
                    imports.push(import);
                }
            }
        }

        Ok(imports)
    }
}
