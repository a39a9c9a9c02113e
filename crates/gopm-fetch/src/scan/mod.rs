//! Import scanning for freshly extracted source trees.
//!
//! After extraction, packages fetched without an explicit revision are
//! scanned for further dependencies. The scanner is a collaborator behind a
//! trait so providers stay agnostic of the source language details.

mod go;

pub use go::GoImportScanner;

use std::path::Path;

use crate::error::Result;

/// Discovers dependency import paths in one extracted directory.
pub trait ImportScanner {
    /// Scan `dir` (non-recursively) for import declarations.
    ///
    /// `import_path` is the logical path of the package being scanned; the
    /// scanner uses it to filter out self-imports. Returned paths keep their
    /// discovery order and are not deduplicated.
    fn scan(&self, dir: &Path, import_path: &str) -> Result<Vec<String>>;
}
