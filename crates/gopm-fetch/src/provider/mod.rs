//! Hosting provider plug-ins.
//!
//! A provider turns a logical import path plus a commit specifier into a
//! materialized source tree on disk. Each provider knows its host's API
//! endpoints and archive layout; the surrounding resolver decides which
//! provider to invoke for a given import path via `supports`.

mod bitbucket;
mod tarball;

pub use bitbucket::{BitbucketProvider, RepoRef};
pub use tarball::extract_tarball;

use std::path::PathBuf;

use crate::error::Result;
use crate::package::Package;

/// Caller-supplied knobs for one fetch operation.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Root of the local workspace; packages land in `<install_root>/src/<import_path>`.
    pub install_root: PathBuf,
    /// Keep directories whose path contains "example" instead of skipping them.
    pub include_examples: bool,
}

impl FetchOptions {
    pub fn new(install_root: PathBuf) -> Self {
        Self {
            install_root,
            include_examples: false,
        }
    }

    pub fn with_examples(mut self, include_examples: bool) -> Self {
        self.include_examples = include_examples;
        self
    }
}

/// Outcome of a successful fetch: the package descriptor plus the import
/// paths discovered by the post-extraction scan (empty when the caller gave
/// an explicit revision).
#[derive(Debug)]
pub struct FetchResult {
    pub package: Package,
    pub imports: Vec<String>,
}

/// A hosting provider able to fetch repositories for a family of import paths.
pub trait Provider {
    /// Whether this provider handles the given import path.
    fn supports(import_path: &str) -> bool
    where
        Self: Sized;

    /// Resolve `commit` and materialize the repository under the install root.
    ///
    /// `commit` may be empty (resolve the default tag, then scan imports), a
    /// single-character bundle/snapshot code (resolve, no scan) or an
    /// explicit revision identifier.
    fn fetch(&self, import_path: &str, commit: &str, opts: &FetchOptions) -> Result<FetchResult>;
}
