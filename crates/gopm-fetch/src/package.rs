//! Fetched package descriptor.

use std::path::PathBuf;

/// Result of a successful fetch. Created once per fetch and immutable
/// thereafter; ownership transfers to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Logical identity of the package, e.g. `bitbucket.org/owner/repo`.
    pub import_path: String,
    /// On-disk root the package was materialized to.
    pub abs_path: PathBuf,
    /// The concrete revision that was fetched. Always a resolved identifier,
    /// never an empty or single-character specifier.
    pub commit: String,
}
