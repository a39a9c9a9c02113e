//! Revision specifiers and default-tag resolution.
//!
//! A caller-supplied commit specifier is one of three things, decided once at
//! entry: empty (resolve the default tag, then scan imports), a single
//! character bundle/snapshot code (resolve the default tag, skip the scan),
//! or an explicit commit identifier used verbatim.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{FetchError, Result};

lazy_static! {
    static ref VCS_PREFIX_RE: Regex = Regex::new(r"^(hg|git)-").unwrap();
}

/// Default tag preference lists, tried in order when resolving "the default
/// revision" of a repository.
const DEFAULT_TAGS_GIT: &[&str] = &["go1", "release-branch.go1", "release", "default", "master"];
const DEFAULT_TAGS_HG: &[&str] = &["go1", "release-branch.go1", "release", "default", "tip"];

/// Version control system backing a remote repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsKind {
    Git,
    Hg,
}

impl VcsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
        }
    }

    /// Parse the `scm` field of the repository metadata endpoint.
    pub fn from_scm(scm: &str) -> Result<Self> {
        match scm {
            "git" => Ok(VcsKind::Git),
            "hg" => Ok(VcsKind::Hg),
            other => Err(FetchError::UnknownVcs(other.to_string())),
        }
    }

    /// Extract the VCS kind from a `hg-`/`git-` prefixed commit specifier,
    /// avoiding the metadata network call.
    pub fn from_prefix(spec: &str) -> Option<Self> {
        let m = VCS_PREFIX_RE.captures(spec)?;
        match m.get(1).map(|g| g.as_str()) {
            Some("git") => Some(VcsKind::Git),
            Some("hg") => Some(VcsKind::Hg),
            _ => None,
        }
    }

    /// Ordered tag names to try when no explicit revision was given.
    pub fn default_tags(&self) -> &'static [&'static str] {
        match self {
            VcsKind::Git => DEFAULT_TAGS_GIT,
            VcsKind::Hg => DEFAULT_TAGS_HG,
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller intent parsed from the raw commit specifier string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionSpec {
    /// Empty specifier: resolve the default tag and scan imports afterwards.
    Default,
    /// Single-character bundle/snapshot code: resolve the default tag, no
    /// import scan.
    Snapshot,
    /// Explicit commit identifier, used verbatim.
    Explicit(String),
}

impl RevisionSpec {
    pub fn parse(commit: &str) -> Self {
        match commit.len() {
            0 => RevisionSpec::Default,
            1 => RevisionSpec::Snapshot,
            _ => RevisionSpec::Explicit(commit.to_string()),
        }
    }

    /// Whether the fetch must run the import scan after extraction.
    pub fn is_check_import(&self) -> bool {
        matches!(self, RevisionSpec::Default)
    }

    /// Whether the concrete commit must be resolved from the branch/tag
    /// listings.
    pub fn needs_resolution(&self) -> bool {
        !matches!(self, RevisionSpec::Explicit(_))
    }
}

/// Select the best tag from a merged branch/tag table.
///
/// Walks the preference list in order and returns the first `(name, node)`
/// pair present in the table.
pub fn best_tag(tags: &HashMap<String, String>, preferred: &[&str]) -> Option<(String, String)> {
    for name in preferred {
        if let Some(node) = tags.get(*name) {
            return Some((name.to_string(), node.clone()));
        }
    }
    None
}
