//! Bitbucket provider - fetches repository snapshots via the Bitbucket API.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::tarball::extract_tarball;
use super::{FetchOptions, FetchResult, Provider};
use crate::error::{FetchError, Result};
use crate::http::HttpClient;
use crate::package::Package;
use crate::revision::{best_tag, RevisionSpec, VcsKind};
use crate::scan::{GoImportScanner, ImportScanner};

const DEFAULT_API_ROOT: &str = "https://api.bitbucket.org/1.0/repositories";
const DEFAULT_ARCHIVE_ROOT: &str = "https://bitbucket.org";

lazy_static! {
    static ref IMPORT_PATH_RE: Regex = Regex::new(
        r"^bitbucket\.org/(?P<owner>[a-z0-9A-Z_.\-]+)/(?P<repo>[a-z0-9A-Z_.\-]+)(?P<dir>/[a-z0-9A-Z_.\-/]*)?$"
    )
    .unwrap();
}

/// Repository coordinates parsed from an import path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// Subdirectory inside the repository, without the leading slash.
    pub dir: Option<String>,
    /// The full caller-facing logical path.
    pub import_path: String,
}

impl RepoRef {
    /// Parse an import path of the form `bitbucket.org/<owner>/<repo>[/dir]`.
    pub fn parse(import_path: &str) -> Result<Self> {
        let caps = IMPORT_PATH_RE
            .captures(import_path)
            .ok_or_else(|| FetchError::InvalidImportPath(import_path.to_string()))?;

        Ok(Self {
            owner: caps["owner"].to_string(),
            repo: caps["repo"].to_string(),
            dir: caps
                .name("dir")
                .map(|m| m.as_str().trim_start_matches('/').to_string())
                .filter(|d| !d.is_empty()),
            import_path: import_path.to_string(),
        })
    }
}

/// Repository metadata returned by the Bitbucket API.
#[derive(Debug, Deserialize)]
struct RepoInfo {
    scm: String,
}

/// A branch or tag node from the ref listing endpoints.
#[derive(Debug, Deserialize)]
struct RefNode {
    node: String,
}

/// Provider for repositories hosted on bitbucket.org.
pub struct BitbucketProvider {
    http: Arc<HttpClient>,
    scanner: Box<dyn ImportScanner>,
    api_root: String,
    archive_root: String,
}

impl BitbucketProvider {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            scanner: Box::new(GoImportScanner::new()),
            api_root: DEFAULT_API_ROOT.to_string(),
            archive_root: DEFAULT_ARCHIVE_ROOT.to_string(),
        }
    }

    /// Override the API endpoint root.
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    /// Override the archive download root.
    pub fn with_archive_root(mut self, archive_root: impl Into<String>) -> Self {
        self.archive_root = archive_root.into();
        self
    }

    /// Replace the import scanner.
    pub fn with_scanner(mut self, scanner: Box<dyn ImportScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    /// Determine the VCS backing the repository.
    ///
    /// A `hg-`/`git-` prefixed commit specifier carries the answer directly;
    /// anything else costs one metadata request.
    fn detect_vcs(&self, repo: &RepoRef, commit: &str) -> Result<VcsKind> {
        if let Some(kind) = VcsKind::from_prefix(commit) {
            log::debug!("{}: vcs {} taken from commit prefix", repo.import_path, kind);
            return Ok(kind);
        }

        let url = format!("{}/{}/{}", self.api_root, repo.owner, repo.repo);
        let info: RepoInfo = self.http.get_json(&url)?;
        VcsKind::from_scm(&info.scm)
    }

    /// Fetch the branch and tag listings and merge them into one table.
    ///
    /// Tags are enumerated second, so a tag silently overwrites a same-named
    /// branch.
    fn list_refs(&self, repo: &RepoRef) -> Result<HashMap<String, String>> {
        let mut refs = HashMap::new();

        for node_type in ["branches", "tags"] {
            let url = format!(
                "{}/{}/{}/{}",
                self.api_root, repo.owner, repo.repo, node_type
            );
            let nodes: HashMap<String, RefNode> = self.http.get_json(&url)?;
            for (name, node) in nodes {
                refs.insert(name, node.node);
            }
        }

        Ok(refs)
    }

    /// Pick the default revision from the merged ref table.
    fn resolve_default(&self, repo: &RepoRef, vcs: VcsKind) -> Result<(String, String)> {
        let refs = self.list_refs(repo)?;
        best_tag(&refs, vcs.default_tags()).ok_or_else(|| FetchError::NoSuitableRevision {
            repo: repo.import_path.clone(),
        })
    }

    fn archive_url(&self, repo: &RepoRef, commit: &str) -> String {
        // Always the tarball form, never the zip form.
        format!(
            "{}/{}/{}/get/{}.tar.gz",
            self.archive_root, repo.owner, repo.repo, commit
        )
    }
}

impl Provider for BitbucketProvider {
    fn supports(import_path: &str) -> bool {
        IMPORT_PATH_RE.is_match(import_path)
    }

    fn fetch(&self, import_path: &str, commit: &str, opts: &FetchOptions) -> Result<FetchResult> {
        let repo = RepoRef::parse(import_path)?;
        let spec = RevisionSpec::parse(commit);

        let vcs = self.detect_vcs(&repo, commit)?;

        let (tag, resolved) = if spec.needs_resolution() {
            let (tag, node) = self.resolve_default(&repo, vcs)?;
            log::info!("{}: resolved {} to {}", import_path, tag, node);
            (Some(tag), node)
        } else {
            (None, commit.to_string())
        };

        log::debug!(
            "{}: fetching commit {} (vcs {}, tag {:?})",
            import_path,
            resolved,
            vcs,
            tag
        );
        let data = self.http.get_bytes(&self.archive_url(&repo, &resolved))?;

        let install_path = opts.install_root.join("src").join(&repo.import_path);
        let dirs = extract_tarball(&data, &install_path, opts.include_examples)?;

        let package = Package {
            import_path: repo.import_path.clone(),
            abs_path: install_path,
            commit: resolved,
        };

        let mut imports = Vec::new();
        if spec.is_check_import() {
            for dir in &dirs {
                imports.extend(self.scanner.scan(dir, &repo.import_path)?);
            }
            log::debug!("{}: found {} imports to resolve", import_path, imports.len());
        }

        Ok(FetchResult { package, imports })
    }
}
