pub mod error;
pub mod http;
pub mod package;
pub mod provider;
pub mod revision;
pub mod scan;

pub use error::{FetchError, Result};
pub use http::{HttpClient, HttpClientConfig};
pub use package::Package;
pub use provider::{BitbucketProvider, FetchOptions, FetchResult, Provider, RepoRef};
pub use revision::{best_tag, RevisionSpec, VcsKind};
pub use scan::{GoImportScanner, ImportScanner};
