use thiserror::Error;

use crate::http::HttpError;

#[derive(Error, Debug)]
pub enum FetchError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Import path errors
    #[error("Invalid import path: {0}")]
    InvalidImportPath(String),

    // VCS detection errors
    #[error("Unknown VCS kind: {0}")]
    UnknownVcs(String),

    // Revision resolution errors
    #[error("No suitable revision for {repo}: none of the default tags matched")]
    NoSuitableRevision { repo: String },

    // Archive format errors
    #[error("Invalid archive: {0}")]
    Archive(String),

    // Import scan errors
    #[error("Import scan failed in {dir}: {reason}")]
    Scan { dir: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FetchError>;
