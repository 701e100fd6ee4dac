//! Error type shared by every pipeline stage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub const ISSUES_URL: &str = "https://github.com/giggio/chromedriver/issues/";

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported platform or architecture: {os} {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error(
        "can not find a writable tmp directory (tried {}), please report issue on {} with as much information as possible",
        display_paths(.tried),
        ISSUES_URL
    )]
    NoWritableCache { tried: Vec<PathBuf> },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{url} returned an empty version")]
    EmptyVersion { url: String },

    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("error with http(s) request to {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error with http(s) request to {url}: status code {status}")]
    Status { url: String, status: u16 },

    #[error("failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error extracting archive {}: {source}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Error::Http {
            url: url.into(),
            source,
        }
    }

    /// Unsupported platform and missing cache location leave nothing to retry.
    pub fn is_environment_fatal(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedPlatform { .. } | Error::NoWritableCache { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidates".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
